use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

const DEFAULT_UPLOAD_DIR: &str = "./public/images/products";
const DEFAULT_PUBLIC_PREFIX: &str = "/images/products";
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_DB_MAX_CONN: u32 = 5;

/// Where product pictures go and how they are exposed.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub public_prefix: String,
    pub max_body_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_max_conn: u32,
    pub upload: UploadConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `init` reads the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).with_context(|| format!("Missing environment variable: {key}"))
        };

        let database_url = required("DATABASE_URL")?;
        let run_migrations_str = required("RUN_MIGRATIONS")?;
        let port_str = required("PORT")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_max_conn = match lookup("DB_MAX_CONN") {
            Some(v) => v
                .parse::<u32>()
                .context("DB_MAX_CONN must be a valid u32 integer")?,
            None => DEFAULT_DB_MAX_CONN,
        };

        let defaults = UploadConfig::default();

        let max_body_bytes = match lookup("UPLOAD_MAX_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .context("UPLOAD_MAX_BYTES must be a valid integer")?,
            None => defaults.max_body_bytes,
        };

        let upload = UploadConfig {
            dir: lookup("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.dir),
            public_prefix: lookup("UPLOAD_PUBLIC_PREFIX").unwrap_or(defaults.public_prefix),
            max_body_bytes,
        };

        Ok(Self {
            database_url,
            run_migrations,
            port,
            db_max_conn,
            upload,
        })
    }
}
