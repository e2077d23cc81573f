use crate::{
    abstract_trait::storage::ImageStorageTrait, config::UploadConfig,
    domain::requests::ImageUpload,
};
use async_trait::async_trait;
use chrono::Utc;
use shared::errors::ServiceError;
use std::io::ErrorKind;
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::{error, info, warn};

const MAX_NAME_ATTEMPTS: u32 = 16;

/// Writes pictures into `UploadConfig::dir` as `{unix_millis}-{original name}`.
/// A name already taken gets a counter: `{unix_millis}-{n}-{original name}`.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    config: UploadConfig,
}

impl LocalImageStorage {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    fn sanitize(original: &str) -> String {
        // strip any client-supplied directories
        let base = original.rsplit(['/', '\\']).next().unwrap_or_default();

        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let cleaned = cleaned.trim_start_matches('.');
        if cleaned.is_empty() {
            "upload".to_string()
        } else {
            cleaned.to_string()
        }
    }

    fn file_name(stamp: i64, cleaned: &str, attempt: u32) -> String {
        match attempt {
            0 => format!("{stamp}-{cleaned}"),
            n => format!("{stamp}-{n}-{cleaned}"),
        }
    }

    fn prefix(&self) -> &str {
        self.config.public_prefix.trim_end_matches('/')
    }

    /// Opens a file that did not exist before, so concurrent uploads never
    /// share a picture.
    async fn create_unique(
        &self,
        stamp: i64,
        cleaned: &str,
    ) -> Result<(String, File), ServiceError> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = Self::file_name(stamp, cleaned, attempt);
            let path = self.config.dir.join(&file_name);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((file_name, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    error!("❌ Failed to create {:?}: {e}", path);
                    return Err(e.into());
                }
            }
        }

        Err(ServiceError::Storage(format!(
            "no free file name for '{cleaned}' after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }
}

#[async_trait]
impl ImageStorageTrait for LocalImageStorage {
    async fn save(&self, upload: ImageUpload) -> Result<String, ServiceError> {
        fs::create_dir_all(&self.config.dir).await.map_err(|e| {
            error!("❌ Failed to create upload dir {:?}: {e}", self.config.dir);
            ServiceError::from(e)
        })?;

        let cleaned = Self::sanitize(&upload.file_name);
        let stamp = Utc::now().timestamp_millis();
        let (file_name, mut file) = self.create_unique(stamp, &cleaned).await?;
        let path = self.config.dir.join(&file_name);

        let written = match file.write_all(&upload.bytes).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            error!("❌ Failed to write {:?}: {e}", path);
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path).await {
                warn!("⚠️ Could not remove partial upload {:?}: {cleanup}", path);
            }
            return Err(e.into());
        }

        info!("🖼️ Stored {} bytes at {:?}", upload.bytes.len(), path);

        Ok(format!("{}/{}", self.prefix(), file_name))
    }

    async fn remove(&self, public_path: &str) -> Result<(), ServiceError> {
        let file_name = public_path
            .strip_prefix(self.prefix())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.starts_with('.'))
            .filter(|name| !name.contains(['/', '\\']));

        let Some(file_name) = file_name else {
            warn!("⚠️ Refusing to remove {public_path}: not an uploaded picture");
            return Ok(());
        };

        let path = self.config.dir.join(file_name);

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("🗑️ Removed picture {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("❌ Failed to remove {:?}: {e}", path);
                Err(e.into())
            }
        }
    }
}
