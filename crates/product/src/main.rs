use anyhow::{Context, Result};
use dotenv::dotenv;
use product::{config::Config, di::DependenciesInjectDeps, handler::AppRouter, state::AppState};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::init_logger,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    init_logger("product-service", is_dev, is_enable_file);

    let config = Config::init().context("Failed to load configuration")?;

    info!("🚀 Starting product service...");

    let db_pool = ConnectionManager::new_pool(&config.database_url, config.db_max_conn)
        .await
        .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
    }

    let deps = DependenciesInjectDeps::postgres(db_pool, config.upload.clone());
    let state = AppState::new(deps, config.upload);
    state.spawn_metrics_collector();

    AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server")?;

    info!("🛑 Product service stopped");

    Ok(())
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    info!("📦 Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
