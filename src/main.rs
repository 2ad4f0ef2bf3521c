use anyhow::Result;
use tracing_subscriber::EnvFilter;
use view_reports::config::DashboardConfig;
use view_reports::server::ServerBuilder;
use view_reports::storage::{PostgresReportStore, connect_pool};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = DashboardConfig::load()?;

    tracing::info!(
        database = %config.database.display_target(),
        max_connections = config.database.max_connections,
        "Connecting to database"
    );
    let pool = connect_pool(&config.database).await?;

    let result = ServerBuilder::new()
        .with_store(PostgresReportStore::new(pool.clone()))
        .serve(&config.server.listen_addr)
        .await;

    pool.close().await;
    tracing::info!("Connection pool closed");
    result
}
