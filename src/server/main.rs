use std::sync::Arc;

use anyhow::Context;
use todo_service::adapters::HttpServer;
use todo_service::config::ServerConfig;
use todo_service::storage::sqlite::SqliteTodoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    run().await
}

async fn run() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    let store = Arc::new(
        SqliteTodoStore::new(&config.database_url)
            .await
            .with_context(|| format!("could not open database {}", config.database_url))?,
    );
    let server = HttpServer::new(&config, store.clone()).await?;
    let result = server.run().await;
    store.close().await;
    result
}
