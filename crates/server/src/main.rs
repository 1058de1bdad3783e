//! sumlify MCP server entry point.
//!
//! Boots the summary server on stdio transport. Logging goes to stderr to
//! avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use sumlify_client::{GeminiClient, GeminiConfig, Summarizer};
use sumlify_core::cache::spawn_sweeper;
use sumlify_core::{AppConfig, CacheDb, SummaryCache, settings};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(version = handler::VERSION, db_path = %config.db_path.display(), "starting sumlify on stdio transport");

    let db = CacheDb::open(&config.db_path).await?;
    let cache = SummaryCache::new(Arc::new(db));

    settings::record_launch(cache.store().as_ref(), handler::VERSION, cache.now()).await?;

    let sweeper = spawn_sweeper(cache.clone(), config.sweep_initial_delay(), config.sweep_interval());

    let summarizer: Option<Arc<dyn Summarizer>> = match GeminiClient::new(GeminiConfig::from(&config)) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "summaries disabled until an API key is configured");
            None
        }
    };

    let state = handler::AppState::new(config, cache, summarizer)?;
    let server = serve_server(handler::SumlifyServer::new(state), stdio()).await?;
    server.waiting().await?;

    sweeper.abort();
    Ok(())
}
