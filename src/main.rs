use anyhow::Context;
use docfind_mcp::config::FinderConfig;
use docfind_mcp::server::FindServer;
use docfind_mcp::state::FindState;
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    docfind_mcp::logging::init();

    let config = FinderConfig::discover().context("Failed to load configuration")?;
    tracing::info!(
        "Starting docfind-mcp (base URL {}, display limit {})",
        config.base_url,
        config.max_display_chars
    );

    // The index is built lazily by the first search
    let server = FindServer::new(FindState::from_config(&config));
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
