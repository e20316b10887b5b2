//! MCP test server binary entry point.

use anyhow::Result;
use mcp_sse_harness::{
    config::ServerConfig,
    protocol::McpServerBuilder,
    server::{McpHandler, ServerStateBuilder},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::builder().from_env()?.build()?;
    init_tracing(config.log_json);

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let state = Arc::new(
        ServerStateBuilder::new()
            .config(config.clone())
            .build()
            .map_err(|e| anyhow::anyhow!(e))?,
    );

    for tool in state.tools.list() {
        info!(
            "Tool available: {} - {}",
            tool.name,
            tool.description.as_deref().unwrap_or("")
        );
    }

    let addr = config.socket_addr();
    info!("SSE endpoint:             http://{}/sse", addr);
    info!("Streamable HTTP endpoint: http://{}/mcp", addr);
    info!("Health check:             http://{}/health", addr);

    let server = McpServerBuilder::new()
        .handler(McpHandler::new(state))
        .config(config)
        .build()?;

    server.run().await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mcp_sse_harness=info,tower_http=info,warn"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
