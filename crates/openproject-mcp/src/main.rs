//! OpenProject MCP server binary.
//!
//! Runs the MCP server over stdio. Configuration comes from the
//! environment and is fatal when missing: the process exits with a
//! diagnostic before serving any request.

use openproject_api::{Config, OpenProjectClient};
use openproject_mcp::OpenProjectMcpServer;
use rmcp::{ServiceExt, transport::io::stdio};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr; stdout carries the protocol stream.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(base_url = %config.base_url, "Starting openproject-mcp server");

    let client = Arc::new(OpenProjectClient::new(config));
    let server = OpenProjectMcpServer::new(client);
    let service = server.serve(stdio()).await?;

    tracing::info!("OpenProject MCP server running on stdio");

    service.waiting().await?;

    Ok(())
}
