//! ADX MCP Server - Main entry point.
//!
//! This server provides read-only MCP (Model Context Protocol) tools for AI
//! assistants to explore and query an Azure Data Explorer (Kusto) database.

use adx_mcp_server::config::{Config, TransportMode};
use adx_mcp_server::kusto::HttpClientFactory;
use adx_mcp_server::tools::QueryAdapter;
use adx_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; stdout carries the stdio protocol stream.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is not an error
    let dotenv_path = dotenvy::dotenv().ok();

    let config = Config::parse();
    init_tracing(&config);

    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "Loaded environment from file");
    }

    info!(
        transport = %config.transport,
        "Starting ADX MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let adx_config = Arc::new(config.adx_config());
    if adx_config.ensure_connection().is_err() {
        warn!("ADX_CLUSTER_URL or ADX_DATABASE is not set; tool calls will fail until configured");
    } else {
        info!(
            cluster_url = %adx_config.cluster_url,
            database = %adx_config.database,
            "Azure Data Explorer target configured"
        );
    }
    if adx_config.credentials().is_err() {
        warn!("Azure client credentials are incomplete; tool calls will fail until configured");
    }

    let adapter = Arc::new(QueryAdapter::new(adx_config, Arc::new(HttpClientFactory)));

    let result = match config.transport {
        TransportMode::Stdio => {
            let transport = StdioTransport::new(adapter);
            info!(transport = transport.name(), "Using stdio transport");
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                adapter,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
