//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.

use crate::error::{AdxError, AdxResult};
use crate::mcp::AdxService;
use crate::tools::QueryAdapter;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

/// Stdio transport implementation.
///
/// Reads JSON-RPC messages from stdin and writes responses to stdout.
pub struct StdioTransport {
    /// Shared query adapter for the single stdio session
    adapter: Arc<QueryAdapter>,
}

impl StdioTransport {
    /// Create a new stdio transport.
    ///
    /// # Arguments
    ///
    /// * `adapter` - Shared query adapter for tool invocations
    pub fn new(adapter: Arc<QueryAdapter>) -> Self {
        Self { adapter }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> AdxResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = AdxService::new(self.adapter.clone());

        let running_service = service.serve(stdio()).await.map_err(|e| {
            AdxError::transport(format!("Failed to start stdio transport: {}", e))
        })?;

        tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => {
                        info!("Stdio transport completed normally");
                        Ok(())
                    }
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        Err(AdxError::transport(format!("Stdio transport error: {}", e)))
                    }
                }
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received (send again to force exit)");
                tokio::spawn(async {
                    wait_for_signal().await;
                    warn!("Received second signal, forcing immediate exit");
                    std::process::exit(1);
                });

                // Blocking stdin reads cannot be interrupted, so exit directly
                info!("Exiting process");
                std::process::exit(0);
            }
        }
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}
