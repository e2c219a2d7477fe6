//! screencap-mcp: macOS screenshot MCP server
//!
//! Thin MCP dispatcher around the system `screencapture` utility: four
//! tools for desktop, window, and area capture plus a listing of saved
//! screenshots.

use std::sync::Arc;

use anyhow::Result;
use rmcp::{ServiceExt, transport::stdio};
use screencap_mcp::{
    capture::ScreencaptureUtility, mcp::ScreenshotMcpServer, output::OutputDir,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    // Respects RUST_LOG environment variable
    // Default level: info; stdout carries the MCP transport, so logs go to
    // stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("screencap_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();

    info!("screencap-mcp server starting...");
    info!("Protocol: Model Context Protocol (MCP)");
    info!("Transport: stdio");

    let output = OutputDir::default_location()?;
    output.ensure()?;
    info!(dir = %output.root().display(), "output directory ready");

    let utility = Arc::new(ScreencaptureUtility::new());
    let server = ScreenshotMcpServer::new(utility, output);

    info!("Initializing stdio transport...");

    // Start the server with stdio transport
    // This will handle MCP protocol communication via stdin/stdout
    let service = server.serve(stdio()).await?;

    info!("Waiting for MCP requests...");

    // Wait for the service to complete (blocks until shutdown)
    service.waiting().await?;

    info!("screencap-mcp server shutting down");
    Ok(())
}
