//! MCP service implementation with tool routing
//!
//! This module provides the screencap-mcp server implementation with the
//! four capture tools: `screenshot`, `screenshot_window`,
//! `screenshot_area`, and `list_screenshots`. Each tool call runs to
//! completion before the next is processed; no state is retained between
//! calls beyond the files in the output directory.

use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ErrorData as McpError, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, sleep};
use tracing::{debug, info};

use crate::{
    capture::CaptureUtility,
    error::CaptureError,
    model::{CaptureMode, CaptureResponse, ListScreenshotsResponse},
    output::{DEFAULT_LIST_LIMIT, OutputDir},
};

/// Longest accepted pre-capture delay, in seconds
pub const MAX_DELAY_SECS: u32 = 300;

/// Parameters for the screenshot tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ScreenshotParams {
    /// Filename to save under (auto-generated if omitted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Delay in seconds before capture (default: 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
}

/// Parameters for the interactive capture tools
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct InteractiveShotParams {
    /// Filename to save under (auto-generated if omitted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Parameters for the list_screenshots tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ListScreenshotsParams {
    /// Maximum number of screenshots to list (default: 10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Converts a CaptureError to an MCP ErrorData
///
/// Invalid arguments map to `invalid_params`; every operational failure is
/// an `internal_error`. The remediation hint rides along in the message so
/// the calling agent can act on it.
fn convert_capture_error_to_mcp(error: CaptureError) -> McpError {
    let message = format!("{} {}", error, error.remediation_hint());
    match &error {
        CaptureError::InvalidParameter { .. } => McpError::invalid_params(message, None),
        _ => McpError::internal_error(message, None),
    }
}

/// Screenshot MCP server
///
/// Maps the four named operations onto invocations of the capture utility
/// and filesystem queries against the output directory.
///
/// # Tools
///
/// - `screenshot`: full-desktop capture with an optional pre-capture delay
/// - `screenshot_window`: interactive window selection
/// - `screenshot_area`: interactive area selection
/// - `list_screenshots`: saved captures, most recent first
#[derive(Clone)]
pub struct ScreenshotMcpServer {
    /// Tool router for dispatching tool calls
    /// Note: This field is used by the #[tool_router] macro
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
    /// Backend that performs the actual capture
    utility: Arc<dyn CaptureUtility>,
    /// Directory all captures are saved to and listed from
    output: OutputDir,
}

#[tool_router]
impl ScreenshotMcpServer {
    /// Creates a new ScreenshotMcpServer instance
    ///
    /// # Arguments
    ///
    /// * `utility` - The capture backend invoked for every capture tool
    /// * `output` - The output directory screenshots are saved to
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use screencap_mcp::{
    ///     capture::MockUtility, mcp::ScreenshotMcpServer, output::OutputDir,
    /// };
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let server =
    ///     ScreenshotMcpServer::new(Arc::new(MockUtility::new()), OutputDir::new(dir.path()));
    /// ```
    pub fn new(utility: Arc<dyn CaptureUtility>, output: OutputDir) -> Self {
        Self {
            tool_router: Self::tool_router(),
            utility,
            output,
        }
    }

    /// Shared capture path: resolve the destination, invoke the utility,
    /// stat the result, and report it as JSON text content.
    async fn run_capture(
        &self,
        mode: CaptureMode,
        filename: Option<&str>,
    ) -> Result<CallToolResult, McpError> {
        let dest = self
            .output
            .resolve(filename, mode)
            .map_err(convert_capture_error_to_mcp)?;

        self.utility
            .capture(mode, &dest)
            .await
            .map_err(convert_capture_error_to_mcp)?;

        let size_bytes = std::fs::metadata(&dest)
            .map_err(|e| {
                McpError::internal_error(
                    format!("Screenshot was captured but could not be read back: {e}"),
                    None,
                )
            })?
            .len();

        let response = CaptureResponse {
            path: dest.display().to_string(),
            filename: dest
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size_bytes,
            mode,
        };
        info!(path = %response.path, size_bytes, mode = %mode, "screenshot saved");

        let json_str = serde_json::to_string(&response).map_err(|e| {
            McpError::internal_error(format!("Failed to serialize capture response: {e}"), None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(json_str)]))
    }

    /// Capture a screenshot of the entire desktop
    ///
    /// Optionally sleeps `delay` seconds before invoking the capture
    /// utility, then writes the screenshot to the output directory under
    /// `filename` or a generated timestamp-based name.
    ///
    /// # Examples
    ///
    /// Request:
    /// ```json
    /// {
    ///   "method": "tools/call",
    ///   "params": {
    ///     "name": "screenshot",
    ///     "arguments": { "delay": 2 }
    ///   }
    /// }
    /// ```
    ///
    /// Response:
    /// ```json
    /// {
    ///   "content": [{
    ///     "type": "text",
    ///     "text": "{\"path\":\"/Users/op/Desktop/mcp-screenshots/screenshot_20250101_120000.png\",\"filename\":\"screenshot_20250101_120000.png\",\"size_bytes\":204800,\"mode\":\"desktop\"}"
    ///   }]
    /// }
    /// ```
    #[tool(description = "Capture a screenshot of the entire desktop")]
    pub async fn screenshot(
        &self,
        Parameters(params): Parameters<ScreenshotParams>,
    ) -> Result<CallToolResult, McpError> {
        let delay = params.delay.unwrap_or(0);
        if delay > MAX_DELAY_SECS {
            return Err(convert_capture_error_to_mcp(CaptureError::InvalidParameter {
                parameter: "delay".to_string(),
                reason: format!("must be at most {MAX_DELAY_SECS} seconds, got {delay}"),
            }));
        }
        if delay > 0 {
            debug!(delay, "waiting before capture");
            sleep(Duration::from_secs(u64::from(delay))).await;
        }

        self.run_capture(CaptureMode::Desktop, params.filename.as_deref())
            .await
    }

    /// Capture a screenshot of a specific window
    ///
    /// Blocks until the operator clicks a window or dismisses the
    /// selection; dismissal fails the call and creates no file.
    #[tool(description = "Capture a screenshot of a specific window (interactive selection)")]
    pub async fn screenshot_window(
        &self,
        Parameters(params): Parameters<InteractiveShotParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_capture(CaptureMode::Window, params.filename.as_deref())
            .await
    }

    /// Capture a screenshot of a selected area
    ///
    /// Blocks until the operator drags a selection or dismisses it; same
    /// cancellation semantics as `screenshot_window`.
    #[tool(description = "Capture a screenshot of a selected area (interactive selection)")]
    pub async fn screenshot_area(
        &self,
        Parameters(params): Parameters<InteractiveShotParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_capture(CaptureMode::Area, params.filename.as_deref())
            .await
    }

    /// List saved screenshots
    ///
    /// Enumerates the output directory sorted by modification time
    /// descending, up to `limit` entries (default 10). An empty directory
    /// yields an empty list.
    ///
    /// # Examples
    ///
    /// Response:
    /// ```json
    /// {
    ///   "content": [{
    ///     "type": "text",
    ///     "text": "{\"count\":1,\"screenshots\":[{\"filename\":\"screenshot_20250101_120000.png\",\"size_bytes\":204800,\"modified\":\"2025-01-01T12:00:00+09:00\"}]}"
    ///   }]
    /// }
    /// ```
    #[tool(description = "List saved screenshots, most recent first")]
    pub async fn list_screenshots(
        &self,
        Parameters(params): Parameters<ListScreenshotsParams>,
    ) -> Result<CallToolResult, McpError> {
        let limit = params
            .limit
            .map(|l| l as usize)
            .unwrap_or(DEFAULT_LIST_LIMIT);

        let screenshots = self
            .output
            .list(limit)
            .map_err(convert_capture_error_to_mcp)?;

        let response = ListScreenshotsResponse {
            count: screenshots.len(),
            screenshots,
        };
        let json_str = serde_json::to_string(&response).map_err(|e| {
            McpError::internal_error(format!("Failed to serialize screenshot list: {e}"), None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(json_str)]))
    }
}

// Implement ServerHandler to make ScreenshotMcpServer a valid Service
#[tool_handler]
impl ServerHandler for ScreenshotMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Capture macOS screenshots (full desktop, interactive window, or interactive \
                 area) and list saved captures. Screenshots are stored under \
                 ~/Desktop/mcp-screenshots."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
