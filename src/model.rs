//! Data models and type definitions for screencap-mcp
//!
//! This module defines the core types used throughout the application:
//! - Capture mode routing (desktop, window, area)
//! - Screenshot records reported by the listing tool
//! - Tool response structures serialized to MCP text content

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Represents the capture mode routed to the capture utility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// Full-desktop capture
    Desktop,
    /// Interactive window selection (operator clicks a window)
    Window,
    /// Interactive area selection (operator drags a rectangle)
    Area,
}

impl CaptureMode {
    /// Returns the mode as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::Desktop => "desktop",
            CaptureMode::Window => "window",
            CaptureMode::Area => "area",
        }
    }

    /// Prefix used for generated filenames in this mode
    pub fn file_prefix(&self) -> &'static str {
        match self {
            CaptureMode::Desktop => "screenshot",
            CaptureMode::Window => "window",
            CaptureMode::Area => "area",
        }
    }

    /// Whether this mode blocks on an operator-driven selection UI
    pub fn is_interactive(&self) -> bool {
        matches!(self, CaptureMode::Window | CaptureMode::Area)
    }
}

impl std::fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A saved screenshot, derived on demand from filesystem metadata
///
/// The filesystem is the source of truth; records are never cached between
/// tool calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotRecord {
    /// Filename within the output directory
    pub filename: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Last-modified timestamp (RFC 3339 in serialized form)
    pub modified: DateTime<Local>,
}

/// Response structure for the capture tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResponse {
    /// Absolute path of the saved screenshot
    pub path: String,
    /// Filename within the output directory
    pub filename: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Mode the screenshot was captured in
    pub mode: CaptureMode,
}

/// Response structure for the list_screenshots tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListScreenshotsResponse {
    /// Number of records returned (after applying the limit)
    pub count: usize,
    /// Records sorted by modification time, most recent first
    pub screenshots: Vec<ScreenshotRecord>,
}
