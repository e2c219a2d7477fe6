//! Error types for screenshot capture operations
//!
//! This module defines the error types surfaced to the calling agent. Each
//! variant carries a user-facing message and provides an actionable
//! remediation hint through the `remediation_hint()` method.

use std::path::PathBuf;

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Error type for screenshot capture and listing operations
///
/// Tool-call failures are isolated to the call that produced them; none of
/// these errors terminate the server process.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The capture utility exited unsuccessfully (e.g., permission denied)
    #[error("screencapture failed with exit status {status}: {stderr}")]
    UtilityFailed {
        /// Exit status reported by the utility (-1 if killed by a signal)
        status: i32,
        /// Standard error output from the utility
        stderr: String,
    },

    /// The operator dismissed an interactive window/area selection
    #[error("Capture cancelled: interactive selection was dismissed before a screenshot was taken")]
    Cancelled,

    /// Invalid parameter provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// The output directory cannot be created or accessed
    #[error("Output directory '{}' is unavailable: {reason}", path.display())]
    DirectoryUnavailable {
        /// The directory that could not be used
        path: PathBuf,
        /// Reason it is unavailable
        reason: String,
    },

    /// The capture utility binary could not be launched at all
    #[error("Failed to launch '{utility}': {source}")]
    SpawnFailed {
        /// Name of the utility binary
        utility: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptureError {
    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use screencap_mcp::error::CaptureError;
    ///
    /// let error = CaptureError::UtilityFailed {
    ///     status: 1,
    ///     stderr: "could not create image from display".to_string(),
    /// };
    /// assert!(error.remediation_hint().contains("Screen Recording"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            CaptureError::UtilityFailed { .. } => {
                "Grant screen recording permission in System Settings > Privacy & Security > \
                 Screen Recording and retry. If permission is already granted, check that the \
                 output directory is writable."
            }
            CaptureError::Cancelled => {
                "Re-run the tool and click a window (or drag a selection) instead of pressing \
                 Escape."
            }
            CaptureError::InvalidParameter { .. } => {
                "Check the tool arguments: filenames must be plain names without path \
                 separators, and numeric arguments must be within their documented range."
            }
            CaptureError::DirectoryUnavailable { .. } => {
                "Ensure the Desktop folder in your home directory exists and is writable. The \
                 server creates the mcp-screenshots subdirectory on demand."
            }
            CaptureError::SpawnFailed { .. } => {
                "The screencapture utility ships with macOS; this server must run on a macOS \
                 host with /usr/sbin in PATH."
            }
            CaptureError::Io(_) => {
                "Check filesystem permissions and available disk space for the output \
                 directory."
            }
        }
    }
}
