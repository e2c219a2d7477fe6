//! Mock capture utility for testing
//!
//! This module provides a [`MockUtility`] implementation of the
//! [`CaptureUtility`] trait so the tool surface can be exercised without a
//! display or the real `screencapture` binary. The mock writes a minimal
//! PNG-signature file on success, and can be configured to simulate the
//! operator cancelling an interactive selection or the utility failing.
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//!
//! use screencap_mcp::{
//!     capture::{CaptureUtility, MockOutcome, MockUtility},
//!     model::CaptureMode,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let dest = dir.path().join("shot.png");
//!
//!     let mock = MockUtility::new();
//!     mock.capture(CaptureMode::Desktop, &dest).await.unwrap();
//!     assert!(dest.exists());
//!
//!     let cancelling = MockUtility::new().with_outcome(MockOutcome::Cancel);
//!     let result = cancelling.capture(CaptureMode::Window, &dest).await;
//!     assert!(result.is_err());
//! }
//! ```

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use tokio::time::sleep;

use super::CaptureUtility;
use crate::{
    error::{CaptureError, CaptureResult},
    model::CaptureMode,
};

/// PNG signature bytes, so saved mock files look like real captures
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Outcome a [`MockUtility`] simulates for every capture call
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Write a PNG-signature file at the destination and succeed
    Save,
    /// Simulate the operator dismissing an interactive selection; no file
    /// is created
    Cancel,
    /// Simulate a utility failure with the given exit status and stderr
    Fail {
        /// Exit status to report
        status: i32,
        /// stderr text to report
        stderr: String,
    },
}

/// Mock capture utility for tests and development
///
/// Thread-safe; records every invocation (mode and destination) so tests
/// can assert on dispatch behavior. Builder methods configure the simulated
/// outcome and an optional per-call delay.
#[derive(Debug)]
pub struct MockUtility {
    outcome: MockOutcome,
    delay: Option<Duration>,
    invocations: Mutex<Vec<(CaptureMode, PathBuf)>>,
}

impl MockUtility {
    /// Creates a mock that saves a file and succeeds
    pub fn new() -> Self {
        Self {
            outcome: MockOutcome::Save,
            delay: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Configures the simulated outcome for all capture calls
    pub fn with_outcome(mut self, outcome: MockOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Adds an artificial delay before each capture completes
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns a snapshot of all recorded invocations
    pub fn invocations(&self) -> Vec<(CaptureMode, PathBuf)> {
        self.invocations
            .lock()
            .expect("mock invocation log poisoned")
            .clone()
    }
}

impl Default for MockUtility {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureUtility for MockUtility {
    async fn capture(&self, mode: CaptureMode, dest: &Path) -> CaptureResult<()> {
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        self.invocations
            .lock()
            .expect("mock invocation log poisoned")
            .push((mode, dest.to_path_buf()));

        match &self.outcome {
            MockOutcome::Save => {
                std::fs::write(dest, PNG_MAGIC)?;
                Ok(())
            }
            MockOutcome::Cancel => Err(CaptureError::Cancelled),
            MockOutcome::Fail { status, stderr } => Err(CaptureError::UtilityFailed {
                status: *status,
                stderr: stderr.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_writes_png_signature() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("shot.png");

        let mock = MockUtility::new();
        mock.capture(CaptureMode::Desktop, &dest).await.unwrap();

        let bytes = std::fs::read(&dest).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[tokio::test]
    async fn test_cancel_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("window.png");

        let mock = MockUtility::new().with_outcome(MockOutcome::Cancel);
        let result = mock.capture(CaptureMode::Window, &dest).await;

        assert!(matches!(result, Err(CaptureError::Cancelled)));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_fail_reports_status_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("area.png");

        let mock = MockUtility::new().with_outcome(MockOutcome::Fail {
            status: 1,
            stderr: "not authorized".to_string(),
        });
        let result = mock.capture(CaptureMode::Area, &dest).await;

        match result {
            Err(CaptureError::UtilityFailed { status, stderr }) => {
                assert_eq!(status, 1);
                assert_eq!(stderr, "not authorized");
            }
            other => panic!("expected UtilityFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invocations_are_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockUtility::new();

        mock.capture(CaptureMode::Desktop, &dir.path().join("a.png"))
            .await
            .unwrap();
        mock.capture(CaptureMode::Area, &dir.path().join("b.png"))
            .await
            .unwrap();

        let calls = mock.invocations();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, CaptureMode::Desktop);
        assert_eq!(calls[1].0, CaptureMode::Area);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_observed() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("slow.png");
        let mock = MockUtility::new().with_delay(Duration::from_millis(500));

        let start = tokio::time::Instant::now();
        mock.capture(CaptureMode::Desktop, &dest).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
