//! Capture backend trait and implementations
//!
//! This module provides the seam between tool dispatch and the OS
//! screen-capture utility:
//!
//! - `CaptureUtility`: trait defining the interface for capture backends
//! - `ScreencaptureUtility`: the macOS backend shelling out to
//!   `screencapture`
//! - `MockUtility`: in-process backend for tests

use std::path::Path;

use async_trait::async_trait;

use crate::{error::CaptureResult, model::CaptureMode};

pub mod mock;
pub mod screencapture;

pub use mock::{MockOutcome, MockUtility};
pub use screencapture::ScreencaptureUtility;

/// Interface to the OS screen-capture utility
///
/// Implementations run one capture to completion per call and retain no
/// state between calls. All implementations must be thread-safe
/// (`Send + Sync`) so the server can hold them behind an `Arc`.
///
/// # Contract
///
/// - On success, exactly the file at `dest` has been created.
/// - Interactive modes block until the operator completes or dismisses the
///   selection; dismissal is reported as [`CaptureError::Cancelled`] and no
///   file is created.
/// - Failures never leave a partial file behind.
///
/// [`CaptureError::Cancelled`]: crate::error::CaptureError::Cancelled
#[async_trait]
pub trait CaptureUtility: Send + Sync {
    /// Captures a screenshot in the given mode, writing it to `dest`
    async fn capture(&self, mode: CaptureMode, dest: &Path) -> CaptureResult<()>;
}
