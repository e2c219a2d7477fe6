//! macOS `screencapture` subprocess backend
//!
//! Invokes the system `screencapture` utility with the mode flag set for
//! whole-screen, interactive-window, or interactive-area capture, waits for
//! it to exit, and classifies the outcome. The utility itself is the
//! external collaborator; nothing about pixel capture is reimplemented
//! here.

use std::{fs, path::Path, process::Output, time::SystemTime};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::CaptureUtility;
use crate::{
    error::{CaptureError, CaptureResult},
    model::CaptureMode,
};

/// Name of the capture utility binary resolved from `PATH`
pub const SCREENCAPTURE_BIN: &str = "screencapture";

/// Capture backend shelling out to the macOS `screencapture` utility
///
/// Stateless; each call spawns one child process and awaits it. Interactive
/// modes block until the operator clicks a window, drags a selection, or
/// presses Escape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreencaptureUtility;

impl ScreencaptureUtility {
    /// Creates a new `ScreencaptureUtility`
    pub fn new() -> Self {
        Self
    }
}

/// Flags passed before the output path for each mode
///
/// `-x` mutes the shutter sound in every mode; `-W` starts interactive
/// window selection, `-s` interactive area selection.
fn mode_args(mode: CaptureMode) -> &'static [&'static str] {
    match mode {
        CaptureMode::Desktop => &["-x"],
        CaptureMode::Window => &["-x", "-W"],
        CaptureMode::Area => &["-x", "-s"],
    }
}

/// Last-modified timestamp of `dest`, if it exists
///
/// Taken before the utility is spawned so a pre-existing file at the
/// destination (e.g. a re-used filename) is not mistaken for the capture's
/// output afterwards.
fn dest_mtime(dest: &Path) -> Option<SystemTime> {
    fs::metadata(dest).and_then(|meta| meta.modified()).ok()
}

/// Classifies the utility's exit into success, cancellation, or failure
///
/// `screencapture` reports nothing machine-readable when the operator
/// presses Escape: the process exits quietly and no file is written. An
/// interactive run that produced no destination file and no stderr output
/// is therefore a cancellation; everything else that failed to produce the
/// file is a utility failure (permission denial included).
///
/// "Produced" is judged against the destination's pre-spawn state
/// (`pre`): a file that already existed and was left untouched counts as
/// not produced, so cancelling over a re-used filename is still reported
/// as a cancellation rather than a stale success.
///
/// A partial file written on the failure path is removed (best-effort) so
/// it never shows up in listings as a saved capture.
fn classify_exit(
    mode: CaptureMode,
    dest: &Path,
    pre: Option<SystemTime>,
    output: &Output,
) -> CaptureResult<()> {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let produced = match (dest_mtime(dest), pre) {
        (Some(modified), Some(before)) => modified > before,
        (Some(_), None) => true,
        (None, _) => false,
    };

    if mode.is_interactive() && !produced && stderr.is_empty() {
        return Err(CaptureError::Cancelled);
    }
    if !output.status.success() || !produced {
        if produced {
            if let Err(e) = fs::remove_file(dest) {
                warn!(dest = %dest.display(), error = %e, "failed to remove partial capture");
            }
        }
        return Err(CaptureError::UtilityFailed {
            status: output.status.code().unwrap_or(-1),
            stderr,
        });
    }
    Ok(())
}

#[async_trait]
impl CaptureUtility for ScreencaptureUtility {
    async fn capture(&self, mode: CaptureMode, dest: &Path) -> CaptureResult<()> {
        debug!(mode = %mode, dest = %dest.display(), "invoking screencapture");
        let pre = dest_mtime(dest);

        let output = Command::new(SCREENCAPTURE_BIN)
            .args(mode_args(mode))
            .arg(dest)
            .output()
            .await
            .map_err(|source| CaptureError::SpawnFailed {
                utility: SCREENCAPTURE_BIN.to_string(),
                source,
            })?;

        classify_exit(mode, dest, pre, &output)
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    use super::*;

    fn fake_output(raw_status: i32, stderr: &str) -> Output {
        Output {
            status: ExitStatus::from_raw(raw_status),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_mode_args_desktop_is_silent_only() {
        assert_eq!(mode_args(CaptureMode::Desktop), &["-x"]);
    }

    #[test]
    fn test_mode_args_interactive_flags() {
        assert_eq!(mode_args(CaptureMode::Window), &["-x", "-W"]);
        assert_eq!(mode_args(CaptureMode::Area), &["-x", "-s"]);
    }

    /// Pins `dest`'s mtime into the past, returning the pinned timestamp.
    fn backdate(dest: &Path) -> SystemTime {
        let before = SystemTime::now() - std::time::Duration::from_secs(60);
        fs::File::options()
            .write(true)
            .open(dest)
            .unwrap()
            .set_modified(before)
            .unwrap();
        before
    }

    #[test]
    fn test_classify_success_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("shot.png");
        std::fs::write(&dest, b"png").unwrap();

        let result = classify_exit(CaptureMode::Desktop, &dest, None, &fake_output(0, ""));
        assert!(result.is_ok());
    }

    #[test]
    fn test_classify_interactive_no_file_is_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("window.png");

        // Exit code differs across macOS releases; the missing file and
        // silent stderr are the cancellation signal.
        for raw in [0, 1 << 8] {
            let result = classify_exit(CaptureMode::Window, &dest, None, &fake_output(raw, ""));
            assert!(matches!(result, Err(CaptureError::Cancelled)), "raw={raw}");
        }
    }

    #[test]
    fn test_classify_cancel_over_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("login-dialog.png");
        std::fs::write(&dest, b"earlier capture").unwrap();
        let pre = backdate(&dest);

        // Escape over a re-used filename: the old file is still there but
        // untouched, which must read as "nothing captured", not success.
        for raw in [0, 1 << 8] {
            let result = classify_exit(CaptureMode::Window, &dest, Some(pre), &fake_output(raw, ""));
            assert!(matches!(result, Err(CaptureError::Cancelled)), "raw={raw}");
        }
        assert!(dest.exists(), "pre-existing file must be left alone");
    }

    #[test]
    fn test_classify_overwrite_of_existing_file_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("login-dialog.png");
        std::fs::write(&dest, b"earlier capture").unwrap();
        let pre = backdate(&dest);
        // The utility rewrote the file, advancing its mtime past the
        // pre-spawn snapshot.
        std::fs::write(&dest, b"fresh capture").unwrap();

        let result = classify_exit(CaptureMode::Window, &dest, Some(pre), &fake_output(0, ""));
        assert!(result.is_ok());
    }

    #[test]
    fn test_classify_interactive_with_stderr_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("area.png");

        let result = classify_exit(
            CaptureMode::Area,
            &dest,
            None,
            &fake_output(1 << 8, "could not create image from display"),
        );
        match result {
            Err(CaptureError::UtilityFailed { status, stderr }) => {
                assert_eq!(status, 1);
                assert!(stderr.contains("could not create image"));
            }
            other => panic!("expected UtilityFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_desktop_no_file_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.png");

        let result = classify_exit(CaptureMode::Desktop, &dest, None, &fake_output(0, ""));
        assert!(matches!(result, Err(CaptureError::UtilityFailed { .. })));
    }

    #[test]
    fn test_classify_nonzero_exit_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("partial.png");
        std::fs::write(&dest, b"png").unwrap();

        let result =
            classify_exit(CaptureMode::Desktop, &dest, None, &fake_output(1 << 8, "boom"));
        assert!(matches!(result, Err(CaptureError::UtilityFailed { status: 1, .. })));
        assert!(!dest.exists(), "partial capture must not survive a failure");
    }

    #[test]
    fn test_classify_failure_keeps_untouched_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("keep-me.png");
        std::fs::write(&dest, b"earlier capture").unwrap();
        let pre = backdate(&dest);

        let result =
            classify_exit(CaptureMode::Desktop, &dest, Some(pre), &fake_output(1 << 8, "boom"));
        assert!(matches!(result, Err(CaptureError::UtilityFailed { .. })));
        assert!(dest.exists(), "a file the utility never wrote must not be deleted");
    }
}
