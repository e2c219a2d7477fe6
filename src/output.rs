//! Output directory management
//!
//! This module owns the fixed directory all screenshots are written to and
//! listed from (`~/Desktop/mcp-screenshots`). It validates supplied
//! filenames, generates unique timestamp-based names when none is given,
//! and enumerates saved captures sorted by modification time.
//!
//! The filesystem is the only state: nothing is cached between calls, and
//! the directory is re-checked on every operation so an externally deleted
//! directory is recreated rather than treated as fatal.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::{
    error::{CaptureError, CaptureResult},
    model::{CaptureMode, ScreenshotRecord},
};

/// Name of the screenshot directory created under `~/Desktop`
pub const DIR_NAME: &str = "mcp-screenshots";

/// Default number of entries returned by the listing tool
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// The fixed directory screenshots are persisted to
///
/// Cheap to clone; holds only the root path. All methods re-validate the
/// directory on use, so a single `OutputDir` can outlive external changes
/// to the filesystem.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Creates an `OutputDir` rooted at an explicit path
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates an `OutputDir` at the default location,
    /// `$HOME/Desktop/mcp-screenshots`
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::DirectoryUnavailable`] if `$HOME` is not set.
    pub fn default_location() -> CaptureResult<Self> {
        let home = std::env::var("HOME").map_err(|_| CaptureError::DirectoryUnavailable {
            path: PathBuf::from("~"),
            reason: "HOME environment variable is not set".to_string(),
        })?;
        Ok(Self::new(Path::new(&home).join("Desktop").join(DIR_NAME)))
    }

    /// Returns the root path of the output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensures the output directory exists, creating it if necessary
    pub fn ensure(&self) -> CaptureResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| CaptureError::DirectoryUnavailable {
            path: self.root.clone(),
            reason: e.to_string(),
        })
    }

    /// Resolves the destination path for a capture
    ///
    /// A supplied filename is validated and joined to the root; when no
    /// filename is given a unique `{prefix}_{timestamp}.png` name is
    /// generated from the capture mode. The directory is created on demand.
    pub fn resolve(&self, filename: Option<&str>, mode: CaptureMode) -> CaptureResult<PathBuf> {
        self.ensure()?;
        let name = match filename {
            Some(name) => validate_filename(name)?,
            None => self.generate_name(mode.file_prefix()),
        };
        Ok(self.root.join(name))
    }

    /// Generates a unique timestamp-based filename
    ///
    /// Format is `{prefix}_YYYYMMDD_HHMMSS.png`; if a file with that name
    /// already exists (two captures within the same second), a counter
    /// suffix is appended until the name is free.
    fn generate_name(&self, prefix: &str) -> String {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let base = format!("{prefix}_{stamp}");
        let mut name = format!("{base}.png");
        let mut counter = 1u32;
        while self.root.join(&name).exists() {
            name = format!("{base}_{counter}.png");
            counter += 1;
        }
        name
    }

    /// Lists saved screenshots, most recently modified first
    ///
    /// Only `.png` files are reported. A missing or empty directory yields
    /// an empty list, not an error.
    pub fn list(&self, limit: usize) -> CaptureResult<Vec<ScreenshotRecord>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CaptureError::DirectoryUnavailable {
                    path: self.root.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("png") {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let modified: DateTime<Local> = metadata.modified()?.into();
            records.push(ScreenshotRecord {
                filename: entry.file_name().to_string_lossy().into_owned(),
                size_bytes: metadata.len(),
                modified,
            });
        }

        records.sort_by(|a, b| b.modified.cmp(&a.modified));
        records.truncate(limit);
        debug!(count = records.len(), limit, "listed screenshots");
        Ok(records)
    }
}

/// Validates a user-supplied filename
///
/// Rejects empty names, names containing path separators or NUL bytes, and
/// the `.`/`..` directory names, so every supplied filename resolves inside
/// the output directory. Names without an extension get `.png` appended.
pub fn validate_filename(name: &str) -> CaptureResult<String> {
    let invalid = |reason: &str| CaptureError::InvalidParameter {
        parameter: "filename".to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(invalid("must not contain path separators or NUL bytes"));
    }
    if name == "." || name == ".." {
        return Err(invalid("must name a file"));
    }

    if Path::new(name).extension().is_none() {
        Ok(format!("{name}.png"))
    } else {
        Ok(name.to_string())
    }
}
