//! Production implementations of I/O traits.
//!
//! These implementations are used in production code through
//! [`RealEnv`](crate::env::RealEnv). For testing, use
//! [`MockEnv`](crate::testkit::MockEnv) instead.
//!
//! ```rust,ignore
//! use covgate::io::real::RealFileSystem;
//! use covgate::io::traits::FileSystem;
//!
//! let fs = RealFileSystem::new();
//! let entries = fs.read_dir(Path::new("DerivedData/Logs/Test"))?;
//! ```

use crate::errors::{CoverageError, Result};
use crate::io::traits::{CoverageExporter, ExportFailure, FileSystem};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Production file system implementation.
///
/// Delegates directly to `std::fs` and only ever reads.
#[derive(Debug, Default, Clone)]
pub struct RealFileSystem;

impl RealFileSystem {
    /// Create a new real file system instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<String>> {
        let entries = fs::read_dir(path).map_err(|e| {
            CoverageError::io_with_path(format!("Failed to read directory: {}", e), path)
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                CoverageError::io_with_path(format!("Failed to read directory entry: {}", e), path)
            })?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path)
            .map_err(|e| CoverageError::io_with_path(format!("Failed to read file: {}", e), path))
    }
}

/// Exports an `.xccovreport` (or a whole result bundle) to JSON through
/// `xcrun xccov view --report --json`.
#[derive(Debug, Clone)]
pub struct XccovExporter {
    program: String,
}

impl Default for XccovExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl XccovExporter {
    pub fn new() -> Self {
        Self {
            program: "xcrun".to_string(),
        }
    }

    /// Use a different launcher than `xcrun`, e.g. a wrapper script.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn resolve_program(&self) -> std::result::Result<PathBuf, ExportFailure> {
        which::which(&self.program)
            .map_err(|e| ExportFailure::new(format!("{} not found on PATH: {}", self.program, e)))
    }
}

impl CoverageExporter for XccovExporter {
    fn export(&self, artifact: &Path) -> std::result::Result<Vec<u8>, ExportFailure> {
        let program = self.resolve_program()?;
        log::debug!("Running {} xccov view on {}", program.display(), artifact.display());

        let output = Command::new(&program)
            .args(["xccov", "view", "--report", "--json"])
            .arg(artifact)
            .output()
            .map_err(|e| ExportFailure::new(format!("Failed to run xccov: {}", e)))?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ExportFailure::new(format!(
                "xccov exited with {}: {}",
                output.status,
                stderr.trim()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_dir_lists_entry_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let mut names = RealFileSystem::new().read_dir(dir.path()).unwrap();
        names.sort();

        assert_eq!(names, vec!["a.json".to_string(), "nested".to_string()]);
    }

    #[test]
    fn test_read_dir_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let err = RealFileSystem::new().read_dir(&missing).unwrap_err();

        assert!(matches!(err, CoverageError::Io { path: Some(ref p), .. } if p == &missing));
    }

    #[test]
    fn test_read_bytes_and_is_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("report.json");
        fs::write(&file, b"{\"data\":[]}").unwrap();

        let fs = RealFileSystem::new();
        assert!(fs.is_dir(dir.path()));
        assert!(!fs.is_dir(&file));
        assert_eq!(fs.read_bytes(&file).unwrap(), b"{\"data\":[]}".to_vec());
    }

    #[test]
    fn test_exporter_without_program_fails_without_panicking() {
        let exporter = XccovExporter::with_program("covgate-definitely-not-installed");

        let failure = exporter.export(Path::new("x.xccovreport")).unwrap_err();

        assert!(failure.message.contains("not found on PATH"));
    }
}
