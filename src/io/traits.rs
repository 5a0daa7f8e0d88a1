//! I/O trait definitions for the coverage pipeline.
//!
//! The locator, extractor and the flat-summary entry point never touch
//! `std::fs` or spawn processes directly. They receive these capabilities as
//! parameters, which keeps the pipeline deterministic under test.
//!
//! # Example
//!
//! ```rust,ignore
//! use covgate::io::traits::FileSystem;
//!
//! fn bundle_entries<F: FileSystem + ?Sized>(fs: &F, bundle: &Path) -> Result<Vec<String>> {
//!     fs.read_dir(bundle)
//! }
//! ```

use crate::errors::Result;
use std::path::Path;
use thiserror::Error;

/// Read-only file system operations.
///
/// Implementations should be thread-safe (`Send + Sync`) so one environment
/// can back several independent runs.
pub trait FileSystem: Send + Sync {
    /// List the names of the direct entries of a directory.
    ///
    /// Order is implementation-defined; callers that need a stable order
    /// sort the result themselves.
    ///
    /// # Errors
    ///
    /// Returns `CoverageError::Io` if the directory cannot be read.
    fn read_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Check if a path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a file's contents as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `CoverageError::Io` if the file doesn't exist or can't be read.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Failure of a single export invocation.
///
/// Export failures carry no sub-kind: every failure is treated as transient
/// and retried identically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExportFailure {
    pub message: String,
}

impl ExportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns a coverage artifact into the raw JSON report bytes.
///
/// The production implementation shells out to `xccov`; tests script the
/// responses.
pub trait CoverageExporter: Send + Sync {
    /// Run one export over `artifact`.
    fn export(&self, artifact: &Path) -> std::result::Result<Vec<u8>, ExportFailure>;
}
