//! Error types for the coverage pipeline.
//!
//! Every stage returns either its artifact or a [`CoverageError`]. Errors are
//! never swallowed between stages: the orchestrating caller turns whatever
//! reaches it into a single human-readable failure line.
//!
//! # Categories
//!
//! - `Locate`: the result bundle or the export file inside it is missing
//! - `Extract`: the export command kept failing until the retry budget ran out
//! - `Decode`: the exported bytes do not match the documented schema
//! - `Io`: an underlying read failure unrelated to the above
//!
//! # Example
//!
//! ```rust
//! use covgate::errors::{CoverageError, LocateError};
//! use std::path::PathBuf;
//!
//! let err: CoverageError = LocateError::ResultBundleMissing {
//!     searched: PathBuf::from("derived/Logs/Test"),
//! }
//! .into();
//! assert!(err.to_string().contains("xcresult"));
//!
//! let decode = CoverageError::decode("missing field `targets`");
//! assert!(decode.is_decode());
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which level of the build-output tree the locator failed at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    /// No `.xcresult` entry under the test logs directory.
    #[error("Could not find the xcresult bundle in {}", .searched.display())]
    ResultBundleMissing { searched: PathBuf },

    /// The bundle exists but holds no coverage report.
    #[error("Could not find the coverage export file in {}", .bundle.display())]
    ExportFileMissing { bundle: PathBuf },
}

/// Main error type for pipeline operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoverageError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    /// Export invocation failed on every attempt of the retry budget.
    #[error("Coverage export failed after {attempts} attempts: {message}")]
    Extract { attempts: u32, message: String },

    #[error("Invalid coverage data: {message}")]
    Decode { message: String },

    #[error("I/O error{}: {message}", path_suffix(.path))]
    Io {
        message: String,
        path: Option<PathBuf>,
    },
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

impl CoverageError {
    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an I/O error with a message.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an I/O error with a message and path context.
    pub fn io_with_path(message: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    pub fn is_locate(&self) -> bool {
        matches!(self, Self::Locate(_))
    }

    pub fn is_extract(&self) -> bool {
        matches!(self, Self::Extract { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

impl From<serde_json::Error> for CoverageError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, CoverageError>;
