//! Environment trait and the production environment.
//!
//! The environment bundles the I/O capabilities a pipeline run needs so they
//! can be passed explicitly instead of reached for globally:
//!
//! - **Dependency injection**: the locator and extractor only see the traits
//! - **Testability**: [`MockEnv`](crate::testkit::MockEnv) swaps in memory
//!   files and scripted export responses
//!
//! # Usage
//!
//! ```rust,ignore
//! use covgate::env::RealEnv;
//! use covgate::pipeline::{xcodebuild_report, PipelineOptions};
//!
//! let env = RealEnv::new();
//! let report = xcodebuild_report(&env, &source, &PipelineOptions::default())?;
//! ```

use crate::io::real::{RealFileSystem, XccovExporter};
use crate::io::traits::{CoverageExporter, FileSystem};

/// I/O capabilities available to a pipeline run.
pub trait CoverageEnv {
    /// Read-only file system access for locating and reading artifacts.
    fn file_system(&self) -> &dyn FileSystem;

    /// The external export command.
    fn exporter(&self) -> &dyn CoverageExporter;
}

/// Production environment backed by the real file system and `xccov`.
#[derive(Debug, Clone, Default)]
pub struct RealEnv {
    file_system: RealFileSystem,
    exporter: XccovExporter,
}

impl RealEnv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoverageEnv for RealEnv {
    fn file_system(&self) -> &dyn FileSystem {
        &self.file_system
    }

    fn exporter(&self) -> &dyn CoverageExporter {
        &self.exporter
    }
}
