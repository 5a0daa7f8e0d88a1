//! Validated coverage model.
//!
//! Two schema shapes reach the pipeline:
//!
//! - [`CoverageExport`]: project → target → file, as written by `xccov`
//! - [`FlatCoverage`]: groups of per-file summaries with no target grouping,
//!   as written by `llvm-cov export`
//!
//! [`CoverageModel`] tags which one a run carries. Values are immutable once
//! decoded; later stages build new values instead of editing these.

pub mod decode;

pub use decode::{decode_export, decode_flat};

use serde::Serialize;
use std::path::PathBuf;

/// Nested coverage export: the whole project and its targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageExport {
    /// Project-wide aggregate, as reported by the toolchain.
    pub percentage: f64,
    pub targets: Vec<Target>,
}

/// A build unit (library, framework, test bundle) and its files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub name: String,
    /// Aggregate from the export. Never recomputed from `files`.
    pub percentage: f64,
    pub files: Vec<CoverageFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageFile {
    /// Display name, usually the file name.
    pub name: String,
    /// Path as recorded by the build, used for change-set matching.
    pub path: PathBuf,
    pub percentage: f64,
}

/// Flat coverage summaries without target grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlatCoverage {
    pub groups: Vec<CoverageGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageGroup {
    pub files: Vec<FileSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub filename: PathBuf,
    pub percent: f64,
}

impl FlatCoverage {
    /// Concatenate the groups of several exports, preserving order.
    pub fn merge(exports: impl IntoIterator<Item = FlatCoverage>) -> Self {
        Self {
            groups: exports.into_iter().flat_map(|e| e.groups).collect(),
        }
    }

    pub fn files(&self) -> impl Iterator<Item = &FileSummary> {
        self.groups.iter().flat_map(|g| g.files.iter())
    }
}

/// Coverage for one run, in whichever shape the toolchain produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoverageModel {
    Targets(CoverageExport),
    Flat(FlatCoverage),
}

impl CoverageModel {
    /// The project aggregate, if the shape carries one.
    pub fn aggregate_percentage(&self) -> Option<f64> {
        match self {
            Self::Targets(export) => Some(export.percentage),
            Self::Flat(_) => None,
        }
    }

    pub fn file_count(&self) -> usize {
        match self {
            Self::Targets(export) => export.targets.iter().map(|t| t.files.len()).sum(),
            Self::Flat(flat) => flat.files().count(),
        }
    }
}

/// Round a percentage to two decimals.
pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Shortest textual form of a percentage: `43.44`, `100`, `0`.
pub fn format_percentage(value: f64) -> String {
    format!("{}", value)
}
