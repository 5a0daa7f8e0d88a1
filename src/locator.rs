//! Locates the coverage report inside a build-output tree.
//!
//! The search descends two fixed levels:
//!
//! ```text
//! <derived-data>/Logs/Test/<run>.xcresult/[<action>/]<report>.xccovreport
//!                          └─ level 1 ─┘  └────────── level 2 ──────────┘
//! ```
//!
//! Each level reports its own [`LocateError`] variant when nothing matches.
//! A result bundle given directly is handed to the exporter as a whole when
//! it holds no `.xccovreport`, since current bundles keep coverage in their
//! `Data/` store and `xccov` reads it from there.
//! Entries are sorted by name before the first match is taken, so the result
//! does not depend on the file system's enumeration order.

use crate::errors::{CoverageError, LocateError, Result};
use crate::io::traits::FileSystem;
use std::path::{Path, PathBuf};

/// Directory, relative to the derived-data root, holding result bundles.
pub const RESULT_BUNDLE_DIR: &str = "Logs/Test";
pub const RESULT_BUNDLE_EXTENSION: &str = "xcresult";
pub const COVERAGE_REPORT_EXTENSION: &str = "xccovreport";

/// Where the pipeline should start looking for coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageSource {
    /// A derived-data folder; both locator levels run.
    DerivedData(PathBuf),
    /// A result bundle; only the export-file search runs, and the bundle
    /// itself is exported when that search finds nothing.
    ResultBundle(PathBuf),
    /// An already located export artifact; the locator is skipped.
    Artifact(PathBuf),
}

impl CoverageSource {
    /// Resolve this source to the artifact handed to the exporter.
    pub fn resolve(&self, fs: &dyn FileSystem) -> Result<PathBuf> {
        match self {
            Self::DerivedData(root) => locate_coverage_artifact(fs, root),
            Self::ResultBundle(bundle) => resolve_result_bundle(fs, bundle),
            Self::Artifact(path) => Ok(path.clone()),
        }
    }
}

/// Find the coverage report under a derived-data folder.
pub fn locate_coverage_artifact(fs: &dyn FileSystem, derived_data: &Path) -> Result<PathBuf> {
    let bundle = find_result_bundle(fs, derived_data)?;
    let report = find_coverage_report(fs, &bundle)?;
    log::debug!("Located coverage report at {}", report.display());
    Ok(report)
}

fn resolve_result_bundle(fs: &dyn FileSystem, bundle: &Path) -> Result<PathBuf> {
    match find_coverage_report(fs, bundle) {
        Err(CoverageError::Locate(LocateError::ExportFileMissing { .. })) if fs.is_dir(bundle) => {
            log::debug!(
                "No coverage report file in {}, exporting the bundle",
                bundle.display()
            );
            Ok(bundle.to_path_buf())
        }
        other => other,
    }
}

/// Level 1: the first `.xcresult` entry under `<derived-data>/Logs/Test`.
pub fn find_result_bundle(fs: &dyn FileSystem, derived_data: &Path) -> Result<PathBuf> {
    let logs = derived_data.join(RESULT_BUNDLE_DIR);

    sorted_entries(fs, &logs)?
        .into_iter()
        .find(|name| has_extension(name, RESULT_BUNDLE_EXTENSION))
        .map(|name| logs.join(name))
        .ok_or_else(|| LocateError::ResultBundleMissing { searched: logs }.into())
}

/// Level 2: the first `.xccovreport` directly inside the bundle, falling back
/// to one directory deeper.
pub fn find_coverage_report(fs: &dyn FileSystem, bundle: &Path) -> Result<PathBuf> {
    let entries = sorted_entries(fs, bundle)?;

    if let Some(name) = entries
        .iter()
        .find(|name| has_extension(name, COVERAGE_REPORT_EXTENSION))
    {
        return Ok(bundle.join(name));
    }

    for name in &entries {
        let nested = bundle.join(name);
        if !fs.is_dir(&nested) {
            continue;
        }
        if let Some(report) = sorted_entries(fs, &nested)?
            .into_iter()
            .find(|name| has_extension(name, COVERAGE_REPORT_EXTENSION))
        {
            return Ok(nested.join(report));
        }
    }

    Err(LocateError::ExportFileMissing {
        bundle: bundle.to_path_buf(),
    }
    .into())
}

/// A missing directory enumerates as empty.
fn sorted_entries(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<String>> {
    if !fs.is_dir(dir) {
        return Ok(Vec::new());
    }
    let mut entries = fs.read_dir(dir)?;
    entries.sort();
    Ok(entries)
}

fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
