//! Decoding of exported coverage JSON into the validated model.
//!
//! The wire structs mirror the documented export shapes exactly and are
//! private to this module. Every required field must be present: a missing
//! or malformed field is a [`CoverageError::Decode`], never a default.
//!
//! Nested form (`xccov view --report --json`):
//!
//! ```json
//! { "lineCoverage": 0.5009,
//!   "targets": [ { "name": "Danger.framework", "lineCoverage": 0.4344,
//!                  "files": [ { "name": "Danger.swift", "path": "/src/Danger.swift",
//!                               "lineCoverage": 0.0 } ] } ] }
//! ```
//!
//! Flat form (`llvm-cov export -format=text`):
//!
//! ```json
//! { "data": [ { "files": [ { "filename": "/src/Foo.swift",
//!                            "summary": { "lines": { "percent": 66.67 } } } ] } ] }
//! ```

use super::{
    round_percentage, CoverageExport, CoverageFile, CoverageGroup, FileSummary, FlatCoverage,
    Target,
};
use crate::errors::{CoverageError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExport {
    line_coverage: f64,
    targets: Vec<RawTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTarget {
    name: String,
    line_coverage: f64,
    files: Vec<RawFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFile {
    name: String,
    path: String,
    line_coverage: Option<f64>,
    covered_lines: Option<u64>,
    executable_lines: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawFlatExport {
    data: Vec<RawFlatGroup>,
}

#[derive(Debug, Deserialize)]
struct RawFlatGroup {
    files: Vec<RawFlatFile>,
}

#[derive(Debug, Deserialize)]
struct RawFlatFile {
    filename: String,
    summary: RawSummary,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    lines: RawLineSummary,
}

#[derive(Debug, Deserialize)]
struct RawLineSummary {
    percent: f64,
}

/// Decode the nested project → target → file export.
pub fn decode_export(bytes: &[u8]) -> Result<CoverageExport> {
    let raw: RawExport = serde_json::from_slice(bytes)?;

    let percentage = fraction_to_percentage(raw.line_coverage, "project lineCoverage")?;
    let mut seen = HashSet::new();
    let targets = raw
        .targets
        .into_iter()
        .map(|target| {
            if target.name.is_empty() {
                return Err(CoverageError::decode("target with empty name"));
            }
            if !seen.insert(target.name.clone()) {
                return Err(CoverageError::decode(format!(
                    "duplicate target name '{}'",
                    target.name
                )));
            }
            decode_target(target)
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Decoded coverage export: {}% across {} targets",
        percentage,
        targets.len()
    );
    Ok(CoverageExport {
        percentage,
        targets,
    })
}

fn decode_target(raw: RawTarget) -> Result<Target> {
    let context = format!("target '{}' lineCoverage", raw.name);
    let percentage = fraction_to_percentage(raw.line_coverage, &context)?;
    let files = raw
        .files
        .into_iter()
        .map(|file| decode_file(&raw.name, file))
        .collect::<Result<Vec<_>>>()?;

    Ok(Target {
        name: raw.name,
        percentage,
        files,
    })
}

fn decode_file(target: &str, raw: RawFile) -> Result<CoverageFile> {
    if raw.name.is_empty() || raw.path.is_empty() {
        return Err(CoverageError::decode(format!(
            "file with empty name or path in target '{}'",
            target
        )));
    }

    let percentage = match (raw.line_coverage, raw.covered_lines, raw.executable_lines) {
        (Some(fraction), _, _) => {
            fraction_to_percentage(fraction, &format!("file '{}' lineCoverage", raw.path))?
        }
        (None, Some(covered), Some(executable)) => {
            percentage_from_lines(covered, executable, &raw.path)?
        }
        _ => {
            return Err(CoverageError::decode(format!(
                "file '{}' has neither lineCoverage nor coveredLines/executableLines",
                raw.path
            )))
        }
    };

    Ok(CoverageFile {
        name: raw.name,
        path: PathBuf::from(raw.path),
        percentage,
    })
}

/// Decode one flat `llvm-cov export` document.
pub fn decode_flat(bytes: &[u8]) -> Result<FlatCoverage> {
    let raw: RawFlatExport = serde_json::from_slice(bytes)?;

    let groups = raw
        .data
        .into_iter()
        .map(|group| {
            let files = group
                .files
                .into_iter()
                .map(decode_summary)
                .collect::<Result<Vec<_>>>()?;
            Ok(CoverageGroup { files })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FlatCoverage { groups })
}

fn decode_summary(raw: RawFlatFile) -> Result<FileSummary> {
    if raw.filename.is_empty() {
        return Err(CoverageError::decode("file summary with empty filename"));
    }
    let context = format!("file '{}' percent", raw.filename);
    let percent = validate_percentage(raw.summary.lines.percent, &context)?;

    Ok(FileSummary {
        filename: PathBuf::from(raw.filename),
        percent: round_percentage(percent),
    })
}

fn fraction_to_percentage(fraction: f64, context: &str) -> Result<f64> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(CoverageError::decode(format!(
            "{} must be between 0 and 1, got {}",
            context, fraction
        )));
    }
    Ok(round_percentage(fraction * 100.0))
}

fn validate_percentage(value: f64, context: &str) -> Result<f64> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(CoverageError::decode(format!(
            "{} must be between 0 and 100, got {}",
            context, value
        )));
    }
    Ok(value)
}

/// Files without executable lines count as fully covered.
fn percentage_from_lines(covered: u64, executable: u64, path: &str) -> Result<f64> {
    if covered > executable {
        return Err(CoverageError::decode(format!(
            "file '{}' reports {} covered of {} executable lines",
            path, covered, executable
        )));
    }
    if executable == 0 {
        return Ok(100.0);
    }
    Ok(round_percentage(covered as f64 / executable as f64 * 100.0))
}
