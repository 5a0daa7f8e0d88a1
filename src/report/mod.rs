//! Report construction from a (possibly filtered) coverage model.
//!
//! A [`Report`] is an ordered list of informational messages plus an ordered
//! list of [`ReportSection`]s. Target models yield one titled section per
//! surviving target; flat models yield a single untitled section.
//!
//! Once a change set narrowed the model, a section left with no listed
//! files (e.g. every changed file is hidden by the extension allow-list) is
//! dropped along with the target. An empty change set keeps every section.

pub mod render;

pub use render::{render_report, RenderedReport, RenderedSection, PASS_MARKER, WARN_MARKER};

use crate::filter::ChangeSet;
use crate::model::{format_percentage, CoverageExport, CoverageModel, FlatCoverage};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub messages: Vec<String>,
    pub sections: Vec<ReportSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub title: Option<String>,
    /// Aggregate the section is gated on; `None` for flat coverage.
    pub gate_percentage: Option<f64>,
    pub items: Vec<ReportFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportFile {
    pub name: String,
    pub percentage: f64,
}

/// Knobs for turning a model into a report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportOptions {
    /// Suppress the `Project coverage` message.
    pub hide_project_coverage: bool,
    /// Only list files with one of these extensions (case-insensitive).
    /// Empty lists every file.
    pub file_extensions: Vec<String>,
    /// Prefix removed from flat-coverage file names for display.
    pub strip_prefix: Option<PathBuf>,
}

impl ReportOptions {
    fn includes(&self, path: &Path) -> bool {
        if self.file_extensions.is_empty() {
            return true;
        }
        path.extension().is_some_and(|ext| {
            self.file_extensions
                .iter()
                .any(|wanted| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.')))
        })
    }

    fn display_name(&self, path: &Path) -> String {
        let shown = self
            .strip_prefix
            .as_deref()
            .and_then(|prefix| path.strip_prefix(prefix).ok())
            .unwrap_or(path);
        shown.display().to_string()
    }
}

/// Build the report for a model already filtered with `change_set`.
pub fn build_report(
    model: &CoverageModel,
    change_set: &ChangeSet,
    options: &ReportOptions,
) -> Report {
    let mut sections = match model {
        CoverageModel::Targets(export) => target_sections(export, options),
        CoverageModel::Flat(flat) => vec![flat_section(flat, options)],
    };
    if !change_set.is_empty() {
        sections.retain(|section| !section.items.is_empty());
    }

    let messages = match model.aggregate_percentage() {
        Some(percentage) if !sections.is_empty() && !options.hide_project_coverage => {
            vec![format!(
                "Project coverage: {}%",
                format_percentage(percentage)
            )]
        }
        _ => Vec::new(),
    };

    Report { messages, sections }
}

fn target_sections(export: &CoverageExport, options: &ReportOptions) -> Vec<ReportSection> {
    export
        .targets
        .iter()
        .map(|target| ReportSection {
            title: Some(format!(
                "{}: Coverage: {}%",
                target.name,
                format_percentage(target.percentage)
            )),
            gate_percentage: Some(target.percentage),
            items: target
                .files
                .iter()
                .filter(|file| options.includes(Path::new(&file.name)))
                .map(|file| ReportFile {
                    name: file.name.clone(),
                    percentage: file.percentage,
                })
                .collect(),
        })
        .collect()
}

fn flat_section(flat: &FlatCoverage, options: &ReportOptions) -> ReportSection {
    ReportSection {
        title: None,
        gate_percentage: None,
        items: flat
            .files()
            .filter(|file| options.includes(&file.filename))
            .map(|file| ReportFile {
                name: options.display_name(&file.filename),
                percentage: file.percent,
            })
            .collect(),
    }
}
