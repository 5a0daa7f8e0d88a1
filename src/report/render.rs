//! Markdown rendering and gate evaluation.
//!
//! Each section becomes a three-column markdown table. A file row gets the
//! pass marker only when its percentage is strictly above the file threshold;
//! equal renders the warn marker. Every section is gated on its own
//! aggregate, strictly below the project threshold failing.

use super::{Report, ReportSection};
use crate::config::CoverageThresholds;
use crate::model::format_percentage;
use serde::Serialize;

pub const PASS_MARKER: &str = "✅";
pub const WARN_MARKER: &str = "⚠️";

const TABLE_HEADER: &str = "| File | Coverage ||\n| --- | --- | --- |\n";

/// Text ready for the feedback collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedReport {
    /// Informational messages, verbatim.
    pub messages: Vec<String>,
    pub sections: Vec<RenderedSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSection {
    pub markdown: String,
    /// Present when the section's aggregate is below the project threshold.
    pub gate_failure: Option<String>,
}

impl RenderedReport {
    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .filter_map(|section| section.gate_failure.as_deref())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

impl ReportSection {
    /// Value compared against the project threshold; flat sections gate on 0.
    pub fn gate_value(&self) -> f64 {
        self.gate_percentage.unwrap_or(0.0)
    }

    pub fn to_markdown(&self, minimum_coverage: f64) -> String {
        let mut markdown = match &self.title {
            Some(title) => format!("## {}\n", title),
            None => String::new(),
        };
        markdown.push_str(TABLE_HEADER);

        for item in &self.items {
            let marker = if item.percentage > minimum_coverage {
                PASS_MARKER
            } else {
                WARN_MARKER
            };
            markdown.push_str(&format!(
                "{} | {}% | {}\n",
                item.name,
                format_percentage(item.percentage),
                marker
            ));
        }
        markdown
    }

    pub fn gate_failure(&self, minimum_project_coverage: f64) -> Option<String> {
        let coverage = self.gate_value();
        (coverage < minimum_project_coverage).then(|| {
            format!(
                "Current project code coverage {}% is lower than minimum threshold of {}%",
                format_percentage(coverage),
                format_percentage(minimum_project_coverage)
            )
        })
    }
}

pub fn render_report(report: &Report, thresholds: &CoverageThresholds) -> RenderedReport {
    let sections = report
        .sections
        .iter()
        .map(|section| RenderedSection {
            markdown: section.to_markdown(thresholds.minimum_coverage),
            gate_failure: section.gate_failure(thresholds.minimum_project_coverage),
        })
        .collect();

    RenderedReport {
        messages: report.messages.clone(),
        sections,
    }
}
