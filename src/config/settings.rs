use super::thresholds::CoverageThresholds;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure, read from `.covgate.toml`.
///
/// ```toml
/// excluded_targets = ["DangerTests.xctest"]
/// hide_project_coverage = false
/// file_extensions = ["swift"]
///
/// [thresholds]
/// minimum_coverage = 50.0
/// minimum_project_coverage = 60.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovgateConfig {
    #[serde(default)]
    pub thresholds: CoverageThresholds,

    /// Targets never reported when a change set is given.
    #[serde(default)]
    pub excluded_targets: Vec<String>,

    #[serde(default)]
    pub hide_project_coverage: bool,

    /// Extensions of files listed in reports. Empty lists every file.
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// Folder holding pre-exported flat coverage summaries.
    #[serde(default = "default_spm_coverage_folder")]
    pub spm_coverage_folder: PathBuf,
}

impl Default for CovgateConfig {
    fn default() -> Self {
        Self {
            thresholds: CoverageThresholds::default(),
            excluded_targets: Vec::new(),
            hide_project_coverage: false,
            file_extensions: default_file_extensions(),
            spm_coverage_folder: default_spm_coverage_folder(),
        }
    }
}

fn default_file_extensions() -> Vec<String> {
    vec!["swift".to_string()]
}

fn default_spm_coverage_folder() -> PathBuf {
    PathBuf::from(".build/debug/codecov")
}
