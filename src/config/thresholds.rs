use serde::{Deserialize, Serialize};

/// Gate thresholds, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageThresholds {
    /// A file row passes when strictly above this.
    #[serde(default = "default_minimum_coverage")]
    pub minimum_coverage: f64,

    /// A section fails its gate when strictly below this.
    #[serde(default = "default_minimum_project_coverage")]
    pub minimum_project_coverage: f64,
}

impl Default for CoverageThresholds {
    fn default() -> Self {
        Self {
            minimum_coverage: default_minimum_coverage(),
            minimum_project_coverage: default_minimum_project_coverage(),
        }
    }
}

impl CoverageThresholds {
    pub fn new(minimum_coverage: f64, minimum_project_coverage: f64) -> Self {
        Self {
            minimum_coverage,
            minimum_project_coverage,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("minimum_coverage", self.minimum_coverage),
            ("minimum_project_coverage", self.minimum_project_coverage),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(format!("{} must be between 0 and 100, got {}", name, value));
            }
        }
        Ok(())
    }
}

fn default_minimum_coverage() -> f64 {
    0.0
}
fn default_minimum_project_coverage() -> f64 {
    0.0
}
