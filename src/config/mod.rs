//! Run configuration: thresholds, exclusions and report knobs.
//!
//! Values come from `.covgate.toml`, found either at an explicit path or by
//! walking up from the working directory, and are then overridden by CLI
//! flags in `main.rs`.

mod settings;
mod loader;
mod thresholds;

pub use settings::CovgateConfig;
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_file,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use thresholds::CoverageThresholds;
