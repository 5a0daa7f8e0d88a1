use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::settings::CovgateConfig;

pub const CONFIG_FILE_NAME: &str = ".covgate.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<CovgateConfig, String> {
    let config = toml::from_str::<CovgateConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;
    config.thresholds.validate()?;
    Ok(config)
}

/// Try loading config from a specific path during discovery.
///
/// Missing files are silent; unreadable or invalid ones are warned about and
/// skipped.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<CovgateConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `.covgate.toml` upward from `start`, falling back to defaults.
pub fn discover_config(start: PathBuf) -> CovgateConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            CovgateConfig::default()
        })
}

/// Load an explicitly requested config file. Unlike discovery, any problem
/// is an error.
pub fn load_config_file(path: &Path) -> Result<CovgateConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_and_validate_config(&contents).map_err(anyhow::Error::msg)
}

/// Resolve the configuration for this run.
pub fn load_config(explicit: Option<&Path>) -> Result<CovgateConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    match std::env::current_dir() {
        Ok(dir) => Ok(discover_config(dir)),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            Ok(CovgateConfig::default())
        }
    }
}
