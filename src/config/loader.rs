use std::fs;
use std::path::{Path, PathBuf};

use super::core::SymptomapConfig;
use crate::core::{DocumentFormat, Error, Result};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = ".symptomap.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<SymptomapConfig, String> {
    let mut config = toml::from_str::<SymptomapConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE_NAME}: {e}"))?;
    config.validate_sections();
    Ok(config)
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<SymptomapConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            debug!(path = %config_path.display(), "loaded config");
            Some(config)
        }
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "ignoring unreadable config, using defaults");
            None
        }
    }
}

/// Only log actual errors, not "file not found"
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        warn!(path = %config_path.display(), %error, "failed to read config file");
    }
}

/// Pure function to generate directory ancestors up to a depth limit
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

/// Search `start` and its ancestors for `.symptomap.toml`
pub fn discover_config(start: PathBuf) -> SymptomapConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                depth = MAX_TRAVERSAL_DEPTH,
                "no config found, using default config"
            );
            SymptomapConfig::default()
        })
}

/// Discover configuration from the current directory upwards
pub fn load_config() -> SymptomapConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            warn!(error = %e, "failed to get current directory, using default config");
            SymptomapConfig::default()
        }
    }
}

/// Load an explicitly named config file. Unlike discovery, failure is an error.
pub fn load_config_from(path: &Path) -> Result<SymptomapConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::file_system("Failed to read config file", path, e))?;
    let mut config = toml::from_str::<SymptomapConfig>(&contents)
        .map_err(|e| Error::parse(DocumentFormat::Toml, path, e.to_string()))?;
    config.validate_sections();
    Ok(config)
}

/// Explicit path wins; otherwise discover from the current directory
pub fn resolve_config(explicit: Option<&Path>) -> Result<SymptomapConfig> {
    match explicit {
        Some(path) => load_config_from(path),
        None => Ok(load_config()),
    }
}
