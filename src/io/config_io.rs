use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::warn;

use crate::model::config::{AppConfig, View};

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Platform directories for atria (`~/.config/atria` on Linux)
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "atria")
}

/// Default location of `config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

/// Default directory for log files
pub fn default_log_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_local_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("atria"))
}

/// Load the config from `explicit` or the default location.
///
/// A missing default file means defaults. A missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => Ok(AppConfig::default()),
        },
    }
}

/// Read and parse one config file
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: AppConfig = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(config)
}

/// Values that parse but mean nothing to atria. Sorted for stable output.
pub fn config_warnings(config: &AppConfig) -> Vec<String> {
    const PRIORITIES: [&str; 3] = ["urgent", "medium", "low"];
    let mut warnings = Vec::new();
    let mut keys: Vec<&String> = config.ui.priority_colors.keys().collect();
    keys.sort();
    for key in keys {
        if !PRIORITIES.contains(&key.as_str()) {
            warnings.push(format!("unknown priority '{}' in [ui.priority_colors]", key));
        }
    }
    if let Some(view) = config.ui.start_view.as_deref()
        && view.parse::<View>().is_err()
    {
        warnings.push(format!("unknown [ui] start_view '{}', using projects", view));
    }
    warnings
}

/// Log `config_warnings`. Call once the subscriber is installed.
pub fn log_config_warnings(config: &AppConfig) {
    for warning in config_warnings(config) {
        warn!("{}", warning);
    }
}
