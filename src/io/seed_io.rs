use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::model::seed::Seed;

/// Error type for loading a fixture
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("built-in fixture is invalid: {0}")]
    Builtin(#[from] serde_json::Error),
}

/// Load the fixture at `path`, or the built-in one when `path` is `None`
pub fn load_seed(path: Option<&Path>) -> Result<Seed, SeedError> {
    let Some(path) = path else {
        return Ok(Seed::builtin()?);
    };
    let text = fs::read_to_string(path).map_err(|e| SeedError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let seed: Seed = serde_json::from_str(&text).map_err(|e| SeedError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(
        path = %path.display(),
        projects = seed.projects.len(),
        tasks = seed.tasks.len(),
        files = seed.files.len(),
        "loaded fixture"
    );
    Ok(seed)
}
