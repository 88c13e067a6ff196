//! Solver configuration.
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes:
//!
//! ```json
//! { "genetic": { "population_size": 50 }, "random_search": { "generations": 10 } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::{GaConfig, RandomSearchConfig};

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-algorithm settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub genetic: GaConfig,
    pub random_search: RandomSearchConfig,
}

impl SolverConfig {
    pub fn with_genetic(mut self, genetic: GaConfig) -> Self {
        self.genetic = genetic;
        self
    }

    pub fn with_random_search(mut self, random_search: RandomSearchConfig) -> Self {
        self.random_search = random_search;
        self
    }

    /// Parses a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
