use serde::Deserialize;
use std::path::Path;

use crate::error::{LoadError, ScoringError};
use crate::rubric::{Rubric, RubricDef};

pub const CONFIG_FILENAME: &str = "govscore.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rubric: Option<RubricDef>,
    pub ignore: IgnoreConfig,
    pub ci: CiConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CiConfig {
    pub fail_below: u32,
}

impl Config {
    pub fn load(dataset_root: &Path) -> Result<Self, LoadError> {
        let config_path = dataset_root.join(CONFIG_FILENAME);
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(&config_path).map_err(|source| LoadError::Io {
            path: config_path.clone(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| LoadError::Toml {
            path: config_path,
            source,
        })
    }

    /// The configured rubric, or the built-in one. The inline rubric is only
    /// validated here, so an override on the command line can bypass it.
    pub fn rubric(&self) -> Result<Rubric, ScoringError> {
        match &self.rubric {
            Some(def) => Rubric::try_from(def.clone()),
            None => Ok(Rubric::standard()),
        }
    }

    pub fn is_file_ignored(&self, dataset_root: &Path, file_path: &Path) -> bool {
        let absolute = file_path.to_string_lossy().replace('\\', "/");
        let relative = file_path
            .strip_prefix(dataset_root)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| absolute.clone());

        self.ignore.files.iter().any(|pattern| match glob::Pattern::new(pattern) {
            Ok(glob) => glob.matches(&relative) || glob.matches(&absolute),
            Err(err) => {
                tracing::warn!(pattern = %pattern, error = %err, "ignoring malformed glob");
                false
            }
        })
    }
}

/// Reads a standalone rubric file, validating it on the way in.
pub fn load_rubric(path: &Path) -> Result<Rubric, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let def: RubricDef = toml::from_str(&contents).map_err(|source| LoadError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    Rubric::try_from(def).map_err(|source| LoadError::Rubric {
        path: path.to_path_buf(),
        source,
    })
}
