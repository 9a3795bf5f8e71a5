use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{Config, CONFIG_FILENAME};
use crate::error::LoadError;

/// A subject under evaluation, usually one company keyed by ticker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub ownership: Vec<Holding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub holder: String,
    pub shares: f64,
}

impl Entity {
    pub fn new(identifier: impl Into<String>) -> Self {
        Entity {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    pub fn with_holding(mut self, holder: impl Into<String>, shares: f64) -> Self {
        self.ownership.push(Holding {
            holder: holder.into(),
            shares,
        });
        self
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    pub fn shares(&self) -> Vec<f64> {
        self.ownership.iter().map(|h| h.shares).collect()
    }

    /// Parses one record file. The format follows the extension: `.json` is
    /// read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&contents).map_err(|source| LoadError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Lists every entity record under `root`, sorted, skipping the config file
/// and anything matched by the ignore globs.
pub fn discover_files(root: &Path, config: &Config) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_dir(root, root, config, &mut files);
    files.sort();
    files
}

fn walk_dir(root: &Path, dir: &Path, config: &Config, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable directory");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with('.'))
            {
                continue;
            }
            walk_dir(root, &path, config, files);
        } else if is_record_file(&path)
            && !is_config_file(root, &path)
            && !config.is_file_ignored(root, &path)
        {
            files.push(path);
        }
    }
}

fn is_record_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("toml" | "json")
    )
}

fn is_config_file(root: &Path, path: &Path) -> bool {
    path.parent() == Some(root) && path.file_name().is_some_and(|n| n == CONFIG_FILENAME)
}
