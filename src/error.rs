use std::path::PathBuf;

/// Failures raised by the scoring core. Every variant names the offending
/// category, metric or field so the upstream data can be corrected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("category `{category}` requires metric `{metric}`, which was not supplied")]
    MissingMetric { category: String, metric: String },

    #[error(
        "sub-scores and weights disagree on categories (no weight: [{}]; no sub-score: [{}])",
        .unweighted.join(", "),
        .unscored.join(", ")
    )]
    SchemaMismatch {
        unweighted: Vec<String>,
        unscored: Vec<String>,
    },

    #[error("category weights sum to {sum}, expected 1.0 within {tolerance}")]
    InvalidWeights { sum: f64, tolerance: f64 },

    #[error("invalid rubric: {reason}")]
    InvalidRubric { reason: String },
}

impl ScoringError {
    pub(crate) fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScoringError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_rubric(reason: impl Into<String>) -> Self {
        ScoringError::InvalidRubric {
            reason: reason.into(),
        }
    }
}

/// Failures while reading configuration, rubrics or entity records from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid rubric in {}: {source}", .path.display())]
    Rubric {
        path: PathBuf,
        #[source]
        source: ScoringError,
    },

    #[error("dataset directory not found: {}", .0.display())]
    MissingDataset(PathBuf),
}
