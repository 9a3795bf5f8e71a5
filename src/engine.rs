use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::concentration::ConcentrationSummary;
use crate::config::{load_rubric, Config, CONFIG_FILENAME};
use crate::entity::{discover_files, Entity};
use crate::error::{LoadError, ScoringError};
use crate::rubric::Rubric;
use crate::scoring::{compute_score, contribution, RatingLabel};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: String,
    pub measured: f64,
    pub sub_score: u8,
    pub weight: f64,
    pub contribution: f64,
}

/// Scored result for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub score: f64,
    pub label: RatingLabel,
    pub categories: Vec<CategoryScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concentration: Option<ConcentrationSummary>,
}

pub fn evaluate(rubric: &Rubric, entity: &Entity) -> Result<Evaluation, ScoringError> {
    let mut categories = Vec::with_capacity(rubric.categories().len());
    let mut sub_scores = BTreeMap::new();

    for rule in rubric.categories() {
        let measured = rule.measure(entity)?;
        let sub_score = rule.score_value(measured);
        sub_scores.insert(rule.name.clone(), sub_score);
        categories.push(CategoryScore {
            category: rule.name.clone(),
            measured,
            sub_score,
            weight: rule.weight,
            contribution: contribution(sub_score, rule.weight),
        });
    }

    let score = compute_score(&sub_scores, &rubric.weights())?;

    let concentration = if entity.ownership.is_empty() {
        None
    } else {
        Some(ConcentrationSummary::from_shares(&entity.shares())?)
    };

    Ok(Evaluation {
        identifier: entity.identifier.clone(),
        name: entity.name.clone(),
        score: score.value,
        label: score.label,
        categories,
        concentration,
    })
}

/// Evaluates entities independently and in parallel. Output order follows
/// the input.
pub fn evaluate_all(
    rubric: &Rubric,
    entities: &[Entity],
) -> Vec<(String, Result<Evaluation, ScoringError>)> {
    entities
        .par_iter()
        .map(|entity| (entity.identifier.clone(), evaluate(rubric, entity)))
        .collect()
}

/// An entity that could not be scored, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationFailure {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub error: String,
}

pub struct EngineResult {
    pub dataset_name: String,
    pub rubric: Rubric,
    pub evaluations: Vec<Evaluation>,
    pub failures: Vec<EvaluationFailure>,
    pub files_scanned: usize,
    pub fail_below: u32,
}

impl EngineResult {
    /// Evaluations under the configured CI floor; empty when no floor is set.
    pub fn below_threshold(&self) -> Vec<&Evaluation> {
        if self.fail_below == 0 {
            return vec![];
        }
        self.evaluations
            .iter()
            .filter(|e| e.score < f64::from(self.fail_below))
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.below_threshold().is_empty()
    }
}

pub fn run(path: &Path, rubric_override: Option<&Path>) -> Result<EngineResult, LoadError> {
    if !path.is_dir() {
        return Err(LoadError::MissingDataset(path.to_path_buf()));
    }

    let config = Config::load(path)?;
    let rubric = match rubric_override {
        Some(rubric_path) => load_rubric(rubric_path)?,
        None => config.rubric().map_err(|source| LoadError::Rubric {
            path: path.join(CONFIG_FILENAME),
            source,
        })?,
    };
    tracing::info!(rubric = %rubric, "loaded rubric");

    let files = discover_files(path, &config);
    let files_scanned = files.len();
    tracing::info!(files = files_scanned, dataset = %path.display(), "scanning dataset");

    let (entities, mut failures) = load_entities(path, &files);

    let mut evaluations = Vec::with_capacity(entities.len());
    for (identifier, outcome) in evaluate_all(&rubric, &entities) {
        match outcome {
            Ok(evaluation) => {
                tracing::debug!(
                    entity = %identifier,
                    score = evaluation.score,
                    label = %evaluation.label,
                    "evaluated"
                );
                evaluations.push(evaluation);
            }
            Err(err) => {
                tracing::warn!(entity = %identifier, error = %err, "evaluation failed");
                failures.push(EvaluationFailure {
                    identifier,
                    file: None,
                    error: err.to_string(),
                });
            }
        }
    }

    evaluations.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    failures.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    let dataset_name = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(EngineResult {
        dataset_name,
        rubric,
        evaluations,
        failures,
        files_scanned,
        fail_below: config.ci.fail_below,
    })
}

fn load_entities(root: &Path, files: &[PathBuf]) -> (Vec<Entity>, Vec<EvaluationFailure>) {
    let mut entities = Vec::with_capacity(files.len());
    let mut failures = Vec::new();
    let mut seen = HashSet::new();

    for file in files {
        let file_label = file
            .strip_prefix(root)
            .unwrap_or(file)
            .to_string_lossy()
            .replace('\\', "/");
        match Entity::load(file) {
            Ok(entity) if entity.identifier.trim().is_empty() => {
                failures.push(EvaluationFailure {
                    identifier: file_label.clone(),
                    file: Some(file_label),
                    error: "record has an empty identifier".to_string(),
                });
            }
            Ok(entity) => {
                if seen.insert(entity.identifier.clone()) {
                    entities.push(entity);
                } else {
                    tracing::warn!(entity = %entity.identifier, file = %file_label, "duplicate identifier");
                    failures.push(EvaluationFailure {
                        identifier: entity.identifier,
                        file: Some(file_label),
                        error: "duplicate identifier".to_string(),
                    });
                }
            }
            Err(err) => {
                tracing::warn!(file = %file_label, error = %err, "skipping unreadable record");
                failures.push(EvaluationFailure {
                    identifier: file_label.clone(),
                    file: Some(file_label),
                    error: err.to_string(),
                });
            }
        }
    }

    (entities, failures)
}
