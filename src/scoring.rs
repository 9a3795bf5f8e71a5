use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::ScoringError;

pub const MAX_SUBSCORE: u8 = 5;
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingLabel {
    SignificantConcerns,
    NeedsImprovement,
    Satisfactory,
    Good,
    Strong,
    Exemplary,
}

impl RatingLabel {
    pub const ALL: [RatingLabel; 6] = [
        RatingLabel::SignificantConcerns,
        RatingLabel::NeedsImprovement,
        RatingLabel::Satisfactory,
        RatingLabel::Good,
        RatingLabel::Strong,
        RatingLabel::Exemplary,
    ];

    /// Inclusive lower bound of the band.
    pub fn lower_bound(&self) -> f64 {
        match self {
            RatingLabel::Exemplary => 90.0,
            RatingLabel::Strong => 80.0,
            RatingLabel::Good => 70.0,
            RatingLabel::Satisfactory => 60.0,
            RatingLabel::NeedsImprovement => 50.0,
            RatingLabel::SignificantConcerns => 0.0,
        }
    }
}

impl fmt::Display for RatingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingLabel::Exemplary => write!(f, "Exemplary Governance"),
            RatingLabel::Strong => write!(f, "Strong Governance"),
            RatingLabel::Good => write!(f, "Good Governance"),
            RatingLabel::Satisfactory => write!(f, "Satisfactory Governance"),
            RatingLabel::NeedsImprovement => write!(f, "Needs Improvement"),
            RatingLabel::SignificantConcerns => write!(f, "Significant Concerns"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    pub value: f64,
    pub label: RatingLabel,
}

/// Weighted aggregate of 0-5 sub-scores on a 0-100 scale.
pub fn aggregate(
    sub_scores: &BTreeMap<String, u8>,
    weights: &BTreeMap<String, f64>,
) -> Result<f64, ScoringError> {
    let unweighted: Vec<String> = sub_scores
        .keys()
        .filter(|k| !weights.contains_key(*k))
        .cloned()
        .collect();
    let unscored: Vec<String> = weights
        .keys()
        .filter(|k| !sub_scores.contains_key(*k))
        .cloned()
        .collect();
    if !unweighted.is_empty() || !unscored.is_empty() {
        return Err(ScoringError::SchemaMismatch {
            unweighted,
            unscored,
        });
    }

    let weight_sum = check_weights(weights)?;

    for (category, score) in sub_scores {
        if *score > MAX_SUBSCORE {
            return Err(ScoringError::invalid_input(
                category.clone(),
                format!("sub-score {score} above {MAX_SUBSCORE}"),
            ));
        }
    }

    let weighted: f64 = weights
        .iter()
        .map(|(category, weight)| normalized(sub_scores[category]) * weight)
        .sum();

    // Dividing by the same-order weight sum makes an all-max rubric land on
    // exactly 100.
    Ok((weighted / weight_sum * 100.0).clamp(0.0, 100.0))
}

/// Validates a weight table and returns its sum.
pub fn check_weights(weights: &BTreeMap<String, f64>) -> Result<f64, ScoringError> {
    for (category, weight) in weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(ScoringError::invalid_input(
                category.clone(),
                format!("weight {weight} must be a finite non-negative number"),
            ));
        }
    }
    let sum: f64 = weights.values().sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ScoringError::InvalidWeights {
            sum,
            tolerance: WEIGHT_TOLERANCE,
        });
    }
    Ok(sum)
}

/// Points a category adds to the aggregate.
pub fn contribution(sub_score: u8, weight: f64) -> f64 {
    normalized(sub_score) * weight * 100.0
}

fn normalized(sub_score: u8) -> f64 {
    f64::from(sub_score) / f64::from(MAX_SUBSCORE)
}

pub fn label_for_score(score: f64) -> RatingLabel {
    match score {
        s if s >= 90.0 => RatingLabel::Exemplary,
        s if s >= 80.0 => RatingLabel::Strong,
        s if s >= 70.0 => RatingLabel::Good,
        s if s >= 60.0 => RatingLabel::Satisfactory,
        s if s >= 50.0 => RatingLabel::NeedsImprovement,
        _ => RatingLabel::SignificantConcerns,
    }
}

pub fn compute_score(
    sub_scores: &BTreeMap<String, u8>,
    weights: &BTreeMap<String, f64>,
) -> Result<ScoreResult, ScoringError> {
    let value = aggregate(sub_scores, weights)?;
    Ok(ScoreResult {
        value,
        label: label_for_score(value),
    })
}
