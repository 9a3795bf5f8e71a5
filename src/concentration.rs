use std::fmt;

use serde::Serialize;

use crate::error::ScoringError;

/// Upper bound of the index: a single holder with 100%.
pub const MAX_INDEX: f64 = 10_000.0;

const PERCENT_TOLERANCE: f64 = 1e-6;

/// Herfindahl-Hirschman index of a set of absolute holdings.
///
/// Each value is normalized to a percentage of the total before squaring, so
/// the result lies in `[10000 / n, 10000]` for `n` positive holdings. An empty
/// slice, or one where nobody holds anything, has an index of zero.
pub fn compute_concentration_index(shares: &[f64]) -> Result<f64, ScoringError> {
    for (i, value) in shares.iter().enumerate() {
        check_holding(i, *value)?;
    }

    let largest = shares.iter().copied().fold(0.0, f64::max);
    if largest == 0.0 {
        return Ok(0.0);
    }

    // Scaled by the largest holding so the total stays finite for huge values.
    let total: f64 = shares.iter().map(|value| value / largest).sum();
    let index = shares
        .iter()
        .map(|value| {
            let pct = value / largest / total * 100.0;
            pct * pct
        })
        .sum::<f64>();

    Ok(index.min(MAX_INDEX))
}

/// Index for values that are already percentages of the whole (summing to at
/// most 100). No renormalization happens, so unlisted float still counts as
/// dispersed ownership.
pub fn concentration_index_from_percentages(pcts: &[f64]) -> Result<f64, ScoringError> {
    for (i, value) in pcts.iter().enumerate() {
        check_holding(i, *value)?;
        if *value > 100.0 {
            return Err(ScoringError::invalid_input(
                format!("ownership[{i}]"),
                format!("percentage {value} exceeds 100"),
            ));
        }
    }

    let total: f64 = pcts.iter().sum();
    if total > 100.0 + PERCENT_TOLERANCE {
        return Err(ScoringError::invalid_input(
            "ownership",
            format!("percentages sum to {total}, above 100"),
        ));
    }

    Ok(pcts.iter().map(|p| p * p).sum::<f64>().min(MAX_INDEX))
}

fn check_holding(i: usize, value: f64) -> Result<(), ScoringError> {
    if !value.is_finite() {
        return Err(ScoringError::invalid_input(
            format!("ownership[{i}]"),
            "value is not a finite number",
        ));
    }
    if value < 0.0 {
        return Err(ScoringError::invalid_input(
            format!("ownership[{i}]"),
            format!("negative holding {value}"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationLevel {
    Unconcentrated,
    Moderate,
    High,
}

impl ConcentrationLevel {
    /// Antitrust-style bands: below 1500, 1500 through 2500, above 2500.
    pub fn from_index(index: f64) -> Self {
        if index > 2500.0 {
            ConcentrationLevel::High
        } else if index >= 1500.0 {
            ConcentrationLevel::Moderate
        } else {
            ConcentrationLevel::Unconcentrated
        }
    }
}

impl fmt::Display for ConcentrationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcentrationLevel::Unconcentrated => write!(f, "unconcentrated"),
            ConcentrationLevel::Moderate => write!(f, "moderately concentrated"),
            ConcentrationLevel::High => write!(f, "highly concentrated"),
        }
    }
}

/// Index plus its band, attached to an evaluation when holdings are known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcentrationSummary {
    pub index: f64,
    pub level: ConcentrationLevel,
    pub holders: usize,
}

impl ConcentrationSummary {
    pub fn from_shares(shares: &[f64]) -> Result<Self, ScoringError> {
        let index = compute_concentration_index(shares)?;
        Ok(ConcentrationSummary {
            index,
            level: ConcentrationLevel::from_index(index),
            holders: shares.iter().filter(|s| **s > 0.0).count(),
        })
    }
}
