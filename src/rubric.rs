use std::collections::{BTreeMap, HashSet};
use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::concentration::compute_concentration_index;
use crate::entity::Entity;
use crate::error::ScoringError;
use crate::scoring::{check_weights, MAX_SUBSCORE};

/// Lowest score a threshold band or floor may assign.
pub const MIN_RUBRIC_SCORE: u8 = 1;

/// Where a category takes its measured value from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricSource {
    Metric { name: String },
    Percentage { numerator: String, denominator: String },
    OwnershipConcentration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub bound: f64,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub weight: f64,
    pub source: MetricSource,
    pub direction: Direction,
    #[serde(default)]
    pub thresholds: Vec<Threshold>,
    #[serde(default = "default_floor")]
    pub floor: u8,
}

fn default_floor() -> u8 {
    MIN_RUBRIC_SCORE
}

impl CategoryRule {
    /// Reads the raw value this category is scored on.
    pub fn measure(&self, entity: &Entity) -> Result<f64, ScoringError> {
        match &self.source {
            MetricSource::Metric { name } => self.require(entity, name),
            MetricSource::Percentage {
                numerator,
                denominator,
            } => {
                let num = self.require(entity, numerator)?;
                let den = self.require(entity, denominator)?;
                if num < 0.0 || den < 0.0 {
                    return Err(ScoringError::invalid_input(
                        format!("{}.{}", entity.identifier, self.name),
                        format!("negative operand in {numerator} / {denominator}"),
                    ));
                }
                if den == 0.0 {
                    return Err(ScoringError::invalid_input(
                        format!("{}.{denominator}", entity.identifier),
                        "denominator is zero",
                    ));
                }
                if num > den {
                    return Err(ScoringError::invalid_input(
                        format!("{}.{}", entity.identifier, self.name),
                        format!("{numerator} ({num}) exceeds {denominator} ({den})"),
                    ));
                }
                Ok(num / den * 100.0)
            }
            MetricSource::OwnershipConcentration => {
                // No holder owning anything is missing data, not dispersion.
                if entity.ownership.iter().all(|h| h.shares == 0.0) {
                    return Err(ScoringError::MissingMetric {
                        category: self.name.clone(),
                        metric: "ownership".to_string(),
                    });
                }
                compute_concentration_index(&entity.shares())
            }
        }
    }

    /// Maps a measured value onto the threshold table.
    pub fn score_value(&self, value: f64) -> u8 {
        self.thresholds
            .iter()
            .find(|t| match self.direction {
                Direction::HigherIsBetter => value >= t.bound,
                Direction::LowerIsBetter => value <= t.bound,
            })
            .map(|t| t.score)
            .unwrap_or(self.floor)
    }

    fn require(&self, entity: &Entity, metric: &str) -> Result<f64, ScoringError> {
        let value = entity
            .metric(metric)
            .ok_or_else(|| ScoringError::MissingMetric {
                category: self.name.clone(),
                metric: metric.to_string(),
            })?;
        if !value.is_finite() {
            return Err(ScoringError::invalid_input(
                format!("{}.{metric}", entity.identifier),
                "value is not a finite number",
            ));
        }
        Ok(value)
    }

    /// Checks scores, floor and table ordering. `Rubric::new` runs this for
    /// every category.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let in_range = |s: u8| (MIN_RUBRIC_SCORE..=MAX_SUBSCORE).contains(&s);

        if !in_range(self.floor) {
            return Err(ScoringError::invalid_rubric(format!(
                "category `{}` floor {} outside {MIN_RUBRIC_SCORE}..={MAX_SUBSCORE}",
                self.name, self.floor
            )));
        }

        for t in &self.thresholds {
            if !in_range(t.score) {
                return Err(ScoringError::invalid_rubric(format!(
                    "category `{}` threshold score {} outside {MIN_RUBRIC_SCORE}..={MAX_SUBSCORE}",
                    self.name, t.score
                )));
            }
            if !t.bound.is_finite() {
                return Err(ScoringError::invalid_rubric(format!(
                    "category `{}` has a non-finite threshold bound",
                    self.name
                )));
            }
        }

        for pair in self.thresholds.windows(2) {
            let ordered = match self.direction {
                Direction::HigherIsBetter => pair[0].bound > pair[1].bound,
                Direction::LowerIsBetter => pair[0].bound < pair[1].bound,
            };
            if !ordered {
                return Err(ScoringError::invalid_rubric(format!(
                    "category `{}` threshold bounds must be strictly {}",
                    self.name,
                    match self.direction {
                        Direction::HigherIsBetter => "descending",
                        Direction::LowerIsBetter => "ascending",
                    }
                )));
            }
            if pair[1].score > pair[0].score {
                return Err(ScoringError::invalid_rubric(format!(
                    "category `{}` threshold scores must not increase down the table",
                    self.name
                )));
            }
        }

        if let Some(last) = self.thresholds.last() {
            if self.floor > last.score {
                return Err(ScoringError::invalid_rubric(format!(
                    "category `{}` floor {} is above its lowest band score {}",
                    self.name, self.floor, last.score
                )));
            }
        }

        Ok(())
    }
}

/// A validated set of weighted categories. Construction fails unless the
/// weights sum to one and every threshold table is well formed, so a
/// `Rubric` value is always usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RubricDef", into = "RubricDef")]
pub struct Rubric {
    name: String,
    version: Version,
    categories: Vec<CategoryRule>,
}

/// Unvalidated rubric as written in a config file. Turn it into a
/// [`Rubric`] with `Rubric::try_from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricDef {
    pub name: String,
    pub version: Version,
    pub categories: Vec<CategoryRule>,
}

impl TryFrom<RubricDef> for Rubric {
    type Error = ScoringError;

    fn try_from(def: RubricDef) -> Result<Self, Self::Error> {
        Rubric::new(def.name, def.version, def.categories)
    }
}

impl From<Rubric> for RubricDef {
    fn from(rubric: Rubric) -> Self {
        RubricDef {
            name: rubric.name,
            version: rubric.version,
            categories: rubric.categories,
        }
    }
}

impl Rubric {
    pub fn new(
        name: impl Into<String>,
        version: Version,
        categories: Vec<CategoryRule>,
    ) -> Result<Self, ScoringError> {
        if categories.is_empty() {
            return Err(ScoringError::invalid_rubric("no categories defined"));
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.name.as_str()) {
                return Err(ScoringError::invalid_rubric(format!(
                    "duplicate category `{}`",
                    category.name
                )));
            }
            category.validate()?;
        }

        let weights: BTreeMap<String, f64> = categories
            .iter()
            .map(|c| (c.name.clone(), c.weight))
            .collect();
        check_weights(&weights)?;

        Ok(Rubric {
            name: name.into(),
            version,
            categories,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn categories(&self) -> &[CategoryRule] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryRule> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn weights(&self) -> BTreeMap<String, f64> {
        self.categories
            .iter()
            .map(|c| (c.name.clone(), c.weight))
            .collect()
    }

    /// The built-in corporate governance rubric.
    pub fn standard() -> Self {
        let t = |pairs: &[(f64, u8)]| -> Vec<Threshold> {
            pairs
                .iter()
                .map(|&(bound, score)| Threshold { bound, score })
                .collect()
        };

        let categories = vec![
            CategoryRule {
                name: "board_independence".to_string(),
                weight: 0.25,
                source: MetricSource::Percentage {
                    numerator: "independent_directors".to_string(),
                    denominator: "total_directors".to_string(),
                },
                direction: Direction::HigherIsBetter,
                thresholds: t(&[(75.0, 5), (66.0, 4), (50.0, 3), (33.0, 2)]),
                floor: 1,
            },
            CategoryRule {
                name: "ownership_concentration".to_string(),
                weight: 0.15,
                source: MetricSource::OwnershipConcentration,
                direction: Direction::LowerIsBetter,
                thresholds: t(&[(1500.0, 5), (2500.0, 4), (4000.0, 3), (6000.0, 2)]),
                floor: 1,
            },
            CategoryRule {
                name: "pay_for_performance".to_string(),
                weight: 0.20,
                source: MetricSource::Percentage {
                    numerator: "variable_compensation".to_string(),
                    denominator: "total_compensation".to_string(),
                },
                direction: Direction::HigherIsBetter,
                thresholds: t(&[(70.0, 5), (55.0, 4), (40.0, 3), (25.0, 2)]),
                floor: 1,
            },
            CategoryRule {
                name: "audit_committee_independence".to_string(),
                weight: 0.15,
                source: MetricSource::Percentage {
                    numerator: "independent_audit_members".to_string(),
                    denominator: "audit_committee_members".to_string(),
                },
                direction: Direction::HigherIsBetter,
                thresholds: t(&[(100.0, 5), (75.0, 4), (50.0, 3), (25.0, 2)]),
                floor: 1,
            },
            CategoryRule {
                name: "board_attendance".to_string(),
                weight: 0.15,
                source: MetricSource::Metric {
                    name: "meeting_attendance_pct".to_string(),
                },
                direction: Direction::HigherIsBetter,
                thresholds: t(&[(95.0, 5), (90.0, 4), (85.0, 3), (75.0, 2)]),
                floor: 1,
            },
            CategoryRule {
                name: "disclosure_quality".to_string(),
                weight: 0.10,
                source: MetricSource::Metric {
                    name: "disclosure_rating".to_string(),
                },
                direction: Direction::HigherIsBetter,
                thresholds: t(&[(9.0, 5), (7.0, 4), (5.0, 3), (3.0, 2)]),
                floor: 1,
            },
        ];

        // Fixed table above satisfies every rubric check.
        Rubric {
            name: "Corporate Governance Rubric".to_string(),
            version: Version::new(1, 0, 0),
            categories,
        }
    }
}

impl fmt::Display for Rubric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

/// Sub-score for one category, always in `1..=5`. Fails with
/// `InvalidRubric` when the rule itself is malformed.
pub fn compute_category_subscore(rule: &CategoryRule, entity: &Entity) -> Result<u8, ScoringError> {
    rule.validate()?;
    let value = rule.measure(entity)?;
    Ok(rule.score_value(value))
}
