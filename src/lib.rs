pub mod concentration;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod reporter;
pub mod rubric;
pub mod scoring;
pub mod telemetry;

pub use concentration::{compute_concentration_index, ConcentrationLevel};
pub use engine::{evaluate, Evaluation};
pub use entity::Entity;
pub use error::{LoadError, ScoringError};
pub use rubric::{compute_category_subscore, Rubric};
pub use scoring::{aggregate, label_for_score, RatingLabel};
