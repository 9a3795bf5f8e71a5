pub mod cli;
pub mod json;

use crate::engine::EngineResult;

pub trait Reporter {
    fn format(&self, result: &EngineResult, verbose: bool) -> String;
}

/// One `identifier score` line per evaluation.
pub fn score_only(result: &EngineResult) -> String {
    result
        .evaluations
        .iter()
        .map(|e| format!("{} {:.1}\n", e.identifier, e.score))
        .collect()
}
