use serde::Serialize;

use crate::engine::{EngineResult, Evaluation, EvaluationFailure};

use super::Reporter;

pub struct JsonReporter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    version: &'static str,
    dataset: &'a str,
    rubric: RubricJson,
    summary: SummaryJson,
    evaluations: &'a [Evaluation],
    failures: &'a [EvaluationFailure],
}

#[derive(Serialize)]
struct RubricJson {
    name: String,
    version: String,
}

#[derive(Serialize)]
struct SummaryJson {
    entities: usize,
    evaluated: usize,
    failed: usize,
    below_threshold: usize,
    mean_score: Option<f64>,
    files_scanned: usize,
}

impl Reporter for JsonReporter {
    fn format(&self, result: &EngineResult, _verbose: bool) -> String {
        let evaluated = result.evaluations.len();
        let mean_score = if evaluated == 0 {
            None
        } else {
            Some(result.evaluations.iter().map(|e| e.score).sum::<f64>() / evaluated as f64)
        };
        let output = JsonOutput {
            version: env!("CARGO_PKG_VERSION"),
            dataset: &result.dataset_name,
            rubric: RubricJson {
                name: result.rubric.name().to_string(),
                version: result.rubric.version().to_string(),
            },
            summary: SummaryJson {
                entities: evaluated + result.failures.len(),
                evaluated,
                failed: result.failures.len(),
                below_threshold: result.below_threshold().len(),
                mean_score,
                files_scanned: result.files_scanned,
            },
            evaluations: &result.evaluations,
            failures: &result.failures,
        };
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
