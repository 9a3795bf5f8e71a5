use owo_colors::OwoColorize;

use crate::engine::{EngineResult, Evaluation};
use crate::scoring::RatingLabel;

use super::Reporter;

pub struct CliReporter;

impl Reporter for CliReporter {
    fn format(&self, result: &EngineResult, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "\n  {} v{}\n\n",
            "govscore".bold(),
            env!("CARGO_PKG_VERSION")
        ));
        out.push_str(&format!("  Dataset: {}\n", result.dataset_name));
        out.push_str(&format!("  Rubric:  {}\n", result.rubric));
        out.push_str(&format!(
            "  {} evaluated, {} failed\n",
            result.evaluations.len().to_string().green(),
            result.failures.len().to_string().red()
        ));

        if !result.evaluations.is_empty() {
            out.push_str(&section("Scores"));
            for evaluation in &result.evaluations {
                out.push_str(&format_evaluation(evaluation, verbose));
            }
        }

        if !result.failures.is_empty() {
            out.push_str(&section("Failures"));
            for failure in &result.failures {
                out.push_str(&format!("  {}  {}\n", "ERROR".red().bold(), failure.identifier));
                if let Some(file) = &failure.file {
                    if verbose {
                        out.push_str(&format!("         {}\n", file.dimmed()));
                    }
                }
                out.push_str(&format!("         {}\n", failure.error));
            }
        }

        let below = result.below_threshold();
        if !below.is_empty() {
            out.push_str(&format!(
                "\n  {} {} below the minimum of {}\n",
                below.len().to_string().red().bold(),
                if below.len() == 1 { "entity" } else { "entities" },
                result.fail_below
            ));
        }

        out.push('\n');
        out
    }
}

fn section(title: &str) -> String {
    format!(
        "\n  {} {} {}\n",
        "──".dimmed(),
        title,
        "─".repeat(50 - title.len().min(49)).dimmed()
    )
}

fn format_evaluation(evaluation: &Evaluation, verbose: bool) -> String {
    let score = format!("{:>5.1}", evaluation.score);
    let score_colored = match evaluation.label {
        RatingLabel::Exemplary | RatingLabel::Strong => score.green().to_string(),
        RatingLabel::Good | RatingLabel::Satisfactory => score.yellow().to_string(),
        RatingLabel::NeedsImprovement | RatingLabel::SignificantConcerns => {
            score.red().to_string()
        }
    };

    let mut out = format!(
        "  {:<10} {} / 100  {}\n",
        evaluation.identifier.bold(),
        score_colored,
        evaluation.label
    );

    if let Some(name) = &evaluation.name {
        out.push_str(&format!("             {}\n", name.dimmed()));
    }

    if verbose {
        for c in &evaluation.categories {
            out.push_str(&format!(
                "             {:<30} {:>9.2}  {}/5  x{:.2}  {:>5.1}\n",
                c.category.dimmed(),
                c.measured,
                c.sub_score,
                c.weight,
                c.contribution
            ));
        }
        if let Some(summary) = &evaluation.concentration {
            out.push_str(&format!(
                "             {}: {:.0} ({}, {} holders)\n",
                "HHI".cyan(),
                summary.index,
                summary.level,
                summary.holders
            ));
        }
    }

    out
}
