use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;

use govscore::reporter::cli::CliReporter;
use govscore::reporter::json::JsonReporter;
use govscore::reporter::{score_only, Reporter};

#[derive(Parser)]
#[command(name = "govscore", version, about = "Score corporate governance against a weighted rubric")]
struct Cli {
    /// Dataset directory holding entity records (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Cli)]
    format: Format,

    /// Only output `identifier score` lines
    #[arg(long)]
    score: bool,

    /// Rubric file overriding the one in govscore.toml
    #[arg(long)]
    rubric: Option<PathBuf>,

    /// Show per-category breakdown for every entity
    #[arg(long, short)]
    verbose: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Cli,
    Json,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = govscore::telemetry::init(&cli.log_level) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let result = match govscore::engine::run(&cli.path, cli.rubric.as_deref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let output = if cli.score {
        score_only(&result)
    } else {
        match cli.format {
            Format::Cli => CliReporter.format(&result, cli.verbose),
            Format::Json => JsonReporter.format(&result, cli.verbose),
        }
    };
    print!("{output}");

    if !result.is_success() {
        process::exit(1);
    }
}
