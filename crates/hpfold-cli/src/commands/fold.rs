use crate::cli::FoldArgs;
use crate::config::builder::build_config;
use crate::error::{CliError, Result};
use crate::ui::{CliProgressHandler, UiEvent};
use hpfold::core::io::render::render_ascii;
use hpfold::core::models::chain::Chain;
use hpfold::core::models::direction::format_order;
use hpfold::core::models::sequence::Sequence;
use hpfold::engine::progress::ProgressReporter;
use hpfold::engine::state::Solution;
use hpfold::workflows::{self, fold::FoldResult, fold::ScoreStatistics};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// What `--output` writes: the result plus the sequence it belongs to.
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct FoldReport<'a> {
    sequence: String,
    algorithm: &'static str,
    dimensions: u8,
    theoretic_optimum: i32,
    failed_restarts: usize,
    statistics: &'a ScoreStatistics,
    solutions: &'a [Solution],
}

impl<'a> FoldReport<'a> {
    fn new(sequence: &Sequence, result: &'a FoldResult) -> Self {
        Self {
            sequence: sequence.to_string(),
            algorithm: result.algorithm.name(),
            dimensions: result.dimensions.rank(),
            theoretic_optimum: result.theoretic_optimum.value(),
            failed_restarts: result.failed_restarts,
            statistics: &result.statistics,
            solutions: &result.solutions,
        }
    }
}

pub async fn run(args: FoldArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Folding {} residues with {} on a {} lattice...",
        app.sequence.len(),
        app.core_config.algorithm,
        app.core_config.search.dimensions
    );
    info!("Invoking the core folding workflow...");
    let result = tokio::task::block_in_place(|| {
        workflows::fold::run(&app.sequence, &app.core_config, &reporter)
    })?;

    if result.failed_restarts > 0 {
        warn!(
            "{} of {} restart(s) failed.",
            result.failed_restarts,
            result.statistics.samples + result.failed_restarts
        );
    }
    println!("{}", format_summary(&app.sequence, &result)?);

    if let Some(path) = &app.output_path {
        write_report(path, &app.sequence, &result)?;
        println!("Result written to: {}", path.display());
    }
    Ok(())
}

fn format_summary(sequence: &Sequence, result: &FoldResult) -> Result<String> {
    let best = result
        .best()
        .ok_or_else(|| CliError::Other(anyhow::anyhow!("The workflow returned no solutions")))?;
    let chain = Chain::with_order(sequence.clone(), &best.order)
        .map_err(hpfold::engine::error::EngineError::from)?;

    let stats = &result.statistics;
    let mut out = String::new();
    writeln!(out, "✓ Best score: {} (bound {})", best.score, result.theoretic_optimum).ok();
    writeln!(out, "  Order: {}", format_order(&best.order)).ok();
    if stats.samples > 1 {
        writeln!(
            out,
            "  Restarts: {} | mean {:.2} | std-dev {:.2} | min {} | max {}",
            stats.samples, stats.mean, stats.std_dev, stats.min, stats.max
        )
        .ok();
    }
    for (rank, solution) in result.solutions.iter().enumerate().skip(1) {
        writeln!(
            out,
            "  Solution {}: {} [{}]",
            rank + 1,
            solution.score,
            format_order(&solution.order)
        )
        .ok();
    }
    out.push('\n');
    out.push_str(&render_ascii(&chain));
    Ok(out)
}

fn write_report(path: &Path, sequence: &Sequence, result: &FoldResult) -> Result<()> {
    let text = toml::to_string_pretty(&FoldReport::new(sequence, result)).map_err(|e| {
        CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        }
    })?;
    std::fs::write(path, text)?;
    info!("Wrote {} solution(s) to {:?}", result.solutions.len(), path);
    Ok(())
}
