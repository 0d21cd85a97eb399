use crate::cli::ScoreArgs;
use crate::error::{CliError, Result};
use hpfold::core::io::render::render_ascii;
use hpfold::core::models::chain::Chain;
use hpfold::core::models::direction::{Dimensionality, Direction, parse_order};
use hpfold::core::models::sequence::Sequence;
use hpfold::core::scoring::BondScore;
use hpfold::core::scoring::bounds::theoretic_optimum;
use hpfold::core::scoring::fast::{fast_compute_bond_score, fast_validate_order};
use hpfold::engine::error::EngineError;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub valid: bool,
    pub score: BondScore,
    pub fast_score: BondScore,
    pub bound: BondScore,
    pub rendering: String,
}

pub async fn run(args: ScoreArgs) -> Result<()> {
    let sequence: Sequence = args.sequence.parse()?;
    let order = parse_order(&args.order)?;
    let report = score(sequence, &order)?;

    if report.valid {
        println!("✓ Fold is self-avoiding.");
    } else {
        println!("✗ Fold collides with itself; scores are not meaningful.");
    }
    println!("  Score: {} (fast: {})", report.score, report.fast_score);
    println!("  Theoretic bound: {}", report.bound);
    println!();
    print!("{}", report.rendering);
    Ok(())
}

pub fn score(sequence: Sequence, order: &[Direction]) -> Result<ScoreReport> {
    let expected = sequence.len().saturating_sub(1);
    if order.len() != expected {
        return Err(CliError::Argument(format!(
            "A sequence of {} residues needs {} directions, got {}",
            sequence.len(),
            expected,
            order.len()
        )));
    }

    let bound = theoretic_optimum(&sequence, Dimensionality::of_order(order));
    let fast_score = fast_compute_bond_score(sequence.labels(), order);
    let chain = Chain::with_order(sequence, order).map_err(EngineError::from)?;
    let report = ScoreReport {
        valid: fast_validate_order(order) && chain.has_valid_order(),
        score: chain.bond_score(),
        fast_score,
        bound,
        rendering: render_ascii(&chain),
    };
    info!(
        valid = report.valid,
        score = report.score.value(),
        "Scored fold."
    );
    Ok(report)
}
