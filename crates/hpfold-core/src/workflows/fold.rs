use crate::core::models::chain::Chain;
use crate::core::models::direction::Dimensionality;
use crate::core::models::sequence::Sequence;
use crate::core::scoring::BondScore;
use crate::core::scoring::bounds::theoretic_optimum;
use crate::engine::algorithms::{self, BruteForce, FoldingAlgorithm};
use crate::engine::config::{AlgorithmKind, FoldConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::Solution;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Summary of the best score reached by each restart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScoreStatistics {
    pub samples: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: BondScore,
    pub max: BondScore,
}

impl ScoreStatistics {
    pub fn from_scores(scores: &[BondScore]) -> Option<Self> {
        let min = *scores.iter().min()?;
        let max = *scores.iter().max()?;
        let n = scores.len() as f64;
        let mean = scores.iter().map(|s| s.value() as f64).sum::<f64>() / n;
        let variance = scores
            .iter()
            .map(|s| (s.value() as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        Some(Self {
            samples: scores.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FoldResult {
    pub algorithm: AlgorithmKind,
    pub dimensions: Dimensionality,
    pub theoretic_optimum: BondScore,
    pub failed_restarts: usize,
    pub statistics: ScoreStatistics,
    pub solutions: Vec<Solution>,
}

impl FoldResult {
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }
}

struct RestartOutcome {
    score: BondScore,
    solutions: Vec<Solution>,
}

#[instrument(skip_all, name = "fold_workflow")]
pub fn run(
    sequence: &Sequence,
    config: &FoldConfig,
    reporter: &ProgressReporter,
) -> Result<FoldResult, EngineError> {
    config.validate()?;
    let restarts = config.restarts.max(1);

    reporter.report(Progress::RunStart {
        algorithm: config.algorithm.name(),
        restarts,
    });
    info!(
        residues = sequence.len(),
        algorithm = config.algorithm.name(),
        dimensions = %config.search.dimensions,
        restarts,
        "Starting folding workflow."
    );

    let outcomes = if restarts == 1 {
        vec![run_restart(sequence, config, 0, reporter)]
    } else {
        run_restarts(sequence, config, restarts, reporter)
    };

    let result = finalize_results(sequence, config, outcomes);
    reporter.report(Progress::RunFinish {
        best: result
            .as_ref()
            .ok()
            .and_then(FoldResult::best)
            .map(|s| s.score),
    });
    let result = result?;
    info!(
        best = ?result.best().map(|s| s.score.value()),
        bound = result.theoretic_optimum.value(),
        failed_restarts = result.failed_restarts,
        "Workflow complete. Returning {} solution(s).",
        result.solutions.len()
    );
    Ok(result)
}

fn run_restarts(
    sequence: &Sequence,
    config: &FoldConfig,
    restarts: usize,
    reporter: &ProgressReporter,
) -> Vec<Result<RestartOutcome, EngineError>> {
    reporter.report(Progress::StepsPlanned {
        total: restarts as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = (0..restarts).into_iter();

    #[cfg(feature = "parallel")]
    let iterator = (0..restarts).into_par_iter();

    let outcomes = iterator
        .map(|index| {
            let outcome = run_restart(sequence, config, index, &ProgressReporter::new());
            reporter.report(Progress::StepsDone { amount: 1 });
            outcome
        })
        .collect();
    reporter.report(Progress::StepsFinished);
    outcomes
}

fn run_restart(
    sequence: &Sequence,
    config: &FoldConfig,
    index: usize,
    reporter: &ProgressReporter,
) -> Result<RestartOutcome, EngineError> {
    let seed = config.search.seed.map(|seed| seed.wrapping_add(index as u64));
    let settings = config.search.with_seed(seed);
    let mut chain = Chain::new(sequence.clone());

    let (score, mut solutions) = if config.algorithm == AlgorithmKind::BruteForce {
        let mut search = BruteForce::new(settings, config.brute_force.clone());
        let score = search.run(&mut chain, reporter)?;
        (score, search.top_solutions())
    } else {
        let mut search = algorithms::build(config, settings);
        (search.run(&mut chain, reporter)?, Vec::new())
    };
    solutions.push(Solution::new(score, chain.order()));

    debug!(restart = index, seed = ?seed, score = score.value(), "Restart finished.");
    Ok(RestartOutcome { score, solutions })
}

fn finalize_results(
    sequence: &Sequence,
    config: &FoldConfig,
    outcomes: Vec<Result<RestartOutcome, EngineError>>,
) -> Result<FoldResult, EngineError> {
    let mut scores = Vec::with_capacity(outcomes.len());
    let mut solutions = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(outcome) => {
                scores.push(outcome.score);
                solutions.extend(outcome.solutions);
            }
            Err(err) => {
                warn!(error = %err, "Restart failed.");
                failures.push(err);
            }
        }
    }

    let Some(statistics) = ScoreStatistics::from_scores(&scores) else {
        return Err(failures
            .into_iter()
            .next()
            .unwrap_or_else(|| EngineError::Internal("no restarts were run".to_string())));
    };

    solutions.sort();
    solutions.dedup_by(|a, b| a.order == b.order);
    solutions.truncate(config.num_solutions.max(1));

    Ok(FoldResult {
        algorithm: config.algorithm,
        dimensions: config.search.dimensions,
        theoretic_optimum: theoretic_optimum(sequence, config.search.dimensions),
        failed_restarts: failures.len(),
        statistics,
        solutions,
    })
}
