//! Folding searches.
//!
//! Every search implements [`FoldingAlgorithm`]. A successful run leaves the
//! chain laid out in the best fold it found, with the chain's own bond score
//! equal to the returned score and a self-avoiding order. Chains with fewer
//! than two residues are returned untouched. When a search's budget runs out
//! before any complete fold was found, the chain is straightened instead.

pub mod annealing;
pub mod beam_search;
pub mod brute_force;
pub mod depth_first;
pub mod greedy;
pub mod hill_climb;
pub mod random;
pub mod spiral;

use crate::core::models::chain::Chain;
use crate::core::scoring::BondScore;
use crate::engine::config::{AlgorithmKind, FoldConfig, SearchSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::Solution;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::warn;

pub use annealing::SimulatedAnnealing;
pub use beam_search::BeamSearch;
pub use brute_force::{BruteForce, OrderOdometer};
pub use depth_first::DepthFirst;
pub use greedy::Greedy;
pub use hill_climb::HillClimb;
pub use random::{IterativeRandom, PureRandom};
pub use spiral::Spiral;

pub trait FoldingAlgorithm: Send {
    fn name(&self) -> &'static str;

    fn run(
        &mut self,
        chain: &mut Chain,
        reporter: &ProgressReporter,
    ) -> Result<BondScore, EngineError>;
}

/// Instantiates the configured algorithm with the given search settings.
pub fn build(config: &FoldConfig, settings: SearchSettings) -> Box<dyn FoldingAlgorithm> {
    match config.algorithm {
        AlgorithmKind::BruteForce => Box::new(BruteForce::new(settings, config.brute_force.clone())),
        AlgorithmKind::DepthFirst => Box::new(DepthFirst::new(settings, config.depth_first.clone())),
        AlgorithmKind::Greedy => Box::new(Greedy::new(settings, config.greedy.clone())),
        AlgorithmKind::SimulatedAnnealing => Box::new(SimulatedAnnealing::new(
            settings,
            config.annealing.clone(),
        )),
        AlgorithmKind::BeamSearch => Box::new(BeamSearch::new(settings, config.beam_search.clone())),
        AlgorithmKind::PureRandom => Box::new(PureRandom::new(settings, config.random.clone())),
        AlgorithmKind::IterativeRandom => {
            Box::new(IterativeRandom::new(settings, config.random.clone()))
        }
        AlgorithmKind::Spiral => Box::new(Spiral::new(settings)),
        AlgorithmKind::HillClimb => Box::new(HillClimb::new(settings, config.hill_climb.clone())),
    }
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// The score of a chain too short to fold, if it is one.
pub(crate) fn trivial_score(chain: &Chain) -> Option<BondScore> {
    (chain.len() < 2).then(|| chain.bond_score())
}

/// Lays the chain out in `best`, or straightens it when nothing was found, and
/// returns the resulting bond score.
pub(crate) fn finish(
    chain: &mut Chain,
    best: Option<&Solution>,
    algorithm: &'static str,
) -> Result<BondScore, EngineError> {
    match best {
        Some(solution) => {
            chain.set_order(&solution.order)?;
            if !chain.has_valid_order() {
                return Err(EngineError::Internal(format!(
                    "{} produced a self-intersecting fold",
                    algorithm
                )));
            }
        }
        None => {
            warn!(
                algorithm,
                "No complete fold found within the search budget. Returning the straight chain."
            );
            chain.straighten();
        }
    }

    let score = chain.bond_score();
    debug_assert!(
        best.is_none_or(|s| s.score == score),
        "fast and full scores disagree"
    );
    Ok(score)
}

const PROGRESS_STRIDE: u64 = 100;

/// Batches per-iteration ticks into `StepsDone` events.
pub(crate) struct TaskProgress<'r, 'a> {
    reporter: &'r ProgressReporter<'a>,
    pending: u64,
}

impl<'r, 'a> TaskProgress<'r, 'a> {
    pub(crate) fn start(reporter: &'r ProgressReporter<'a>, total: u64) -> Self {
        reporter.report(Progress::StepsPlanned { total });
        Self {
            reporter,
            pending: 0,
        }
    }

    #[inline]
    pub(crate) fn tick(&mut self) {
        self.pending += 1;
        if self.pending >= PROGRESS_STRIDE {
            self.reporter.report(Progress::StepsDone {
                amount: self.pending,
            });
            self.pending = 0;
        }
    }

    pub(crate) fn finish(self) {
        if self.pending > 0 {
            self.reporter.report(Progress::StepsDone {
                amount: self.pending,
            });
        }
        self.reporter.report(Progress::StepsFinished);
    }
}
