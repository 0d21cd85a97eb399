use super::{FoldingAlgorithm, TaskProgress, finish, trivial_score};
use crate::core::models::chain::Chain;
use crate::core::models::direction::Direction;
use crate::core::scoring::BondScore;
use crate::core::scoring::fast::{fast_compute_bond_score, fast_validate_order};
use crate::engine::budget::SearchBudget;
use crate::engine::config::{BruteForceConfig, SearchSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::state::{ScoreTracker, Solution};
use tracing::{debug, info, instrument};

/// Lazily enumerates every tuple of `len` directions from a direction set.
///
/// The first position turns over fastest. Enumeration starts from the tuple
/// made entirely of the set's first direction.
#[derive(Debug, Clone)]
pub struct OrderOdometer {
    directions: &'static [Direction],
    digits: Vec<usize>,
    exhausted: bool,
}

impl OrderOdometer {
    pub fn new(directions: &'static [Direction], len: usize) -> Self {
        Self {
            directions,
            digits: vec![0; len],
            exhausted: directions.is_empty(),
        }
    }

    /// Number of tuples in a full enumeration, if it fits in a `u64`.
    pub fn total(&self) -> Option<u64> {
        (self.directions.len() as u64).checked_pow(u32::try_from(self.digits.len()).ok()?)
    }

    fn advance(&mut self) {
        for digit in &mut self.digits {
            *digit += 1;
            if *digit < self.directions.len() {
                return;
            }
            *digit = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for OrderOdometer {
    type Item = Vec<Direction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let order = self.digits.iter().map(|&d| self.directions[d]).collect();
        self.advance();
        Some(order)
    }
}

/// Scores every possible order and keeps the best `top_k`.
pub struct BruteForce {
    settings: SearchSettings,
    config: BruteForceConfig,
    tracker: ScoreTracker,
}

impl BruteForce {
    pub fn new(settings: SearchSettings, config: BruteForceConfig) -> Self {
        let tracker = ScoreTracker::new(config.top_k);
        Self {
            settings,
            config,
            tracker,
        }
    }

    /// The best folds of the last run, best first.
    pub fn top_solutions(&self) -> Vec<Solution> {
        self.tracker.sorted()
    }
}

impl FoldingAlgorithm for BruteForce {
    fn name(&self) -> &'static str {
        "brute-force"
    }

    #[instrument(skip_all, name = "brute_force")]
    fn run(
        &mut self,
        chain: &mut Chain,
        reporter: &ProgressReporter,
    ) -> Result<BondScore, EngineError> {
        if let Some(score) = trivial_score(chain) {
            return Ok(score);
        }

        self.tracker = ScoreTracker::new(self.config.top_k);
        let odometer = OrderOdometer::new(self.settings.dimensions.directions(), chain.len() - 1);
        let total = match (odometer.total(), self.config.max_iterations) {
            (Some(total), Some(max)) => total.min(max),
            (Some(total), None) => total,
            (None, max) => max.unwrap_or(u64::MAX),
        };
        info!(
            residues = chain.len(),
            dimensions = %self.settings.dimensions,
            orders = total,
            "Starting brute-force enumeration."
        );

        let mut budget = SearchBudget::new(self.config.max_iterations, self.settings.time_limit);
        let mut progress = TaskProgress::start(reporter, total);
        let mut best: Option<BondScore> = None;
        let mut valid = 0u64;

        for order in odometer {
            if budget.is_exhausted() {
                break;
            }
            budget.tick();
            progress.tick();

            if !fast_validate_order(&order) {
                continue;
            }
            valid += 1;

            let score = fast_compute_bond_score(chain.labels(), &order);
            if self.tracker.offer(score, &order) && best.is_none_or(|b| score < b) {
                debug!(score = score.value(), "New best fold.");
                best = Some(score);
            }
        }
        progress.finish();

        info!(
            iterations = budget.iterations(),
            valid,
            best = ?best.map(BondScore::value),
            "Brute-force enumeration finished."
        );
        finish(chain, self.tracker.best(), self.name())
    }
}
