use super::{FoldingAlgorithm, TaskProgress, finish, seeded_rng, trivial_score};
use crate::core::models::chain::{Chain, ChainError};
use crate::core::models::direction::Direction;
use crate::core::scoring::BondScore;
use crate::core::scoring::fast::{fast_compute_bond_score, fast_validate_order};
use crate::engine::budget::SearchBudget;
use crate::engine::config::{RandomConfig, SearchSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::state::Solution;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};

/// Random order of `len` directions in which no step undoes the previous one.
pub(crate) fn random_walk(
    directions: &[Direction],
    len: usize,
    rng: &mut impl Rng,
) -> Vec<Direction> {
    let mut order: Vec<Direction> = Vec::with_capacity(len);
    while order.len() < len {
        let Some(&direction) = directions.choose(rng) else {
            break;
        };
        if order.last().is_none_or(|&last| direction != last.reverse()) {
            order.push(direction);
        }
    }
    order
}

/// Lays the chain out residue by residue, each in a random free direction.
/// Returns false if the walk traps itself.
pub(crate) fn grow_randomly(
    chain: &mut Chain,
    directions: &[Direction],
    rng: &mut impl Rng,
) -> Result<bool, ChainError> {
    chain.straighten();
    for index in 1..chain.len() {
        let free = chain.free_directions(index, directions)?;
        let Some(&direction) = free.choose(rng) else {
            return Ok(false);
        };
        chain.change_direction(index, direction, false)?;
    }
    Ok(true)
}

fn out_of_attempts(max_attempts: Option<u64>, budget: &SearchBudget) -> bool {
    max_attempts.is_some_and(|max| budget.iterations() >= max)
}

/// Draws whole random orders until one is self-avoiding.
pub struct PureRandom {
    settings: SearchSettings,
    config: RandomConfig,
}

impl PureRandom {
    pub fn new(settings: SearchSettings, config: RandomConfig) -> Self {
        Self { settings, config }
    }
}

impl FoldingAlgorithm for PureRandom {
    fn name(&self) -> &'static str {
        "pure-random"
    }

    #[instrument(skip_all, name = "pure_random")]
    fn run(
        &mut self,
        chain: &mut Chain,
        reporter: &ProgressReporter,
    ) -> Result<BondScore, EngineError> {
        if let Some(score) = trivial_score(chain) {
            return Ok(score);
        }

        let mut rng = seeded_rng(self.settings.seed);
        let directions = self.settings.dimensions.directions();
        let mut budget = SearchBudget::new(self.config.max_attempts, self.settings.time_limit);
        let mut progress = TaskProgress::start(reporter, self.config.max_attempts.unwrap_or(1));

        let mut found = None;
        while !budget.is_exhausted() {
            budget.tick();
            progress.tick();
            let order = random_walk(directions, chain.len() - 1, &mut rng);
            if fast_validate_order(&order) {
                found = Some(Solution::new(
                    fast_compute_bond_score(chain.labels(), &order),
                    order,
                ));
                break;
            }
        }
        progress.finish();
        info!(attempts = budget.iterations(), "Random sampling finished.");

        if found.is_none() && out_of_attempts(self.config.max_attempts, &budget) {
            return Err(EngineError::Convergence {
                iterations: budget.iterations(),
            });
        }
        finish(chain, found.as_ref(), self.name())
    }
}

/// Grows the chain one random free direction at a time, starting over when
/// it walks into a dead end.
pub struct IterativeRandom {
    settings: SearchSettings,
    config: RandomConfig,
}

impl IterativeRandom {
    pub fn new(settings: SearchSettings, config: RandomConfig) -> Self {
        Self { settings, config }
    }
}

impl FoldingAlgorithm for IterativeRandom {
    fn name(&self) -> &'static str {
        "iterative-random"
    }

    #[instrument(skip_all, name = "iterative_random")]
    fn run(
        &mut self,
        chain: &mut Chain,
        reporter: &ProgressReporter,
    ) -> Result<BondScore, EngineError> {
        if let Some(score) = trivial_score(chain) {
            return Ok(score);
        }

        let mut rng = seeded_rng(self.settings.seed);
        let directions = self.settings.dimensions.directions();
        let mut budget = SearchBudget::new(self.config.max_attempts, self.settings.time_limit);
        let mut progress = TaskProgress::start(reporter, self.config.max_attempts.unwrap_or(1));

        let mut found = None;
        while !budget.is_exhausted() {
            budget.tick();
            progress.tick();
            if grow_randomly(chain, directions, &mut rng)? {
                found = Some(Solution::new(chain.bond_score(), chain.order()));
                break;
            }
            debug!(attempt = budget.iterations(), "Random walk trapped itself.");
        }
        progress.finish();
        info!(attempts = budget.iterations(), "Iterative random construction finished.");

        if found.is_none() && out_of_attempts(self.config.max_attempts, &budget) {
            chain.straighten();
            return Err(EngineError::Convergence {
                iterations: budget.iterations(),
            });
        }
        finish(chain, found.as_ref(), self.name())
    }
}
