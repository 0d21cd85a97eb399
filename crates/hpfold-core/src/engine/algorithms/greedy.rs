use super::{FoldingAlgorithm, TaskProgress, finish, seeded_rng, trivial_score};
use crate::core::models::chain::Chain;
use crate::core::models::direction::Direction;
use crate::core::scoring::BondScore;
use crate::core::scoring::bond::bond_value;
use crate::engine::budget::SearchBudget;
use crate::engine::config::{GreedyConfig, SearchSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::state::Solution;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};

/// Places residues one at a time, always taking the direction with the lowest
/// immediate contact energy. Ties are broken at random, and a dead end starts
/// the construction over.
pub struct Greedy {
    settings: SearchSettings,
    config: GreedyConfig,
}

/// Energy of the bonds residue `index` makes with committed residues other
/// than its chain neighbours.
pub(crate) fn contact_energy(chain: &Chain, index: usize) -> BondScore {
    let Some(residue) = chain.residue(index) else {
        return BondScore::ZERO;
    };
    let Some(sites) = chain.neighbour_positions(index) else {
        return BondScore::ZERO;
    };
    sites
        .filter_map(|site| chain.occupant(site))
        .filter(|&other| other + 1 < index || other > index + 1)
        .filter_map(|other| chain.residue(other))
        .map(|other| bond_value(residue.label(), other.label()))
        .sum()
}

impl Greedy {
    pub fn new(settings: SearchSettings, config: GreedyConfig) -> Self {
        Self { settings, config }
    }

    /// One construction attempt. Returns false on a dead end.
    fn attempt(&self, chain: &mut Chain, rng: &mut impl Rng) -> Result<bool, EngineError> {
        chain.straighten();
        let directions = self.settings.dimensions.directions();

        for index in 1..chain.len() {
            let free = chain.free_directions(index, directions)?;
            if free.is_empty() {
                return Ok(false);
            }

            let mut scored = Vec::with_capacity(free.len());
            for &direction in &free {
                let energy = chain.transaction(|chain| -> Result<BondScore, EngineError> {
                    chain.change_direction(index, direction, false)?;
                    Ok(contact_energy(chain, index))
                })?;
                scored.push((direction, energy));
            }

            let lowest = scored.iter().map(|&(_, e)| e).min().unwrap_or_default();
            let best: Vec<Direction> = scored
                .into_iter()
                .filter(|&(_, e)| e == lowest)
                .map(|(d, _)| d)
                .collect();
            let Some(&chosen) = best.choose(rng) else {
                return Ok(false);
            };
            chain.change_direction(index, chosen, false)?;
        }
        Ok(true)
    }
}

impl FoldingAlgorithm for Greedy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    #[instrument(skip_all, name = "greedy")]
    fn run(
        &mut self,
        chain: &mut Chain,
        reporter: &ProgressReporter,
    ) -> Result<BondScore, EngineError> {
        if let Some(score) = trivial_score(chain) {
            return Ok(score);
        }

        let mut rng = seeded_rng(self.settings.seed);
        let mut budget = SearchBudget::new(self.config.max_attempts, self.settings.time_limit);
        let mut progress = TaskProgress::start(reporter, self.config.max_attempts.unwrap_or(1));
        info!(residues = chain.len(), "Starting greedy construction.");

        let mut found = None;
        while !budget.is_exhausted() {
            budget.tick();
            progress.tick();
            if self.attempt(chain, &mut rng)? {
                found = Some(Solution::new(chain.bond_score(), chain.order()));
                break;
            }
            debug!(attempt = budget.iterations(), "Greedy construction hit a dead end.");
        }
        progress.finish();

        let failed = budget.iterations().saturating_sub(u64::from(found.is_some()));
        info!(failed_attempts = failed, "Greedy construction finished.");

        if found.is_none() && self.config.max_attempts.is_some_and(|max| budget.iterations() >= max) {
            chain.straighten();
            return Err(EngineError::Convergence {
                iterations: budget.iterations(),
            });
        }
        finish(chain, found.as_ref(), self.name())
    }
}
