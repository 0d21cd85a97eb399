use super::random::grow_randomly;
use super::{FoldingAlgorithm, TaskProgress, finish, seeded_rng, trivial_score};
use crate::core::models::chain::{Chain, ChainError};
use crate::core::models::direction::Direction;
use crate::core::scoring::BondScore;
use crate::core::scoring::fast::{fast_compute_bond_score, fast_validate_order};
use crate::engine::budget::SearchBudget;
use crate::engine::config::{HillClimbConfig, SearchSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::state::Solution;
use rand::Rng;
use rand::seq::IteratorRandom;
use tracing::{debug, info, instrument};

/// Iterative improvement from a random fold: re-point one random residue at
/// a time and keep the change unless it breaks the fold or worsens its score.
pub struct HillClimb {
    settings: SearchSettings,
    config: HillClimbConfig,
}

impl HillClimb {
    pub fn new(settings: SearchSettings, config: HillClimbConfig) -> Self {
        Self { settings, config }
    }

    fn neighbour(&self, order: &[Direction], rng: &mut impl Rng) -> Option<Vec<Direction>> {
        let slot = rng.gen_range(0..order.len());
        let current = order[slot];
        let replacement = self
            .settings
            .dimensions
            .directions()
            .iter()
            .copied()
            .filter(|&d| d != current)
            .choose(rng)?;
        let mut next = order.to_vec();
        next[slot] = replacement;
        Some(next)
    }
}

/// Grows random folds until one is complete. Every attempt spends one
/// iteration, so the climb itself gets what is left.
fn grow_start(
    chain: &mut Chain,
    directions: &[Direction],
    rng: &mut impl Rng,
    budget: &mut SearchBudget,
) -> Result<bool, ChainError> {
    while !budget.is_exhausted() {
        budget.tick();
        if grow_randomly(chain, directions, rng)? {
            return Ok(true);
        }
    }
    Ok(false)
}

impl FoldingAlgorithm for HillClimb {
    fn name(&self) -> &'static str {
        "hill-climb"
    }

    #[instrument(skip_all, name = "hill_climb")]
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
        let mut budget = SearchBudget::new(Some(self.config.iterations), self.settings.time_limit);

        if !grow_start(chain, directions, &mut rng, &mut budget)? {
            return finish(chain, None, self.name());
        }

        let labels = chain.labels().to_vec();
        let order = chain.order();
        let mut current = Solution::new(fast_compute_bond_score(&labels, &order), order);
        info!(
            residues = labels.len(),
            iterations = self.config.iterations,
            start = current.score.value(),
            "Starting hill climb."
        );

        let mut progress = TaskProgress::start(reporter, self.config.iterations);
        let mut improvements = 0u64;
        while !budget.is_exhausted() {
            budget.tick();
            progress.tick();

            let Some(candidate) = self.neighbour(&current.order, &mut rng) else {
                continue;
            };
            if !fast_validate_order(&candidate) {
                continue;
            }
            let score = fast_compute_bond_score(&labels, &candidate);
            if score <= current.score {
                if score < current.score {
                    improvements += 1;
                    debug!(score = score.value(), "Hill climb improved.");
                }
                current = Solution::new(score, candidate);
            }
        }
        progress.finish();

        info!(
            iterations = budget.iterations(),
            improvements,
            best = current.score.value(),
            "Hill climb finished."
        );
        finish(chain, Some(&current), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Dimensionality;
    use crate::engine::algorithms::test_support::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn neighbours_differ_in_exactly_one_position() {
        let climb = HillClimb::new(settings(Dimensionality::Three, 0), HillClimbConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let order = vec![Direction::Right; 12];
        for _ in 0..100 {
            let next = climb.neighbour(&order, &mut rng).unwrap();
            let changed = order.iter().zip(&next).filter(|(a, b)| a != b).count();
            assert_eq!(changed, 1);
        }
    }

    #[test]
    fn climbing_finds_contacts_on_a_long_chain() {
        let mut chain: Chain = "HPHPPHHPHPPHPHHPPHPH".parse().unwrap();
        let score = HillClimb::new(settings(Dimensionality::Two, 21), HillClimbConfig::default())
            .run(&mut chain, &ProgressReporter::new())
            .unwrap();
        assert_contract(&chain, score);
        assert!(score < BondScore::ZERO);
    }

    #[test]
    fn failed_starts_spend_the_iteration_budget() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut chain: Chain = "HPPHPH".parse().unwrap();

        let mut budget = SearchBudget::new(Some(5), None);
        assert!(!grow_start(&mut chain, &[], &mut rng, &mut budget).unwrap());
        assert_eq!(budget.iterations(), 5);

        let mut budget = SearchBudget::new(Some(50), None);
        let directions = Dimensionality::Two.directions();
        assert!(grow_start(&mut chain, directions, &mut rng, &mut budget).unwrap());
        assert!(budget.iterations() >= 1);
        assert!(chain.has_valid_order());
    }

    #[test]
    fn zero_iterations_straightens() {
        let mut chain: Chain = "HPPH".parse().unwrap();
        let score = HillClimb::new(
            settings(Dimensionality::Two, 0),
            HillClimbConfig { iterations: 0 },
        )
        .run(&mut chain, &ProgressReporter::new())
        .unwrap();
        assert_eq!(score, BondScore::ZERO);
        assert_eq!(chain.order(), vec![Direction::Right; 3]);
    }
}
