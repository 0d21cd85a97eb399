use super::{FoldingAlgorithm, TaskProgress, finish, seeded_rng, trivial_score};
use crate::core::models::chain::Chain;
use crate::core::models::direction::Direction;
use crate::core::scoring::BondScore;
use crate::core::scoring::fast::{fast_compute_bond_score, fast_validate_order};
use crate::engine::budget::SearchBudget;
use crate::engine::config::{AnnealingConfig, SearchSettings};
use crate::engine::error::EngineError;
use crate::engine::heuristics::HeuristicSet;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::Solution;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};

/// Simulated annealing over complete folds.
///
/// Each iteration re-points one random residue. The replacement direction is
/// drawn at random, or, once the schedule has cooled and heuristics are
/// configured, taken from the top of the heuristic ranking. A move that does
/// not worsen the current score is always taken; worse moves are taken as the
/// cooling schedule allows. After `reset_threshold` iterations without a new
/// best fold, the search jumps back to the best fold and re-heats.
pub struct SimulatedAnnealing {
    settings: SearchSettings,
    config: AnnealingConfig,
    heuristics: HeuristicSet,
}

impl SimulatedAnnealing {
    pub fn new(settings: SearchSettings, config: AnnealingConfig) -> Self {
        let heuristics = HeuristicSet::from_config(&config.heuristics);
        Self {
            settings,
            config,
            heuristics,
        }
    }

    /// Directions residue `index` could switch to while keeping the fold valid.
    fn legal_moves(&self, order: &mut [Direction], index: usize) -> Vec<Direction> {
        let slot = index - 1;
        let current = order[slot];
        let moves: Vec<Direction> = self
            .settings
            .dimensions
            .directions()
            .iter()
            .copied()
            .filter(|&d| d != current)
            .filter(|&d| {
                order[slot] = d;
                fast_validate_order(order)
            })
            .collect();
        order[slot] = current;
        moves
    }

    fn pick_move(
        &mut self,
        chain: &mut Chain,
        index: usize,
        mut moves: Vec<Direction>,
        step: u64,
        rng: &mut impl Rng,
    ) -> Result<Option<Direction>, EngineError> {
        let explore = self.heuristics.is_empty()
            || rng.r#gen::<f64>() < self.config.schedule.exploration(step);
        if explore {
            moves.shuffle(rng);
            return Ok(moves.first().copied());
        }
        let ranked = self.heuristics.rank(chain, index, &moves, true)?;
        Ok(ranked.first().map(|r| r.direction))
    }
}

impl FoldingAlgorithm for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "simulated-annealing"
    }

    #[instrument(skip_all, name = "simulated_annealing")]
    fn run(
        &mut self,
        chain: &mut Chain,
        reporter: &ProgressReporter,
    ) -> Result<BondScore, EngineError> {
        if let Some(score) = trivial_score(chain) {
            return Ok(score);
        }

        let mut rng = seeded_rng(self.settings.seed);
        let labels = chain.labels().to_vec();
        let schedule = self.config.schedule;

        chain.straighten();
        let mut order = chain.order();
        let mut current = fast_compute_bond_score(&labels, &order);
        let mut best = Solution::new(current, order.clone());

        info!(
            residues = chain.len(),
            n_permutations = self.config.n_permutations,
            schedule = ?schedule,
            heuristics = ?self.heuristics.names(),
            "Starting simulated annealing."
        );

        let mut budget = SearchBudget::new(Some(self.config.n_permutations), self.settings.time_limit);
        let mut progress = TaskProgress::start(reporter, self.config.n_permutations);
        let mut step = 0u64;
        let mut since_improvement = 0u64;
        let mut accepted = 0u64;
        let mut resets = 0u64;

        while !budget.is_exhausted() {
            budget.tick();
            progress.tick();

            let index = rng.gen_range(1..chain.len());
            let moves = self.legal_moves(&mut order, index);
            if moves.is_empty() {
                continue;
            }
            let Some(direction) = self.pick_move(chain, index, moves, step, &mut rng)? else {
                continue;
            };

            let previous = order[index - 1];
            order[index - 1] = direction;
            let candidate = fast_compute_bond_score(&labels, &order);
            let delta = candidate.value() - current.value();

            if schedule.accepts(delta, step, &mut rng) {
                current = candidate;
                accepted += 1;
                chain.set_order(&order)?;
            } else {
                order[index - 1] = previous;
            }

            if current < best.score {
                debug!(score = current.value(), step, "New best fold.");
                best = Solution::new(current, order.clone());
                since_improvement = 0;
            } else {
                since_improvement += 1;
            }
            step += 1;

            if since_improvement > self.config.reset_threshold {
                resets += 1;
                reporter.report(Progress::Reset {
                    count: resets,
                    best: best.score,
                });
                order.clone_from(&best.order);
                chain.set_order(&order)?;
                current = best.score;
                since_improvement = 0;
                step = 0;
            }
        }
        progress.finish();

        info!(
            iterations = budget.iterations(),
            accepted,
            resets,
            best = best.score.value(),
            "Simulated annealing finished."
        );
        finish(chain, Some(&best), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Dimensionality;
    use crate::engine::algorithms::test_support::*;
    use crate::engine::config::HeuristicConfig;
    use crate::engine::heuristics::HeuristicKind;
    use crate::engine::utils::acceptance::CoolingSchedule;

    fn anneal(sequence: &str, dimensions: Dimensionality, config: AnnealingConfig) -> BondScore {
        let mut chain: Chain = sequence.parse().unwrap();
        let mut algorithm = SimulatedAnnealing::new(settings(dimensions, 9), config);
        let score = algorithm.run(&mut chain, &ProgressReporter::new()).unwrap();
        assert_contract(&chain, score);
        score
    }

    #[test]
    fn legal_moves_exclude_current_and_colliding_directions() {
        let algorithm =
            SimulatedAnnealing::new(settings(Dimensionality::Two, 0), AnnealingConfig::default());
        let mut order = vec![Direction::Up, Direction::Right, Direction::Down];
        let moves = algorithm.legal_moves(&mut order, 2);
        // Right is current, Down lands on the origin and Up folds residue 3 onto residue 1.
        assert_eq!(moves, vec![Direction::Left]);
        assert_eq!(order, vec![Direction::Up, Direction::Right, Direction::Down]);
    }

    #[test]
    fn finds_the_cysteine_square() {
        let score = anneal("CHHC", Dimensionality::Two, AnnealingConfig::default());
        assert_eq!(score, BondScore(-5));
    }

    #[test]
    fn improves_on_the_straight_line() {
        let score = anneal(
            "HPHPPHHPHPPHPHHPPHPH",
            Dimensionality::Two,
            AnnealingConfig::default(),
        );
        assert!(score < BondScore::ZERO);
    }

    #[test]
    fn heuristic_variant_and_metropolis_schedule_run_in_three_dimensions() {
        let config = AnnealingConfig {
            n_permutations: 1500,
            reset_threshold: 200,
            schedule: CoolingSchedule::Metropolis {
                initial_temperature: 2.0,
                cooling_rate: 0.995,
            },
            heuristics: HeuristicConfig::with_kinds(vec![
                HeuristicKind::Potential,
                HeuristicKind::MinimiseDimensions,
            ]),
        };
        let score = anneal("HPHPPHHPHPPHPHHPPHPH", Dimensionality::Three, config);
        assert!(score < BondScore::ZERO);
    }
}
