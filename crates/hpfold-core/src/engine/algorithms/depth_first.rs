use super::{FoldingAlgorithm, TaskProgress, finish, trivial_score};
use crate::core::models::chain::Chain;
use crate::core::models::direction::Direction;
use crate::core::scoring::BondScore;
use crate::core::scoring::fast::fast_compute_bond_score;
use crate::engine::budget::SearchBudget;
use crate::engine::config::{DepthFirstConfig, SearchSettings};
use crate::engine::error::EngineError;
use crate::engine::heuristics::HeuristicSet;
use crate::engine::progress::ProgressReporter;
use crate::engine::pruning::{NeighbourPruner, Pruner, ScorePruner};
use crate::engine::state::Solution;
use tracing::{debug, info, instrument, trace};

/// Builds folds residue by residue, backtracking through every free direction
/// in heuristic order.
///
/// Branches are cut by the configured pruners and, when budget pruning is on,
/// by dropping the worst-ranked directions whenever the search has spent more
/// iterations than its schedule allows.
pub struct DepthFirst {
    settings: SearchSettings,
    config: DepthFirstConfig,
    heuristics: HeuristicSet,
    pruners: Vec<Box<dyn Pruner>>,
    state: SearchState,
}

#[derive(Debug, Default)]
struct SearchState {
    best: Option<Solution>,
    end_nodes: u64,
    pruned: u64,
    branch_budget: i64,
    cost_per_iteration: f64,
}

impl DepthFirst {
    pub fn new(settings: SearchSettings, config: DepthFirstConfig) -> Self {
        let heuristics = HeuristicSet::from_config(&config.heuristics);
        let mut pruners: Vec<Box<dyn Pruner>> = Vec::new();
        if !config.score_pruning.is_disabled() {
            pruners.push(Box::new(ScorePruner::new(config.score_pruning)));
        }
        if config.neighbour_pruning {
            pruners.push(Box::new(NeighbourPruner::new()));
        }
        Self {
            settings,
            config,
            heuristics,
            pruners,
            state: SearchState::default(),
        }
    }

    fn candidates(&self, index: usize) -> &'static [Direction] {
        if index == 1 && self.config.fix_first_direction {
            &[Direction::Right]
        } else {
            self.settings.dimensions.directions()
        }
    }

    /// Branches the subtree below a residue is (roughly) worth, in the same
    /// units as the branch budget.
    fn branch_saving(&self, index: usize, len: usize) -> i64 {
        let fan_out = (2 * self.settings.dimensions.rank() - 1) as f64;
        let below = len.saturating_sub(index + 1) as i32;
        // The float cast saturates, so a huge schedule clamps to `i64::MAX`.
        ((fan_out.powi(below) * self.state.cost_per_iteration) as i64).saturating_add(1)
    }

    /// Drops the worst-ranked branches while the search is over budget.
    fn prune_branches(&mut self, branches: &mut Vec<Direction>, index: usize, len: usize) {
        while self.state.branch_budget < 0 && branches.len() > 1 && len - index > 1 {
            branches.pop();
            self.state.branch_budget = self
                .state
                .branch_budget
                .saturating_add(self.branch_saving(index, len));
            self.state.pruned += 1;
        }
    }

    fn record(&mut self, chain: &Chain) {
        self.state.end_nodes += 1;
        let order = chain.order();
        let score = fast_compute_bond_score(chain.labels(), &order);
        if self.state.best.as_ref().is_none_or(|b| score < b.score) {
            debug!(score = score.value(), "New best fold.");
            self.state.best = Some(Solution::new(score, order));
        }
    }

    fn visit(
        &mut self,
        chain: &mut Chain,
        index: usize,
        budget: &mut SearchBudget,
        progress: &mut TaskProgress,
    ) -> Result<(), EngineError> {
        if index >= chain.len() {
            self.record(chain);
            return Ok(());
        }

        let best = self.state.best.as_ref().map(|b| b.score);
        if self
            .pruners
            .iter()
            .any(|p| p.should_prune(chain, best, index - 1))
        {
            self.state.pruned += 1;
            return Ok(());
        }

        budget.tick();
        progress.tick();
        self.state.branch_budget = self.state.branch_budget.saturating_sub(1);
        if budget.is_exhausted() {
            return Ok(());
        }

        let free = chain.free_directions(index, self.candidates(index))?;
        if free.is_empty() {
            trace!(index, "Dead end.");
            return Ok(());
        }

        let mut branches: Vec<Direction> = self
            .heuristics
            .rank(chain, index, &free, false)?
            .into_iter()
            .map(|r| r.direction)
            .collect();
        if self.config.budget_pruning {
            self.prune_branches(&mut branches, index, chain.len());
        }

        for direction in branches {
            chain.transaction(|chain| -> Result<(), EngineError> {
                chain.change_direction(index, direction, false)?;
                self.visit(chain, index + 1, budget, progress)
            })?;
            if budget.is_exhausted() {
                break;
            }
        }
        Ok(())
    }
}

impl FoldingAlgorithm for DepthFirst {
    fn name(&self) -> &'static str {
        "depth-first"
    }

    #[instrument(skip_all, name = "depth_first")]
    fn run(
        &mut self,
        chain: &mut Chain,
        reporter: &ProgressReporter,
    ) -> Result<BondScore, EngineError> {
        if let Some(score) = trivial_score(chain) {
            return Ok(score);
        }

        let max_iterations = self.config.max_iterations;
        let rank = self.settings.dimensions.rank() as f64;
        self.state = SearchState {
            branch_budget: self.config.initial_budget,
            cost_per_iteration: max_iterations as f64 / rank.powi(chain.len() as i32),
            ..SearchState::default()
        };
        info!(
            residues = chain.len(),
            dimensions = %self.settings.dimensions,
            max_iterations,
            heuristics = ?self.heuristics.names(),
            pruners = ?self.pruners.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "Starting depth-first search."
        );

        chain.straighten();
        // Leaves residues from index 2 on in transit, so nothing downstream of
        // the search frontier takes part in pruning or heuristics.
        chain.change_direction(1, Direction::Right, false)?;
        let mut budget = SearchBudget::new(
            (max_iterations != u64::MAX).then_some(max_iterations),
            self.settings.time_limit,
        );
        let mut progress = TaskProgress::start(reporter, max_iterations);
        self.visit(chain, 1, &mut budget, &mut progress)?;
        progress.finish();

        info!(
            iterations = budget.iterations(),
            end_nodes = self.state.end_nodes,
            pruned = self.state.pruned,
            best = ?self.state.best.as_ref().map(|b| b.score.value()),
            "Depth-first search finished."
        );
        let best = self.state.best.take();
        finish(chain, best.as_ref(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Dimensionality;
    use crate::engine::algorithms::test_support::*;
    use crate::engine::config::HeuristicConfig;
    use crate::engine::heuristics::HeuristicKind;

    fn run(sequence: &str, config: DepthFirstConfig) -> (Chain, BondScore) {
        let mut chain: Chain = sequence.parse().unwrap();
        let mut algorithm = DepthFirst::new(settings(Dimensionality::Two, 0), config);
        let score = algorithm.run(&mut chain, &ProgressReporter::new()).unwrap();
        assert_contract(&chain, score);
        (chain, score)
    }

    #[test]
    fn exhaustive_search_finds_known_optima() {
        for (sequence, optimum) in SEQUENCES_2D {
            let (_, score) = run(sequence, DepthFirstConfig::exhaustive());
            assert_eq!(score, BondScore(optimum), "{}", sequence);
        }
    }

    #[test]
    fn disabling_pruning_never_does_worse() {
        for (sequence, _) in SEQUENCES_2D {
            let pruned = DepthFirstConfig {
                max_iterations: u64::MAX,
                budget_pruning: false,
                neighbour_pruning: true,
                ..DepthFirstConfig::default()
            };
            let (_, with_pruning) = run(sequence, pruned);
            let (_, without_pruning) = run(sequence, DepthFirstConfig::exhaustive());
            assert!(without_pruning <= with_pruning, "{}", sequence);
        }
    }

    #[test]
    fn fixing_the_first_direction_keeps_the_optimum() {
        for (sequence, optimum) in SEQUENCES_2D {
            let config = DepthFirstConfig {
                fix_first_direction: true,
                ..DepthFirstConfig::exhaustive()
            };
            let (chain, score) = run(sequence, config);
            assert_eq!(score, BondScore(optimum));
            assert_eq!(chain.order()[0], Direction::Right);
        }
    }

    #[test]
    fn heuristics_and_budget_pruning_still_produce_valid_folds() {
        let config = DepthFirstConfig {
            max_iterations: 500,
            heuristics: HeuristicConfig::with_kinds(HeuristicKind::ALL.to_vec()),
            ..DepthFirstConfig::default()
        };
        let (_, score) = run("HPHPPHHPHPPHPHHPPHPH", config);
        assert!(score <= BondScore::ZERO);
    }

    #[test]
    fn budget_pruning_drops_worst_branches_only_when_over_budget() {
        let mut algorithm =
            DepthFirst::new(settings(Dimensionality::Two, 0), DepthFirstConfig::default());
        algorithm.state.cost_per_iteration = 0.0;

        let mut branches = vec![Direction::Up, Direction::Left, Direction::Down];
        algorithm.state.branch_budget = 5;
        algorithm.prune_branches(&mut branches, 3, 10);
        assert_eq!(branches.len(), 3);

        algorithm.state.branch_budget = -2;
        algorithm.prune_branches(&mut branches, 3, 10);
        assert_eq!(branches, vec![Direction::Up]);
        assert_eq!(algorithm.state.branch_budget, 0);

        let mut last = vec![Direction::Up, Direction::Left];
        algorithm.state.branch_budget = -1;
        algorithm.prune_branches(&mut last, 9, 10);
        assert_eq!(last.len(), 2);
    }

    #[test]
    fn budget_arithmetic_saturates_for_unbounded_schedules() {
        let mut algorithm =
            DepthFirst::new(settings(Dimensionality::Two, 0), DepthFirstConfig::default());
        algorithm.state.cost_per_iteration = u64::MAX as f64 / 2f64.powi(10);
        assert_eq!(algorithm.branch_saving(1, 10), i64::MAX);

        let mut branches = vec![Direction::Up, Direction::Left, Direction::Down];
        algorithm.state.branch_budget = -1;
        algorithm.prune_branches(&mut branches, 1, 10);
        assert_eq!(branches.len(), 2);
        assert_eq!(algorithm.state.branch_budget, i64::MAX - 1);
    }

    #[test]
    fn unbounded_iteration_budget_still_folds() {
        let config = DepthFirstConfig {
            max_iterations: u64::MAX,
            budget_pruning: true,
            initial_budget: -1,
            ..DepthFirstConfig::default()
        };
        let (_, score) = run("HPHPPHHPHH", config);
        assert!(score < BondScore::ZERO);
    }

    #[test]
    #[ignore = "exhaustive search over a 20-residue chain is slow"]
    fn benchmark_sequence_reaches_minus_nine() {
        let config = DepthFirstConfig {
            fix_first_direction: true,
            ..DepthFirstConfig::exhaustive()
        };
        let (_, score) = run("HPHPPHHPHPPHPHHPPHPH", config);
        assert_eq!(score, BondScore(-9));
    }
}
