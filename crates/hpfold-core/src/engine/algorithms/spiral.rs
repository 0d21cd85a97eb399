use super::{FoldingAlgorithm, TaskProgress, finish, trivial_score};
use crate::core::models::chain::Chain;
use crate::core::models::direction::{Dimensionality, Direction};
use crate::core::scoring::BondScore;
use crate::core::scoring::fast::fast_compute_bond_score;
use crate::engine::config::SearchSettings;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::state::Solution;
use tracing::{info, instrument};

/// Indices into the 2D direction set, giving Down, Left, Up, Right.
const TURN_SEQUENCE: [usize; 4] = [0, 1, 3, 2];

/// Lengths of the straight runs of a square spiral covering `steps` steps:
/// 1, 1, 2, 2, 3, 3, ... with the last run cut short.
pub(crate) fn run_lengths(steps: usize) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut total = 0;
    let mut i = 2;
    while total < steps {
        let run = (i / 2).min(steps - total);
        runs.push(run);
        total += run;
        i += 1;
    }
    runs
}

pub(crate) fn spiral_order(steps: usize) -> Vec<Direction> {
    let directions = Dimensionality::Two.directions();
    run_lengths(steps)
        .into_iter()
        .zip(TURN_SEQUENCE.iter().cycle())
        .flat_map(|(run, &turn)| std::iter::repeat_n(directions[turn], run))
        .collect()
}

/// Winds the chain into a square spiral. Deterministic and 2D only.
#[derive(Debug, Clone)]
pub struct Spiral {
    settings: SearchSettings,
}

impl Spiral {
    pub fn new(settings: SearchSettings) -> Self {
        Self { settings }
    }
}

impl FoldingAlgorithm for Spiral {
    fn name(&self) -> &'static str {
        "spiral"
    }

    #[instrument(skip_all, name = "spiral")]
    fn run(
        &mut self,
        chain: &mut Chain,
        reporter: &ProgressReporter,
    ) -> Result<BondScore, EngineError> {
        if let Some(score) = trivial_score(chain) {
            return Ok(score);
        }
        if self.settings.dimensions != Dimensionality::Two {
            return Err(EngineError::UnsupportedDimensions {
                algorithm: self.name(),
                dimensions: self.settings.dimensions,
            });
        }

        let progress = TaskProgress::start(reporter, 1);
        let order = spiral_order(chain.len() - 1);
        let score = fast_compute_bond_score(chain.labels(), &order);
        progress.finish();

        info!(score = score.value(), "Spiral fold built.");
        finish(chain, Some(&Solution::new(score, order)), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Direction::*;
    use crate::engine::algorithms::test_support::*;

    #[test]
    fn run_lengths_grow_in_pairs_and_truncate() {
        assert_eq!(run_lengths(7), vec![1, 1, 2, 2, 1]);
        assert_eq!(run_lengths(9), vec![1, 1, 2, 2, 3]);
        assert!(run_lengths(0).is_empty());
    }

    #[test]
    fn spiral_winds_down_left_up_right() {
        assert_eq!(spiral_order(7), vec![Down, Left, Up, Up, Right, Right, Down]);
    }

    #[test]
    fn spiral_is_always_self_avoiding() {
        let mut chain: Chain = "HPHPPHHPHPPHPHHPPHPHHPPHHPPH".parse().unwrap();
        let score = Spiral::new(settings(Dimensionality::Two, 0))
            .run(&mut chain, &ProgressReporter::new())
            .unwrap();
        assert_contract(&chain, score);
    }

    #[test]
    fn three_dimensions_are_rejected() {
        let mut chain: Chain = "HPHP".parse().unwrap();
        let err = Spiral::new(settings(Dimensionality::Three, 0))
            .run(&mut chain, &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnsupportedDimensions {
                algorithm: "spiral",
                dimensions: Dimensionality::Three
            }
        ));
    }
}
