use super::{Heuristic, HeuristicScore, max_of, min_of};
use crate::core::models::chain::Chain;
use crate::core::models::sequence::Label;

/// Pulls the hydrophobic core together: sums `1 / d` over every pair of
/// committed `H` residues, with `d` their Euclidean distance.
///
/// Unlike [`Potential`](super::Potential) this looks at all `H` pairs, not only
/// those that could ever bond, so it also rewards folds that merely bring the
/// core closer.
#[derive(Debug, Default)]
pub struct HydrophobicInteraction {
    values: Vec<f64>,
}

impl HydrophobicInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    fn interaction(chain: &Chain) -> f64 {
        let core: Vec<_> = chain
            .residues()
            .iter()
            .filter(|r| r.is_committed() && r.label() == Label::H)
            .map(|r| r.position())
            .collect();

        let mut total = 0.0;
        for (i, &a) in core.iter().enumerate() {
            for &b in &core[i + 1..] {
                let d_sq = (a - b).len_sq();
                if d_sq > 0 {
                    total += 1.0 / (d_sq as f64).sqrt();
                }
            }
        }
        total
    }
}

impl Heuristic for HydrophobicInteraction {
    fn name(&self) -> &'static str {
        "hydrophobic-interaction"
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn run(&mut self, chain: &Chain) {
        self.values.push(Self::interaction(chain));
    }

    /// Min-max scaled: the tightest core scores `1.0`, the loosest `0.0`.
    fn interpret(&self) -> Vec<HeuristicScore> {
        let (Some(min), Some(max)) = (min_of(&self.values), max_of(&self.values)) else {
            return Vec::new();
        };
        let span = max - min;
        if span == 0.0 {
            return vec![HeuristicScore::ZERO; self.values.len()];
        }
        self.values
            .iter()
            .map(|&v| HeuristicScore((v - min) / span))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Direction::*;
    use crate::engine::heuristics::HeuristicSet;

    #[test]
    fn only_committed_hydrophobic_pairs_count() {
        let mut chain: Chain = "HPPH".parse().unwrap();
        assert!((HydrophobicInteraction::interaction(&chain) - 1.0 / 3.0).abs() < 1e-12);

        chain.set_order(&[Up, Right, Down]).unwrap();
        assert_eq!(HydrophobicInteraction::interaction(&chain), 1.0);

        let cysteines: Chain = "CPPC".parse().unwrap();
        assert_eq!(HydrophobicInteraction::interaction(&cysteines), 0.0);

        chain.change_direction(2, Up, false).unwrap();
        assert_eq!(HydrophobicInteraction::interaction(&chain), 0.0);
    }

    #[test]
    fn compact_core_ranks_first() {
        let mut heuristic = HydrophobicInteraction::new();
        let mut chain: Chain = "HHPHH".parse().unwrap();
        heuristic.run(&chain);
        chain.set_order(&[Up, Right, Down, Down]).unwrap();
        heuristic.run(&chain);
        chain.set_order(&[Right, Up, Right, Right]).unwrap();
        heuristic.run(&chain);

        let scores = heuristic.interpret();
        assert_eq!(scores[0], HeuristicScore(0.0));
        assert_eq!(scores[1], HeuristicScore(1.0));
        assert!(scores[2].value() > 0.0 && scores[2].value() < 1.0);
    }

    #[test]
    fn rank_prefers_closing_the_core() {
        let mut chain: Chain = "HPPH".parse().unwrap();
        chain.set_order(&[Right, Up, Up]).unwrap();
        let mut set = HeuristicSet::new(vec![Box::new(HydrophobicInteraction::new())]);

        let ranked = set.rank(&mut chain, 3, &[Up, Right, Left], true).unwrap();
        assert_eq!(ranked[0].direction, Left);
        assert_eq!(ranked[0].score, HeuristicScore(1.0));
        assert_eq!(ranked[1].direction, Up);
        assert_eq!(ranked[2].direction, Right);
    }

    #[test]
    fn equal_values_collapse_to_zero() {
        let mut heuristic = HydrophobicInteraction::new();
        let chain: Chain = "HPH".parse().unwrap();
        heuristic.run(&chain);
        heuristic.run(&chain);
        assert_eq!(heuristic.interpret(), vec![HeuristicScore::ZERO; 2]);
        heuristic.reset();
        assert!(heuristic.interpret().is_empty());
    }
}
