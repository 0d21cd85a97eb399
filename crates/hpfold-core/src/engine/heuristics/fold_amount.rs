use super::{Heuristic, HeuristicScore, max_of};
use crate::core::models::chain::Chain;

/// Counts corners, i.e. committed residues whose direction differs from their
/// predecessor's. More corners means a more compact fold and more chances to bond.
#[derive(Debug, Default)]
pub struct FoldAmount {
    values: Vec<f64>,
}

impl FoldAmount {
    pub fn new() -> Self {
        Self::default()
    }

    fn corners(chain: &Chain) -> usize {
        chain
            .residues()
            .windows(2)
            .skip(1)
            .filter(|pair| pair[1].is_committed() && pair[1].direction() != pair[0].direction())
            .count()
    }
}

impl Heuristic for FoldAmount {
    fn name(&self) -> &'static str {
        "fold-amount"
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn run(&mut self, chain: &Chain) {
        self.values.push(Self::corners(chain) as f64);
    }

    fn interpret(&self) -> Vec<HeuristicScore> {
        let max = max_of(&self.values).unwrap_or(0.0);
        if max == 0.0 {
            return vec![HeuristicScore::ZERO; self.values.len()];
        }
        self.values
            .iter()
            .map(|&v| HeuristicScore(v / max))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Direction::*;

    #[test]
    fn counts_corners_of_committed_residues() {
        let mut chain: Chain = "HHHH".parse().unwrap();
        assert_eq!(FoldAmount::corners(&chain), 0);
        chain.set_order(&[Up, Right, Down]).unwrap();
        assert_eq!(FoldAmount::corners(&chain), 2);
    }

    #[test]
    fn in_transit_residues_are_not_counted() {
        let mut chain: Chain = "HHHHH".parse().unwrap();
        chain.change_direction(2, Up, false).unwrap();
        // Residues 3 and 4 are in transit; only residue 2 makes a corner.
        assert_eq!(FoldAmount::corners(&chain), 1);
    }

    #[test]
    fn interpret_scales_by_maximum() {
        let mut heuristic = FoldAmount::new();
        let mut chain: Chain = "HHHH".parse().unwrap();
        heuristic.run(&chain);
        chain.set_order(&[Up, Right, Down]).unwrap();
        heuristic.run(&chain);
        assert_eq!(
            heuristic.interpret(),
            vec![HeuristicScore(0.0), HeuristicScore(1.0)]
        );
    }

    #[test]
    fn interpret_all_straight_collapses_to_zero() {
        let mut heuristic = FoldAmount::new();
        let chain: Chain = "HHHH".parse().unwrap();
        heuristic.run(&chain);
        heuristic.run(&chain);
        assert_eq!(heuristic.interpret(), vec![HeuristicScore::ZERO; 2]);
        heuristic.reset();
        assert!(heuristic.interpret().is_empty());
    }
}
