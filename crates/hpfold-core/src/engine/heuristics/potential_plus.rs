use super::potential::reachable_pairs;
use super::{Heuristic, HeuristicScore, max_of, min_of};
use crate::core::models::chain::Chain;
use crate::core::models::sequence::Label;

/// Pair weight: attractive pairs are positive, mixing polar with
/// non-polar residues is penalized.
fn weight(a: Label, b: Label) -> f64 {
    use Label::*;
    match (a, b) {
        (C, C) => 4.0,
        (H, H) | (C, H) | (H, C) | (P, P) => 1.0,
        (H, P) | (P, H) => -1.0,
        (C, P) | (P, C) => -4.0,
    }
}

/// Label-weighted variant of [`Potential`](super::Potential) that also
/// scores polar residues.
#[derive(Debug, Default)]
pub struct PotentialPlus {
    values: Vec<f64>,
}

impl PotentialPlus {
    pub fn new() -> Self {
        Self::default()
    }

    fn potential(chain: &Chain) -> f64 {
        reachable_pairs(chain.residues(), |_| false)
            .map(|(a, b)| {
                weight(a.label(), b.label()) / (a.position() - b.position()).len_sq() as f64
            })
            .sum()
    }
}

impl Heuristic for PotentialPlus {
    fn name(&self) -> &'static str {
        "potential-plus"
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn run(&mut self, chain: &Chain) {
        self.values.push(Self::potential(chain));
    }

    /// Shifts by the minimum and scales into `[0, 1]`.
    fn interpret(&self) -> Vec<HeuristicScore> {
        let Some(min) = min_of(&self.values) else {
            return Vec::new();
        };
        let shifted: Vec<f64> = self.values.iter().map(|v| v - min).collect();
        let max = max_of(&shifted).unwrap_or(0.0);
        if max == 0.0 {
            return vec![HeuristicScore::ZERO; shifted.len()];
        }
        shifted.into_iter().map(|v| HeuristicScore(v / max)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Direction::*;

    fn scores_for(sequence: &str) -> Vec<HeuristicScore> {
        let mut heuristic = PotentialPlus::new();
        let mut chain: Chain = sequence.parse().unwrap();
        heuristic.run(&chain);
        chain.set_order(&[Up, Right, Down]).unwrap();
        heuristic.run(&chain);
        heuristic.interpret()
    }

    #[test]
    fn weights_are_symmetric() {
        for a in [Label::H, Label::P, Label::C] {
            for b in [Label::H, Label::P, Label::C] {
                assert_eq!(weight(a, b), weight(b, a));
            }
        }
    }

    #[test]
    fn attractive_pair_prefers_the_square() {
        assert_eq!(
            scores_for("HPPH"),
            vec![HeuristicScore(0.0), HeuristicScore(1.0)]
        );
    }

    #[test]
    fn repulsive_pair_prefers_the_line() {
        assert_eq!(
            scores_for("CPPP"),
            vec![HeuristicScore(1.0), HeuristicScore(0.0)]
        );
    }

    #[test]
    fn identical_candidates_collapse_to_zero() {
        let mut heuristic = PotentialPlus::new();
        let chain: Chain = "CHHC".parse().unwrap();
        heuristic.run(&chain);
        heuristic.run(&chain);
        assert_eq!(heuristic.interpret(), vec![HeuristicScore::ZERO; 2]);
    }
}
