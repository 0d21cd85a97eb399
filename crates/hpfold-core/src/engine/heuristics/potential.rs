use super::{Heuristic, HeuristicScore, max_of};
use crate::core::models::chain::Chain;
use crate::core::models::residue::Residue;

pub const DEFAULT_MULT_FACTOR: f64 = 7.0;

/// Pairs `(i, j)` with `j < i` that can ever touch on a cubic lattice: an odd
/// index distance of at least 3. Stops at the first in-transit residue on
/// either side, and skips residues for which `skip` returns true.
pub(crate) fn reachable_pairs(
    residues: &[Residue],
    skip: fn(&Residue) -> bool,
) -> impl Iterator<Item = (&Residue, &Residue)> + '_ {
    residues
        .iter()
        .enumerate()
        .skip(3)
        .filter(move |(_, r)| !skip(r))
        .take_while(|(_, r)| r.is_committed())
        .flat_map(move |(i, residue)| {
            residues[..i - 1]
                .iter()
                .skip((i + 1) % 2)
                .step_by(2)
                .filter(move |other| !skip(other))
                .take_while(|other| other.is_committed())
                .map(move |other| (residue, other))
        })
}

/// Sum of inverse squared distances between non-polar residues that could
/// bond. Higher means the bonding residues are packed closer together.
#[derive(Debug)]
pub struct Potential {
    mult_factor: f64,
    values: Vec<f64>,
}

impl Default for Potential {
    fn default() -> Self {
        Self::new(DEFAULT_MULT_FACTOR)
    }
}

impl Potential {
    pub fn new(mult_factor: f64) -> Self {
        Self {
            mult_factor,
            values: Vec::new(),
        }
    }

    fn potential(chain: &Chain) -> f64 {
        reachable_pairs(chain.residues(), |r| r.label().is_polar())
            .map(|(a, b)| 1.0 / (a.position() - b.position()).len_sq() as f64)
            .sum()
    }
}

impl Heuristic for Potential {
    fn name(&self) -> &'static str {
        "potential"
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn run(&mut self, chain: &Chain) {
        self.values.push(Self::potential(chain));
    }

    /// The most compact candidate scores `1.0`; every relative shortfall is
    /// multiplied by the sharpening factor and the result clamped at zero.
    fn interpret(&self) -> Vec<HeuristicScore> {
        let max = max_of(&self.values).unwrap_or(0.0);
        if max == 0.0 {
            return vec![HeuristicScore::ZERO; self.values.len()];
        }
        self.values
            .iter()
            .map(|&v| HeuristicScore(((v / max - 1.0) * self.mult_factor + 1.0).max(0.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Direction::*;

    #[test]
    fn reachable_pairs_have_odd_distance_of_at_least_three() {
        let chain: Chain = "HHHHHHHH".parse().unwrap();
        let residues = chain.residues();
        let index = |r: &Residue| residues.iter().position(|x| std::ptr::eq(x, r)).unwrap();
        for (a, b) in reachable_pairs(residues, |_| false) {
            let distance = index(a) - index(b);
            assert!(distance >= 3 && distance % 2 == 1, "distance {}", distance);
        }
        // (3,0) (4,1) (5,0) (5,2) (6,1) (6,3) (7,0) (7,2) (7,4)
        assert_eq!(reachable_pairs(residues, |_| false).count(), 9);
    }

    #[test]
    fn square_is_more_compact_than_line() {
        let mut chain: Chain = "HPPH".parse().unwrap();
        assert!((Potential::potential(&chain) - 1.0 / 9.0).abs() < 1e-12);
        chain.set_order(&[Up, Right, Down]).unwrap();
        assert_eq!(Potential::potential(&chain), 1.0);
    }

    #[test]
    fn polar_residues_contribute_nothing() {
        let mut chain: Chain = "PPPP".parse().unwrap();
        chain.set_order(&[Up, Right, Down]).unwrap();
        assert_eq!(Potential::potential(&chain), 0.0);
    }

    #[test]
    fn stops_at_first_residue_in_transit() {
        let mut chain: Chain = "HPPH".parse().unwrap();
        chain.change_direction(2, Up, false).unwrap();
        assert_eq!(Potential::potential(&chain), 0.0);
        chain.collect_positions();
        assert!((Potential::potential(&chain) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn interpret_sharpens_and_clamps() {
        let mut heuristic = Potential::default();
        let mut chain: Chain = "HPPH".parse().unwrap();
        heuristic.run(&chain);
        chain.set_order(&[Up, Right, Down]).unwrap();
        heuristic.run(&chain);
        assert_eq!(
            heuristic.interpret(),
            vec![HeuristicScore(0.0), HeuristicScore(1.0)]
        );

        let mut mild = Potential::new(1.0);
        mild.values = vec![1.0, 2.0];
        assert_eq!(
            mild.interpret(),
            vec![HeuristicScore(0.5), HeuristicScore(1.0)]
        );
    }
}
