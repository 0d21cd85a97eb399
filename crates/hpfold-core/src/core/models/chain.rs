use super::direction::Direction;
use super::residue::{Residue, ResidueState};
use super::sequence::{Label, Sequence, SequenceError};
use super::vector::{self, Vec3};
use crate::core::scoring::BondScore;
use crate::core::scoring::bond::bond_value;
use itertools::Itertools;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Residue {index} is the first residue and has no predecessor")]
    NoPredecessor { index: usize },

    #[error("Residue index {index} is out of range for a chain of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Residue {index} cannot move to {position}: occupied by residue {other}")]
    Collision {
        index: usize,
        other: usize,
        position: Vec3,
    },

    #[error("Order has {actual} directions, expected {expected}")]
    OrderLength { expected: usize, actual: usize },

    #[error("Cannot revert: no preserved state on the history stack")]
    EmptyHistory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    residues: Vec<Residue>,
    occupancy: HashMap<Vec3, usize>,
}

/// A lattice protein: residues stored by sequence index, plus an occupancy map
/// from position to the committed residue that holds it.
///
/// Every committed residue's position maps back to that residue, and no two
/// committed residues share a position. Residues in transit are excluded from
/// the map until they are placed again. The occupancy map is only mutated
/// through `Chain` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    sequence: Sequence,
    residues: Vec<Residue>,
    occupancy: HashMap<Vec3, usize>,
    history: Vec<Snapshot>,
}

impl Chain {
    /// Builds the chain in a straight line along +X with the first residue at the origin.
    pub fn new(sequence: Sequence) -> Self {
        let residues = sequence
            .iter()
            .enumerate()
            .map(|(i, label)| {
                Residue::new(
                    label,
                    Vec3::new(i as i32, 0, 0),
                    (i > 0).then_some(Direction::Right),
                )
            })
            .collect();

        let mut chain = Self {
            sequence,
            residues,
            occupancy: HashMap::new(),
            history: Vec::new(),
        };
        chain.collect_positions();
        chain
    }

    pub fn with_order(sequence: Sequence, order: &[Direction]) -> Result<Self, ChainError> {
        let mut chain = Self::new(sequence);
        chain.set_order(order)?;
        Ok(chain)
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn labels(&self) -> &[Label] {
        self.sequence.labels()
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    /// Index of the committed residue at `position`, if any.
    pub fn occupant(&self, position: Vec3) -> Option<usize> {
        self.occupancy.get(&position).copied()
    }

    pub fn committed_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.residues
            .iter()
            .filter(|r| r.is_committed())
            .map(|r| r.position)
    }

    pub fn committed_count(&self) -> usize {
        self.occupancy.len()
    }

    fn check_index(&self, index: usize) -> Result<(), ChainError> {
        if index >= self.residues.len() {
            return Err(ChainError::IndexOutOfRange {
                index,
                len: self.residues.len(),
            });
        }
        Ok(())
    }

    fn predecessor_position(&self, index: usize) -> Result<Vec3, ChainError> {
        self.check_index(index)?;
        if index == 0 {
            return Err(ChainError::NoPredecessor { index });
        }
        Ok(self.residues[index - 1].position)
    }

    /// Filters `candidates` down to the directions residue `index` can take
    /// from its predecessor without landing on another committed residue.
    ///
    /// A direction that keeps a committed residue where it is always counts as free.
    pub fn free_directions(
        &self,
        index: usize,
        candidates: &[Direction],
    ) -> Result<Vec<Direction>, ChainError> {
        let origin = self.predecessor_position(index)?;
        Ok(candidates
            .iter()
            .copied()
            .filter(|direction| {
                self.occupancy
                    .get(&(origin + direction.delta()))
                    .is_none_or(|&other| other == index)
            })
            .collect())
    }

    /// Takes a residue out of the occupancy map.
    fn release(&mut self, index: usize) {
        let residue = &mut self.residues[index];
        if residue.state == ResidueState::Committed {
            if self.occupancy.get(&residue.position) == Some(&index) {
                self.occupancy.remove(&residue.position);
            }
            residue.state = ResidueState::InTransit;
        }
    }

    /// Points residue `index` in `direction` from its predecessor and shifts the
    /// whole downstream suffix by the same displacement.
    ///
    /// Downstream residues are left in transit. Unless `ignore_occupancy` is set,
    /// the moved residue is committed again, and landing on an upstream residue
    /// fails with [`ChainError::Collision`] without modifying the chain.
    pub fn change_direction(
        &mut self,
        index: usize,
        direction: Direction,
        ignore_occupancy: bool,
    ) -> Result<(), ChainError> {
        let target = self.predecessor_position(index)? + direction.delta();

        if !ignore_occupancy {
            if let Some(&other) = self.occupancy.get(&target) {
                if other < index {
                    return Err(ChainError::Collision {
                        index,
                        other,
                        position: target,
                    });
                }
            }
        }

        let shift = target - self.residues[index].position;

        self.release(index);
        let residue = &mut self.residues[index];
        residue.position = target;
        residue.direction = Some(direction);

        for downstream in index + 1..self.residues.len() {
            self.release(downstream);
            self.residues[downstream].position += shift;
        }

        if !ignore_occupancy {
            self.occupancy.insert(target, index);
            self.residues[index].state = ResidueState::Committed;
        }

        debug_assert!(self.is_consistent(), "occupancy map out of sync");
        Ok(())
    }

    /// Lays the chain out along `order` in one pass and rebuilds the occupancy map.
    ///
    /// The order does not have to be self-avoiding; see [`Chain::has_valid_order`].
    pub fn set_order(&mut self, order: &[Direction]) -> Result<(), ChainError> {
        let expected = self.residues.len().saturating_sub(1);
        if order.len() != expected {
            return Err(ChainError::OrderLength {
                expected,
                actual: order.len(),
            });
        }

        let mut position = Vec3::ZERO;
        self.residues[0].position = position;
        self.residues[0].direction = None;
        for (residue, &direction) in self.residues[1..].iter_mut().zip(order) {
            position += direction.delta();
            residue.position = position;
            residue.direction = Some(direction);
        }

        self.collect_positions();
        Ok(())
    }

    pub fn order(&self) -> Vec<Direction> {
        self.residues
            .iter()
            .skip(1)
            .filter_map(|r| r.direction)
            .collect()
    }

    /// Resets to the straight line the chain was constructed in.
    pub fn straighten(&mut self) {
        for (i, residue) in self.residues.iter_mut().enumerate() {
            residue.position = Vec3::new(i as i32, 0, 0);
            residue.direction = (i > 0).then_some(Direction::Right);
        }
        self.collect_positions();
    }

    /// Rebuilds the occupancy map from the current positions and commits every
    /// residue. When positions overlap, only the earliest residue on a site is
    /// committed.
    pub fn collect_positions(&mut self) {
        self.occupancy.clear();
        for (i, residue) in self.residues.iter_mut().enumerate() {
            match self.occupancy.entry(residue.position) {
                Entry::Vacant(slot) => {
                    slot.insert(i);
                    residue.state = ResidueState::Committed;
                }
                Entry::Occupied(_) => residue.state = ResidueState::InTransit,
            }
        }
    }

    /// Pushes the current layout, states and occupancy map onto the history stack.
    pub fn preserve(&mut self) {
        self.history.push(Snapshot {
            residues: self.residues.clone(),
            occupancy: self.occupancy.clone(),
        });
    }

    /// Restores the most recently preserved state.
    pub fn revert(&mut self) -> Result<(), ChainError> {
        let snapshot = self.history.pop().ok_or(ChainError::EmptyHistory)?;
        self.residues = snapshot.residues;
        self.occupancy = snapshot.occupancy;
        Ok(())
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    /// Runs `action` between a `preserve` and a `revert`, so the chain is
    /// restored whether or not the action succeeds.
    pub fn transaction<F, R, E>(&mut self, action: F) -> Result<R, E>
    where
        F: FnOnce(&mut Self) -> Result<R, E>,
        E: From<ChainError>,
    {
        self.preserve();
        let result = action(self);
        self.revert()?;
        result
    }

    pub fn has_valid_order(&self) -> bool {
        self.residues.iter().map(|r| r.position).all_unique()
    }

    /// Sums the bond value of every lattice-adjacent pair that is not adjacent
    /// in the chain, by checking all pairs.
    pub fn bond_score(&self) -> BondScore {
        self.contacts().map(|(a, b)| bond_value(a.label, b.label)).sum()
    }

    /// Index pairs `(i, j)` with `i < j` that form a non-zero bond.
    pub fn bonded_pairs(&self) -> Vec<(usize, usize)> {
        self.residues
            .iter()
            .enumerate()
            .tuple_combinations()
            .filter(|((i, a), (j, b))| {
                j - i > 1
                    && a.position.is_lattice_neighbour(b.position)
                    && bond_value(a.label, b.label) != BondScore::ZERO
            })
            .map(|((i, _), (j, _))| (i, j))
            .collect()
    }

    fn contacts(&self) -> impl Iterator<Item = (&Residue, &Residue)> + '_ {
        self.residues
            .iter()
            .enumerate()
            .tuple_combinations()
            .filter(|((i, a), (j, b))| j - i > 1 && a.position.is_lattice_neighbour(b.position))
            .map(|((_, a), (_, b))| (a, b))
    }

    /// Lattice sites adjacent to residue `index`.
    pub fn neighbour_positions(&self, index: usize) -> Option<impl Iterator<Item = Vec3>> {
        let position = self.residues.get(index)?.position;
        Some(Direction::ALL.into_iter().map(move |d| position + d.delta()))
    }

    /// Per-axis extent of the committed residues' bounding box.
    pub fn extent(&self) -> Vec3 {
        vector::extent(self.committed_positions())
    }

    /// Squared diagonal of the committed bounding box.
    pub fn size_score(&self) -> i64 {
        self.extent().len_sq()
    }

    pub fn area(&self) -> i64 {
        self.extent().area()
    }

    pub fn volume(&self) -> i64 {
        self.extent().volume()
    }

    /// Checks the occupancy invariant in both directions.
    pub fn is_consistent(&self) -> bool {
        let map_points_to_committed = self.occupancy.iter().all(|(position, &i)| {
            self.residues
                .get(i)
                .is_some_and(|r| r.is_committed() && r.position == *position)
        });
        let committed_are_mapped = self
            .residues
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_committed())
            .all(|(i, r)| self.occupancy.get(&r.position) == Some(&i));

        map_points_to_committed && committed_are_mapped
    }
}

impl FromStr for Chain {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Dimensionality;
    use crate::core::models::direction::Direction::*;
    use crate::core::models::direction::parse_order;
    use crate::core::scoring::fast::{fast_compute_bond_score, fast_validate_order};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn chain(s: &str) -> Chain {
        s.parse().unwrap()
    }

    fn random_walk(rng: &mut StdRng, len: usize, dims: Dimensionality) -> Vec<Direction> {
        let directions = dims.directions();
        let mut order: Vec<Direction> = Vec::with_capacity(len);
        while order.len() < len {
            let next = *directions.choose(rng).unwrap();
            if order.last().is_some_and(|&prev| prev == next.reverse()) {
                continue;
            }
            order.push(next);
        }
        order
    }

    #[test]
    fn new_chain_is_a_valid_straight_line() {
        for n in 1..30 {
            let seq = "H".repeat(n);
            let c = chain(&seq);
            assert!(c.has_valid_order());
            assert!(c.is_consistent());
            assert_eq!(c.committed_count(), n);
            assert_eq!(c.order(), vec![Right; n - 1]);
            for (i, r) in c.residues().iter().enumerate() {
                assert_eq!(r.position(), Vec3::new(i as i32, 0, 0));
            }
        }
    }

    #[test]
    fn from_str_surfaces_invalid_labels() {
        assert!(matches!(
            "HPZ".parse::<Chain>(),
            Err(SequenceError::InvalidLabel { label: 'Z', position: 2 })
        ));
    }

    #[test]
    fn closed_square_of_cysteines_scores_minus_five() {
        let mut c = chain("CHHC");
        c.set_order(&[Left, Up, Right]).unwrap();
        assert_eq!(c.bond_score(), BondScore(-5));
        assert_eq!(c.bonded_pairs(), vec![(0, 3)]);
    }

    #[test]
    fn straight_line_scores_zero() {
        let mut c = chain("HHHH");
        c.set_order(&[Left, Left, Left]).unwrap();
        assert_eq!(c.bond_score(), BondScore::ZERO);
        assert!(c.bonded_pairs().is_empty());
    }

    #[test]
    fn set_order_round_trips() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut c = chain("HPHPPHHPHPPHPHHPPHPH");
        let mut checked = 0;
        while checked < 50 {
            let order = random_walk(&mut rng, c.len() - 1, Dimensionality::Three);
            if !fast_validate_order(&order) {
                continue;
            }
            c.set_order(&order).unwrap();
            assert_eq!(c.order(), order);
            assert!(c.has_valid_order());
            assert!(c.is_consistent());
            checked += 1;
        }
    }

    #[test]
    fn set_order_rejects_wrong_length() {
        let mut c = chain("HHHH");
        assert_eq!(
            c.set_order(&[Up, Up]),
            Err(ChainError::OrderLength {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn set_order_with_overlap_is_detected_but_consistent() {
        let mut c = chain("HHHHH");
        c.set_order(&[Right, Up, Left, Down]).unwrap();
        assert!(!c.has_valid_order());
        assert!(c.is_consistent());
        assert_eq!(c.committed_count(), 4);
        assert_eq!(c.residue(4).unwrap().state(), ResidueState::InTransit);
    }

    #[test]
    fn fast_and_full_scores_agree_on_valid_orders() {
        let mut rng = StdRng::seed_from_u64(42);
        let sequences = ["HPHPPHHPHPPHPHHPPHPH", "CPPCHPPHCHHC", "HHPHHHPH", "CCCCCCCCCC"];
        for seq in sequences {
            let mut c = chain(seq);
            for dims in [Dimensionality::Two, Dimensionality::Three] {
                let mut checked = 0;
                while checked < 100 {
                    let order = random_walk(&mut rng, c.len() - 1, dims);
                    if !fast_validate_order(&order) {
                        continue;
                    }
                    c.set_order(&order).unwrap();
                    assert_eq!(
                        fast_compute_bond_score(c.labels(), &order),
                        c.bond_score(),
                        "mismatch for {seq} with order {order:?}"
                    );
                    checked += 1;
                }
            }
        }
    }

    #[test]
    fn benchmark_fold_scores_minus_nine() {
        let order = parse_order("1,2,2,-1,-2,-1,2,-1,-1,-2,1,-2,1,-2,-1,-2,1,1,2").unwrap();
        let c = Chain::with_order("HPHPPHHPHPPHPHHPPHPH".parse().unwrap(), &order).unwrap();
        assert!(c.has_valid_order());
        assert_eq!(c.bond_score(), BondScore(-9));
    }

    #[test]
    fn free_directions_exclude_committed_sites() {
        let c = chain("HHHH");
        let free = c.free_directions(1, Dimensionality::Two.directions()).unwrap();
        assert_eq!(free, vec![Down, Left, Right, Up]);

        let free = c.free_directions(2, Dimensionality::Two.directions()).unwrap();
        assert_eq!(free, vec![Down, Right, Up]);
    }

    #[test]
    fn free_directions_requires_a_predecessor() {
        let c = chain("HHHH");
        assert_eq!(
            c.free_directions(0, &[Up]),
            Err(ChainError::NoPredecessor { index: 0 })
        );
        assert_eq!(
            c.free_directions(9, &[Up]),
            Err(ChainError::IndexOutOfRange { index: 9, len: 4 })
        );
    }

    #[test]
    fn change_direction_cascades_and_ghosts_suffix() {
        let mut c = chain("HHHH");
        c.change_direction(1, Up, false).unwrap();

        let positions: Vec<_> = c.residues().iter().map(|r| r.position()).collect();
        assert_eq!(
            positions,
            vec![
                Vec3::new(0, 0, 0),
                Vec3::new(0, 1, 0),
                Vec3::new(1, 1, 0),
                Vec3::new(2, 1, 0)
            ]
        );
        assert!(c.residue(1).unwrap().is_committed());
        assert_eq!(c.residue(2).unwrap().state(), ResidueState::InTransit);
        assert_eq!(c.residue(3).unwrap().state(), ResidueState::InTransit);
        assert_eq!(c.occupant(Vec3::new(0, 1, 0)), Some(1));
        assert_eq!(c.occupant(Vec3::new(2, 0, 0)), None);
        assert_eq!(c.committed_count(), 2);
        assert!(c.is_consistent());
    }

    #[test]
    fn change_direction_reports_collision_without_mutating() {
        let mut c = chain("HHHHH");
        c.change_direction(1, Up, false).unwrap();
        c.change_direction(2, Right, false).unwrap();
        c.change_direction(3, Down, false).unwrap();
        let before = c.clone();

        let err = c.change_direction(4, Left, false).unwrap_err();
        assert_eq!(
            err,
            ChainError::Collision {
                index: 4,
                other: 0,
                position: Vec3::ZERO
            }
        );
        assert_eq!(c, before);
    }

    #[test]
    fn ignoring_occupancy_leaves_residue_in_transit() {
        let mut c = chain("HHH");
        c.change_direction(1, Up, true).unwrap();
        assert_eq!(c.residue(1).unwrap().state(), ResidueState::InTransit);
        assert!(c.is_consistent());

        c.collect_positions();
        assert!(c.residues().iter().all(Residue::is_committed));
        assert!(c.is_consistent());
    }

    #[test]
    fn preserve_and_revert_restore_exact_state() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = chain("HPHPPHHPHPPH");
        c.set_order(&[Up, Right, Down, Right, Up, Up, Left, Up, Right, Right, Down])
            .unwrap();

        for k in 0..20 {
            let before = c.clone();
            c.preserve();
            for _ in 0..k {
                let index = rng.gen_range(1..c.len());
                let free = c
                    .free_directions(index, Dimensionality::Three.directions())
                    .unwrap();
                if let Some(&direction) = free.choose(&mut rng) {
                    c.change_direction(index, direction, false).unwrap();
                }
            }
            c.revert().unwrap();
            assert_eq!(c, before);
        }
    }

    #[test]
    fn nested_preserve_revert_is_lifo() {
        let mut c = chain("HHHHH");
        let original = c.clone();

        c.preserve();
        c.change_direction(1, Up, false).unwrap();
        let after_first = c.clone();

        c.preserve();
        c.change_direction(2, Up, false).unwrap();
        assert_eq!(c.history_depth(), 2);

        c.revert().unwrap();
        assert_eq!(c, after_first);
        c.revert().unwrap();
        assert_eq!(c, original);
        assert_eq!(c.revert(), Err(ChainError::EmptyHistory));
    }

    #[test]
    fn transaction_restores_even_when_action_fails() {
        let mut c = chain("HHHHH");
        let before = c.clone();

        let result: Result<(), ChainError> = c.transaction(|c| {
            c.change_direction(1, Up, false)?;
            c.change_direction(2, Down, false)
        });
        assert!(matches!(result, Err(ChainError::Collision { .. })));
        assert_eq!(c, before);

        let score: Result<BondScore, ChainError> = c.transaction(|c| {
            c.set_order(&[Up, Right, Down, Right])?;
            Ok(c.bond_score())
        });
        assert_eq!(score, Ok(BondScore(-1)));
        assert_eq!(c, before);
    }

    #[test]
    fn straighten_restores_initial_layout() {
        let mut c = chain("CHHC");
        let initial = c.clone();
        c.set_order(&[Left, Up, Right]).unwrap();
        c.straighten();
        assert_eq!(c, initial);
    }

    #[test]
    fn dimension_metrics_follow_bounding_box() {
        let mut c = chain("HHHHHH");
        c.set_order(&[Right, Right, Up, Left, Left]).unwrap();
        assert_eq!(c.extent(), Vec3::new(2, 1, 0));
        assert_eq!(c.size_score(), 5);
        assert_eq!(c.area(), 2);
        assert_eq!(c.volume(), 0);
        assert_eq!(c.neighbour_positions(0).unwrap().count(), 6);
        assert!(c.neighbour_positions(6).is_none());
    }
}
