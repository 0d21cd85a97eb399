//! Chain-free scoring and validation used inside the search loops.
//!
//! Both functions work directly on a label slice and a direction list with the
//! first residue at the origin, so candidate folds can be evaluated without
//! building or mutating a [`Chain`](crate::core::models::chain::Chain).

use super::BondScore;
use super::bond::bond_value;
use crate::core::models::direction::Direction;
use crate::core::models::sequence::Label;
use crate::core::models::vector::Vec3;
use std::collections::HashMap;

const FORWARD_OFFSETS: [Vec3; 3] = [
    Vec3::new(1, 0, 0),
    Vec3::new(0, 1, 0),
    Vec3::new(0, 0, 1),
];

/// Computes the bond score of the fold described by `order`.
///
/// Only the first `order.len() + 1` labels are placed, so passing a prefix of
/// a full order scores the corresponding partial fold. The order is assumed to
/// be self-avoiding; use [`fast_validate_order`] first when that is not known.
pub fn fast_compute_bond_score(labels: &[Label], order: &[Direction]) -> BondScore {
    let Some((&first, rest)) = labels.split_first() else {
        return BondScore::ZERO;
    };

    let mut sites: HashMap<Vec3, Label> = HashMap::with_capacity(order.len() + 1);
    let mut score = BondScore::ZERO;
    let mut position = Vec3::ZERO;
    let mut previous = first;

    if !first.is_polar() {
        sites.insert(position, first);
    }

    for (&direction, &label) in order.iter().zip(rest) {
        position += direction.delta();

        // Chain neighbours are always lattice neighbours; cancel them in advance.
        score.0 -= bond_value(previous, label).0;

        if !label.is_polar() {
            sites.insert(position, label);
        }
        previous = label;
    }

    for (&site, &label) in &sites {
        for offset in FORWARD_OFFSETS {
            if let Some(&other) = sites.get(&(site + offset)) {
                score += bond_value(label, other);
            }
        }
    }

    score
}

/// Returns true iff the walk described by `order` never revisits a site.
///
/// Positions are packed into `x * x_mult + y * y_mult + z` with
/// `y_mult = order.len() + 1` and `x_mult = y_mult^2 + 1`, wrapped into a flat
/// table of `y_mult^3` slots. Two distinct sites of one walk of `n` steps never
/// share a slot.
pub fn fast_validate_order(order: &[Direction]) -> bool {
    let y_mult = order.len() as i64 + 1;
    let x_mult = y_mult * y_mult + 1;
    let size = y_mult * y_mult * y_mult;

    let mut visited = vec![false; size as usize];
    let (mut x, mut y, mut z) = (0i64, 0i64, 0i64);
    visited[0] = true;

    for direction in order {
        let delta = direction.delta();
        x += delta.x as i64;
        y += delta.y as i64;
        z += delta.z as i64;

        let slot = (x * x_mult + y * y_mult + z).rem_euclid(size) as usize;
        if visited[slot] {
            return false;
        }
        visited[slot] = true;
    }

    true
}
