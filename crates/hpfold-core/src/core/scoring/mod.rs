pub mod bond;
pub mod bounds;
pub mod fast;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Contact energy of a fold. Lower (more negative) is better.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BondScore(pub i32);

impl BondScore {
    pub const ZERO: BondScore = BondScore(0);

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_better_than(self, other: BondScore) -> bool {
        self.0 < other.0
    }

    /// The score with its sign flipped, so that larger means better.
    pub fn strength(self) -> i32 {
        -self.0
    }
}

impl Add for BondScore {
    type Output = BondScore;

    fn add(self, rhs: BondScore) -> BondScore {
        BondScore(self.0 + rhs.0)
    }
}

impl AddAssign for BondScore {
    fn add_assign(&mut self, rhs: BondScore) {
        self.0 += rhs.0;
    }
}

impl Sum for BondScore {
    fn sum<I: Iterator<Item = BondScore>>(iter: I) -> Self {
        iter.fold(BondScore::ZERO, |acc, s| acc + s)
    }
}

impl fmt::Display for BondScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_scores_are_better() {
        assert!(BondScore(-3).is_better_than(BondScore(-2)));
        assert!(!BondScore(0).is_better_than(BondScore(0)));
        assert!(BondScore(-3) < BondScore(-2));
        assert_eq!(BondScore(-4).strength(), 4);
    }

    #[test]
    fn scores_sum_like_integers() {
        let total: BondScore = [BondScore(-1), BondScore(-5), BondScore::ZERO]
            .into_iter()
            .sum();
        assert_eq!(total, BondScore(-6));

        let mut acc = BondScore(-1);
        acc += BondScore(-1);
        assert_eq!(acc.value(), -2);
    }
}
