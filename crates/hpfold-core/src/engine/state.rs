use crate::core::models::direction::Direction;
use crate::core::scoring::BondScore;
use serde::{Deserialize, Serialize};
use std::collections::{BinaryHeap, HashSet};

/// A complete fold and its bond score.
///
/// Solutions order by score first (better sorts first), then by order so that
/// sorting is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Solution {
    pub score: BondScore,
    pub order: Vec<Direction>,
}

impl Solution {
    pub fn new(score: BondScore, order: Vec<Direction>) -> Self {
        Self { score, order }
    }
}

const MAX_PREALLOCATED: usize = 1024;

/// Keeps the `capacity` best distinct folds seen so far.
///
/// Backed by a max-heap, so the worst kept solution is always at the top and
/// can be evicted in `O(log k)`.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    capacity: usize,
    heap: BinaryHeap<Solution>,
    seen: HashSet<Vec<Direction>>,
}

impl ScoreTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            heap: BinaryHeap::with_capacity(capacity.min(MAX_PREALLOCATED) + 1),
            seen: HashSet::new(),
        }
    }

    /// Offers a fold. Returns true if it was kept.
    pub fn offer(&mut self, score: BondScore, order: &[Direction]) -> bool {
        if self.seen.contains(order) {
            return false;
        }
        if self.heap.len() >= self.capacity {
            match self.heap.peek() {
                Some(worst) if score < worst.score => {}
                _ => return false,
            }
            if let Some(evicted) = self.heap.pop() {
                self.seen.remove(&evicted.order);
            }
        }
        self.seen.insert(order.to_vec());
        self.heap.push(Solution::new(score, order.to_vec()));
        true
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn worst_score(&self) -> Option<BondScore> {
        self.heap.peek().map(|s| s.score)
    }

    pub fn best(&self) -> Option<&Solution> {
        self.heap.iter().min()
    }

    /// Kept solutions, best first.
    pub fn sorted(&self) -> Vec<Solution> {
        let mut solutions: Vec<Solution> = self.heap.iter().cloned().collect();
        solutions.sort();
        solutions
    }

    pub fn into_sorted_vec(self) -> Vec<Solution> {
        self.heap.into_sorted_vec()
    }
}
