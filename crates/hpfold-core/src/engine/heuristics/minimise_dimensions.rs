use super::{Heuristic, HeuristicScore, max_of, min_of};
use crate::core::models::chain::Chain;

/// Prefers folds with a small bounding box, measured as the squared diagonal
/// of the committed residues.
#[derive(Debug, Default)]
pub struct MinimiseDimensions {
    values: Vec<f64>,
}

impl MinimiseDimensions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Heuristic for MinimiseDimensions {
    fn name(&self) -> &'static str {
        "minimise-dimensions"
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn run(&mut self, chain: &Chain) {
        self.values.push(chain.size_score() as f64);
    }

    /// Scales as `min / value`, so the smallest box scores `1.0`.
    fn interpret(&self) -> Vec<HeuristicScore> {
        let (Some(min), Some(max)) = (min_of(&self.values), max_of(&self.values)) else {
            return Vec::new();
        };
        if max - min == 0.0 {
            return vec![HeuristicScore::ZERO; self.values.len()];
        }
        self.values
            .iter()
            .map(|&v| HeuristicScore(if v == 0.0 { 1.0 } else { min / v }))
            .collect()
    }
}
