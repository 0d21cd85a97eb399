use super::{FoldingAlgorithm, TaskProgress, finish, trivial_score};
use crate::core::models::chain::Chain;
use crate::core::models::direction::Direction;
use crate::core::models::sequence::Label;
use crate::core::scoring::BondScore;
use crate::core::scoring::fast::{fast_compute_bond_score, fast_validate_order};
use crate::engine::budget::SearchBudget;
use crate::engine::config::{BeamSearchConfig, SearchSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::state::Solution;
use std::collections::VecDeque;
use tracing::{debug, info, instrument};

/// Partial orders bucketed by integer priority.
///
/// Pops always come from the highest non-empty bucket, first in first out.
#[derive(Debug, Default)]
pub(crate) struct StateQueue {
    buckets: Vec<VecDeque<Vec<Direction>>>,
    len: usize,
}

impl StateQueue {
    pub(crate) fn push(&mut self, order: Vec<Direction>, priority: usize) {
        if self.buckets.len() <= priority {
            self.buckets.resize_with(priority + 1, VecDeque::new);
        }
        self.buckets[priority].push_back(order);
        self.len += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<Vec<Direction>> {
        while let Some(top) = self.buckets.last_mut() {
            if let Some(order) = top.pop_front() {
                self.len -= 1;
                return Some(order);
            }
            self.buckets.pop();
        }
        None
    }

    /// Discards entries from the lowest buckets until at most `width` remain.
    pub(crate) fn truncate(&mut self, width: usize) {
        for bucket in &mut self.buckets {
            while self.len > width {
                if bucket.pop_back().is_none() {
                    break;
                }
                self.len -= 1;
            }
            if self.len <= width {
                return;
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// Best-first search over partial orders.
///
/// A partial order's priority is its bond strength so far, minus a depth
/// penalty of `floor(depth * scoring_param)`, floored at zero. Orders are
/// grown by every non-reversing direction that keeps them self-avoiding.
pub struct BeamSearch {
    settings: SearchSettings,
    config: BeamSearchConfig,
}

impl BeamSearch {
    pub fn new(settings: SearchSettings, config: BeamSearchConfig) -> Self {
        Self { settings, config }
    }

    fn priority(&self, labels: &[Label], order: &[Direction]) -> usize {
        let strength = fast_compute_bond_score(labels, order).strength() as i64;
        let penalty = (order.len() as f64 * self.config.scoring_param).floor() as i64;
        (strength - penalty).max(0) as usize
    }

    fn expand(&self, order: &[Direction]) -> Vec<Vec<Direction>> {
        let last = order.last().copied();
        self.settings
            .dimensions
            .directions()
            .iter()
            .filter(|&&d| Some(d.reverse()) != last)
            .map(|&d| {
                let mut next = order.to_vec();
                next.push(d);
                next
            })
            .filter(|next| fast_validate_order(next))
            .collect()
    }
}

impl FoldingAlgorithm for BeamSearch {
    fn name(&self) -> &'static str {
        "beam-search"
    }

    #[instrument(skip_all, name = "beam_search")]
    fn run(
        &mut self,
        chain: &mut Chain,
        reporter: &ProgressReporter,
    ) -> Result<BondScore, EngineError> {
        if let Some(score) = trivial_score(chain) {
            return Ok(score);
        }

        let labels = chain.labels().to_vec();
        let target = labels.len() - 1;
        info!(
            residues = labels.len(),
            max_iterations = self.config.max_iterations,
            scoring_param = self.config.scoring_param,
            beam_width = ?self.config.beam_width,
            "Starting beam search."
        );

        let mut best: Option<Solution> = None;
        let mut keep_if_best = |order: Vec<Direction>| {
            let score = fast_compute_bond_score(&labels, &order);
            if best.as_ref().is_none_or(|b| score < b.score) {
                debug!(score = score.value(), "New best fold.");
                best = Some(Solution::new(score, order));
            }
        };

        let mut queue = StateQueue::default();
        let root = vec![Direction::Right];
        if root.len() == target {
            keep_if_best(root);
        } else {
            queue.push(root, 0);
        }

        let mut budget = SearchBudget::new(Some(self.config.max_iterations), self.settings.time_limit);
        let mut progress = TaskProgress::start(reporter, self.config.max_iterations);
        while !budget.is_exhausted() {
            let Some(order) = queue.pop() else {
                break;
            };
            budget.tick();
            progress.tick();

            for next in self.expand(&order) {
                if next.len() == target {
                    keep_if_best(next);
                } else {
                    let priority = self.priority(&labels[..=next.len()], &next);
                    queue.push(next, priority);
                }
            }
            if let Some(width) = self.config.beam_width {
                queue.truncate(width);
            }
        }
        progress.finish();

        info!(
            iterations = budget.iterations(),
            queued = queue.len(),
            best = ?best.as_ref().map(|b| b.score.value()),
            "Beam search finished."
        );
        finish(chain, best.as_ref(), self.name())
    }
}
