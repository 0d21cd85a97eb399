use super::Pruner;
use crate::core::models::chain::Chain;
use crate::core::scoring::BondScore;
use crate::core::scoring::fast::fast_compute_bond_score;
use crate::engine::config::ScorePruningConfig;
use tracing::trace;

/// Prunes a branch whose partial score lags too far behind the best complete
/// score for how far into the chain it is.
///
/// With `progress = depth / (len - 1)` and both scores taken as strengths
/// (larger is better), the branch is cut when
/// `partial < best * progress^(1 / alpha) - beta`. A small `alpha` keeps the
/// threshold low until late in the chain; `beta` is a flat tolerance.
#[derive(Debug, Clone)]
pub struct ScorePruner {
    config: ScorePruningConfig,
}

impl ScorePruner {
    pub fn new(config: ScorePruningConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self, best: BondScore, depth: usize, order_len: usize) -> f64 {
        if order_len == 0 {
            return f64::NEG_INFINITY;
        }
        let progress = depth as f64 / order_len as f64;
        best.strength() as f64 * progress.powf(1.0 / self.config.alpha) - self.config.beta
    }
}

impl Pruner for ScorePruner {
    fn name(&self) -> &'static str {
        "score"
    }

    fn should_prune(&self, chain: &Chain, best: Option<BondScore>, depth: usize) -> bool {
        if self.config.is_disabled() || depth < self.config.min_depth {
            return false;
        }
        let Some(best) = best else {
            return false;
        };
        if best > self.config.min_best_score {
            return false;
        }

        let order = chain.order();
        let depth = depth.min(order.len());
        let partial = fast_compute_bond_score(&chain.labels()[..=depth], &order[..depth]);
        let threshold = self.threshold(best, depth, order.len());

        let prune = (partial.strength() as f64) < threshold;
        if prune {
            trace!(depth, partial = partial.value(), threshold, "Pruning branch on score.");
        }
        prune
    }
}
