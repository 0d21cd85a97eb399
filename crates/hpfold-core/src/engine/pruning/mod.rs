//! Branch pruning for tree searches.
//!
//! A [`Pruner`] looks at a partially built chain and decides whether the
//! subtree below it is worth exploring. Pruners never mutate the chain.

pub mod neighbours;
pub mod score;

use crate::core::models::chain::Chain;
use crate::core::scoring::BondScore;

pub use neighbours::NeighbourPruner;
pub use score::ScorePruner;

pub trait Pruner: Send {
    fn name(&self) -> &'static str;

    /// `depth` is the number of directions placed so far, so residues
    /// `0..=depth` are in their final positions. `best` is the best complete
    /// score found so far, if any.
    fn should_prune(&self, chain: &Chain, best: Option<BondScore>, depth: usize) -> bool;
}
