use super::Pruner;
use crate::core::models::chain::Chain;
use crate::core::scoring::BondScore;

const MIN_COMMITTED: usize = 6;
const MAX_ISOLATED_FRACTION: f64 = 0.75;

/// Prunes sprawling partial folds in which most placed residues have no
/// lattice neighbour besides their chain neighbours.
#[derive(Debug, Clone, Default)]
pub struct NeighbourPruner;

impl NeighbourPruner {
    pub fn new() -> Self {
        Self
    }

    fn isolated_count(chain: &Chain) -> usize {
        chain
            .residues()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_committed())
            .filter(|&(i, _)| {
                chain.neighbour_positions(i).is_some_and(|mut sites| {
                    !sites.any(|site| chain.occupant(site).is_some_and(|j| i.abs_diff(j) > 1))
                })
            })
            .count()
    }
}

impl Pruner for NeighbourPruner {
    fn name(&self) -> &'static str {
        "neighbours"
    }

    fn should_prune(&self, chain: &Chain, _best: Option<BondScore>, _depth: usize) -> bool {
        let committed = chain.committed_count();
        if committed < MIN_COMMITTED {
            return false;
        }
        Self::isolated_count(chain) as f64 / committed as f64 > MAX_ISOLATED_FRACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Direction::*;

    #[test]
    fn short_chains_are_never_pruned() {
        let chain: Chain = "HHHHH".parse().unwrap();
        assert!(!NeighbourPruner::new().should_prune(&chain, None, 4));
    }

    #[test]
    fn straight_line_is_pruned() {
        let chain: Chain = "HPHPHPHP".parse().unwrap();
        assert_eq!(NeighbourPruner::isolated_count(&chain), 8);
        assert!(NeighbourPruner::new().should_prune(&chain, None, 7));
    }

    #[test]
    fn compact_fold_is_kept() {
        let mut chain: Chain = "HHHHHH".parse().unwrap();
        chain.set_order(&[Up, Right, Down, Right, Up]).unwrap();
        // (0,3) and (2,5) touch, so four of six residues have a contact.
        assert_eq!(NeighbourPruner::isolated_count(&chain), 2);
        assert!(!NeighbourPruner::new().should_prune(&chain, None, 5));
    }
}
