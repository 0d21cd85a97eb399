use super::BondScore;
use super::bond::bond_value;
use crate::core::models::direction::Dimensionality;
use crate::core::models::sequence::Sequence;

/// A lower bound on the bond score any fold of `sequence` can reach on the
/// given lattice.
///
/// A lattice site has `2 * rank` neighbours. Inner residues lose two of them to
/// their chain neighbours and the chain ends lose one. Every residue is
/// credited with that many of its strongest possible contacts among the
/// residues an odd index distance of at least three away, the only ones it can
/// touch. Each contact is then counted from both of its residues, so the total
/// is halved, rounding towards zero since real scores are integers.
pub fn theoretic_optimum(sequence: &Sequence, dimensions: Dimensionality) -> BondScore {
    let labels = sequence.labels();
    let last = labels.len().saturating_sub(1);
    let sites = 2 * dimensions.rank() as usize;
    let mut total = 0;

    for (index, &label) in labels.iter().enumerate() {
        if label.is_polar() {
            continue;
        }
        let contacts = if index == 0 || index == last {
            sites - 1
        } else {
            sites - 2
        };

        let mut partners: Vec<i32> = labels
            .iter()
            .enumerate()
            .filter(|&(other, _)| {
                let distance = index.abs_diff(other);
                distance >= 3 && distance % 2 == 1
            })
            .map(|(_, &partner)| bond_value(label, partner).value())
            .filter(|&value| value < 0)
            .collect();
        partners.sort_unstable();
        total += partners.iter().take(contacts).sum::<i32>();
    }

    BondScore(total / 2)
}
