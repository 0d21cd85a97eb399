use super::BondScore;
use crate::core::models::sequence::Label;

/// Energy of a single non-chain contact between two residues.
///
/// The table is symmetric: H-H is -1, C-C is -5, H-C is -1, and any contact
/// involving a polar residue is 0.
#[inline]
pub fn bond_value(a: Label, b: Label) -> BondScore {
    match (a, b) {
        (Label::H, Label::H) => BondScore(-1),
        (Label::C, Label::C) => BondScore(-5),
        (Label::H, Label::C) | (Label::C, Label::H) => BondScore(-1),
        _ => BondScore::ZERO,
    }
}
