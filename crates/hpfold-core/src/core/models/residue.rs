use super::direction::Direction;
use super::sequence::Label;
use super::vector::Vec3;

/// Whether a residue's position is tracked by its chain's occupancy map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResidueState {
    /// Position is final and present in the occupancy map.
    #[default]
    Committed,
    /// Position is being recomputed and is excluded from occupancy checks.
    InTransit,
}

/// One monomer of a chain, placed on the lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub(crate) label: Label,
    pub(crate) position: Vec3,
    /// The step from the predecessor; `None` only for the first residue.
    pub(crate) direction: Option<Direction>,
    pub(crate) state: ResidueState,
}

impl Residue {
    pub(crate) fn new(label: Label, position: Vec3, direction: Option<Direction>) -> Self {
        Self {
            label,
            position,
            direction,
            state: ResidueState::Committed,
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn state(&self) -> ResidueState {
        self.state
    }

    pub fn is_committed(&self) -> bool {
        self.state == ResidueState::Committed
    }
}
