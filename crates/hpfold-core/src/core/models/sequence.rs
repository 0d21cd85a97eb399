use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Invalid residue label '{label}' at position {position} (allowed: H, P, C)")]
    InvalidLabel { label: char, position: usize },
    #[error("Sequence must contain at least one residue")]
    Empty,
}

/// Residue class in the HP(C) lattice model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    /// Hydrophobic.
    H,
    /// Polar.
    P,
    /// Cysteine-like; forms the strongest contacts.
    C,
}

#[rustfmt::skip]
static LABEL_CODES: Map<char, Label> = phf_map! {
    'H' => Label::H,
    'P' => Label::P,
    'C' => Label::C,
};

impl Label {
    pub fn from_char(c: char) -> Option<Self> {
        LABEL_CODES.get(&c).copied()
    }

    pub fn to_char(self) -> char {
        match self {
            Label::H => 'H',
            Label::P => 'P',
            Label::C => 'C',
        }
    }

    /// Polar residues never contribute to the bond score.
    pub fn is_polar(self) -> bool {
        self == Label::P
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// An immutable, non-empty chain of residue labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    labels: Vec<Label>,
}

impl Sequence {
    pub fn new(labels: Vec<Label>) -> Result<Self, SequenceError> {
        if labels.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Label> + '_ {
        self.labels.iter().copied()
    }

    /// Number of residues that can participate in a bond.
    pub fn count_non_polar(&self) -> usize {
        self.labels.iter().filter(|l| !l.is_polar()).count()
    }
}

impl FromStr for Sequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let labels = s
            .trim()
            .chars()
            .enumerate()
            .map(|(position, label)| {
                Label::from_char(label).ok_or(SequenceError::InvalidLabel { label, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(labels)
    }
}

impl Index<usize> for Sequence {
    type Output = Label;

    fn index(&self, index: usize) -> &Label {
        &self.labels[index]
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.labels {
            write!(f, "{}", label)?;
        }
        Ok(())
    }
}
