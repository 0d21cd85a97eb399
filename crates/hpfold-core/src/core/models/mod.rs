//! # Core Models Module
//!
//! Data structures describing a lattice protein.
//!
//! ## Key Components
//!
//! - [`vector`] - Integer lattice points and bounding boxes
//! - [`direction`] - Unit lattice steps and the 2D/3D direction sets
//! - [`sequence`] - HP(C) residue labels and validated sequences
//! - [`residue`] - One residue: label, position, incoming direction and occupancy state
//! - [`chain`] - The chain arena with its occupancy map and undo stack
//!
//! ## Usage
//!
//! ```
//! use hpfold::core::models::chain::Chain;
//! use hpfold::core::models::direction::Direction::{Left, Right, Up};
//!
//! let mut chain: Chain = "CHHC".parse().unwrap();
//! chain.set_order(&[Left, Up, Right]).unwrap();
//! assert_eq!(chain.bond_score().value(), -5);
//! ```

pub mod chain;
pub mod direction;
pub mod residue;
pub mod sequence;
pub mod vector;
