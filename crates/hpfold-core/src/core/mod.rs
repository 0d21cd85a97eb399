//! # Core Module
//!
//! The stateless foundation of hpfold: the lattice chain model, the bond energy
//! table and its scoring functions, and text output for folds.
//!
//! ## Architecture
//!
//! - **Chain Representation** ([`models`]) - Lattice vectors, directions, sequences, residues and the [`models::chain::Chain`] arena
//! - **Energy Evaluation** ([`scoring`]) - Bond table, chain-free fast scoring and validation, theoretic bounds
//! - **Output** ([`io`]) - Plain-text rendering of folds
//!
//! Everything here is deterministic and free of search policy. Search strategies,
//! heuristics and pruning live in [`crate::engine`].

pub mod io;
pub mod models;
pub mod scoring;
