//! # hpfold
//!
//! A search engine for folding HP(C) lattice proteins on square and cubic
//! lattices.
//!
//! A protein is reduced to a sequence of hydrophobic (`H`), polar (`P`) and
//! cysteine-like (`C`) residues laid out as a self-avoiding walk. A fold's
//! energy is the sum of the bonds between residues that touch on the lattice
//! without being chain neighbours, and the engine searches for the fold of
//! lowest energy.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Sequence`, `Chain`),
//!   the bond table and scoring functions, and text rendering.
//!
//! - **[`engine`]: The Logic Core.** Search strategies, heuristics, pruning,
//!   budgets, configuration and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Complete folding runs with restarts,
//!   solution ranking and summary statistics.

pub mod core;
pub mod engine;
pub mod workflows;
