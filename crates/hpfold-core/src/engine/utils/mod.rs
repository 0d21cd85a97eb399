//! Helpers shared by the search algorithms.
//!
//! Currently this holds the acceptance rules used by the stochastic searches
//! to decide whether a move that worsens the fold is taken.

pub mod acceptance;
