//! # Engine Module
//!
//! The search layer of hpfold: everything that decides *which* folds to look
//! at, as opposed to the stateless chain model and scoring in [`crate::core`].
//!
//! ## Overview
//!
//! A search takes a mutable [`Chain`](crate::core::models::chain::Chain),
//! explores orders under a [`budget::SearchBudget`], and leaves the chain laid
//! out in the best fold it found. Constructive searches consult heuristics to
//! rank the directions they try and pruners to cut hopeless partial folds;
//! stochastic searches draw on the acceptance criteria in `utils`.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Algorithm registry, per-algorithm parameters and the [`config::FoldConfigBuilder`]
//! - **Search Strategies** ([`algorithms`]) - The [`algorithms::FoldingAlgorithm`] trait and its implementations
//! - **Direction Ranking** ([`heuristics`]) - The [`heuristics::Heuristic`] trait, built-in heuristics and [`heuristics::HeuristicSet`]
//! - **Branch Cutting** ([`pruning`]) - The [`pruning::Pruner`] trait and the score and neighbour pruners
//! - **Budgets** ([`budget`]) - Iteration and wall-clock limits shared by every search
//! - **State Tracking** ([`state`]) - Solutions and the top-K [`state::ScoreTracker`]
//! - **Progress Monitoring** ([`progress`]) - Progress events and the callback-based reporter
//! - **Error Handling** ([`error`]) - Engine-level error type

pub mod algorithms;
pub mod budget;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod progress;
pub mod pruning;
pub mod state;
pub mod utils;
