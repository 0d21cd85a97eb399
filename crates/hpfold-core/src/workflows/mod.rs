//! # Workflows Module
//!
//! High-level entry points that tie [`crate::core`] and [`crate::engine`]
//! together into complete runs.
//!
//! - **Folding Workflow** ([`fold`]) - Runs the configured search over one or
//!   more restarts and ranks the folds it found.

pub mod fold;
