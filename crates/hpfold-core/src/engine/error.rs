use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::chain::ChainError;
use crate::core::models::direction::Dimensionality;
use crate::core::models::sequence::SequenceError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Chain operation failed: {source}")]
    Chain {
        #[from]
        source: ChainError,
    },

    #[error("Invalid sequence: {source}")]
    Sequence {
        #[from]
        source: SequenceError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Algorithm '{algorithm}' does not support {dimensions} lattices")]
    UnsupportedDimensions {
        algorithm: &'static str,
        dimensions: Dimensionality,
    },

    #[error("Algorithm failed to converge after {iterations} iterations")]
    Convergence { iterations: u64 },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
