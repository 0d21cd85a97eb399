use crate::engine::config::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DECREASE: f64 = 0.9997;

/// How the willingness to accept a worse fold decays over an annealing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum CoolingSchedule {
    /// Accept a worse move when a uniform draw falls below `decrease^step`,
    /// regardless of how much worse it is.
    Exponential { decrease: f64 },
    /// Metropolis criterion `min(1, exp(-delta / T))` with
    /// `T = initial_temperature * cooling_rate^step`.
    Metropolis {
        initial_temperature: f64,
        cooling_rate: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Exponential {
            decrease: DEFAULT_DECREASE,
        }
    }
}

impl CoolingSchedule {
    pub fn temperature(&self, step: u64) -> f64 {
        match *self {
            CoolingSchedule::Exponential { decrease } => decrease.powf(step as f64),
            CoolingSchedule::Metropolis {
                initial_temperature,
                cooling_rate,
            } => initial_temperature * cooling_rate.powf(step as f64),
        }
    }

    /// Share of the initial temperature left at `step`, in `[0, 1]`.
    pub fn exploration(&self, step: u64) -> f64 {
        match *self {
            CoolingSchedule::Exponential { decrease } => decrease.powf(step as f64),
            CoolingSchedule::Metropolis { cooling_rate, .. } => cooling_rate.powf(step as f64),
        }
    }

    /// Decides whether a move changing the score by `delta` is taken.
    /// Moves that do not make the score worse are always accepted.
    pub fn accepts(&self, delta: i32, step: u64, rng: &mut impl Rng) -> bool {
        if delta <= 0 {
            return true;
        }
        match *self {
            CoolingSchedule::Exponential { .. } => rng.r#gen::<f64>() < self.temperature(step),
            CoolingSchedule::Metropolis { .. } => {
                let temperature = self.temperature(step);
                temperature > 0.0 && rng.r#gen::<f64>() < (-(delta as f64) / temperature).exp()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            CoolingSchedule::Exponential { decrease } => {
                if !(decrease > 0.0 && decrease <= 1.0) {
                    return Err(ConfigError::InvalidParameter {
                        name: "decrease",
                        reason: format!("must lie in (0, 1], got {}", decrease),
                    });
                }
            }
            CoolingSchedule::Metropolis {
                initial_temperature,
                cooling_rate,
            } => {
                if !(initial_temperature > 0.0) {
                    return Err(ConfigError::InvalidParameter {
                        name: "initial-temperature",
                        reason: format!("must be positive, got {}", initial_temperature),
                    });
                }
                if !(cooling_rate > 0.0 && cooling_rate <= 1.0) {
                    return Err(ConfigError::InvalidParameter {
                        name: "cooling-rate",
                        reason: format!("must lie in (0, 1], got {}", cooling_rate),
                    });
                }
            }
        }
        Ok(())
    }
}
