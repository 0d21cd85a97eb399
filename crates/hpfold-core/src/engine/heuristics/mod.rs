//! Heuristics that rank the candidate directions of a residue during search.
//!
//! A heuristic follows a fixed protocol: it is [`reset`](Heuristic::reset),
//! then [`run`](Heuristic::run) once per candidate on the chain as it would look
//! after taking that candidate, and finally [`interpret`](Heuristic::interpret)ed
//! into one normalized score per candidate, in run order. Higher is better.
//! [`HeuristicSet::rank`] drives this protocol for every registered heuristic
//! so callers cannot get the order wrong.

pub mod fold_amount;
pub mod hydrophobic_interaction;
pub mod minimise_dimensions;
pub mod potential;
pub mod potential_plus;

use crate::core::models::chain::{Chain, ChainError};
use crate::core::models::direction::Direction;
use crate::engine::config::{ConfigError, HeuristicConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

pub use fold_amount::FoldAmount;
pub use hydrophobic_interaction::HydrophobicInteraction;
pub use minimise_dimensions::MinimiseDimensions;
pub use potential::Potential;
pub use potential_plus::PotentialPlus;

/// Normalized desirability of a candidate. Higher is better; unrelated to [`BondScore`](crate::core::scoring::BondScore).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeuristicScore(pub f64);

impl HeuristicScore {
    pub const ZERO: HeuristicScore = HeuristicScore(0.0);

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Add for HeuristicScore {
    type Output = HeuristicScore;

    fn add(self, rhs: HeuristicScore) -> HeuristicScore {
        HeuristicScore(self.0 + rhs.0)
    }
}

impl AddAssign for HeuristicScore {
    fn add_assign(&mut self, rhs: HeuristicScore) {
        self.0 += rhs.0;
    }
}

impl Sum for HeuristicScore {
    fn sum<I: Iterator<Item = HeuristicScore>>(iter: I) -> Self {
        iter.fold(HeuristicScore::ZERO, Add::add)
    }
}

pub trait Heuristic: Send {
    fn name(&self) -> &'static str;

    /// Forgets every value recorded since the last reset.
    fn reset(&mut self);

    /// Records a raw value for the chain in its current state.
    fn run(&mut self, chain: &Chain);

    /// Normalizes the recorded values, one score per `run` call.
    fn interpret(&self) -> Vec<HeuristicScore>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    FoldAmount,
    MinimiseDimensions,
    Potential,
    PotentialPlus,
    HydrophobicInteraction,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 5] = [
        HeuristicKind::FoldAmount,
        HeuristicKind::MinimiseDimensions,
        HeuristicKind::Potential,
        HeuristicKind::PotentialPlus,
        HeuristicKind::HydrophobicInteraction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HeuristicKind::FoldAmount => "fold-amount",
            HeuristicKind::MinimiseDimensions => "minimise-dimensions",
            HeuristicKind::Potential => "potential",
            HeuristicKind::PotentialPlus => "potential-plus",
            HeuristicKind::HydrophobicInteraction => "hydrophobic-interaction",
        }
    }

    pub fn build(self, config: &HeuristicConfig) -> Box<dyn Heuristic> {
        match self {
            HeuristicKind::FoldAmount => Box::new(FoldAmount::new()),
            HeuristicKind::MinimiseDimensions => Box::new(MinimiseDimensions::new()),
            HeuristicKind::Potential => Box::new(Potential::new(config.potential_mult_factor)),
            HeuristicKind::PotentialPlus => Box::new(PotentialPlus::new()),
            HeuristicKind::HydrophobicInteraction => Box::new(HydrophobicInteraction::new()),
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ConfigError::InvalidParameter {
                name: "heuristic",
                reason: format!("unknown heuristic '{}'", s),
            })
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedDirection {
    pub direction: Direction,
    pub score: HeuristicScore,
}

#[derive(Default)]
pub struct HeuristicSet {
    heuristics: Vec<Box<dyn Heuristic>>,
}

impl HeuristicSet {
    pub fn new(heuristics: Vec<Box<dyn Heuristic>>) -> Self {
        Self { heuristics }
    }

    pub fn from_config(config: &HeuristicConfig) -> Self {
        Self::new(config.kinds.iter().map(|kind| kind.build(config)).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.heuristics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heuristics.len()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.heuristics.iter().map(|h| h.name()).collect()
    }

    /// Orders `candidates` for residue `index`, best first.
    ///
    /// Each candidate is applied to the chain inside a transaction and every
    /// heuristic is run on the result. With `unghost` the whole chain is
    /// committed before the heuristics run, which is what a search over complete
    /// folds wants. The chain is left exactly as it was found. Candidates with
    /// equal combined scores keep their input order.
    pub fn rank(
        &mut self,
        chain: &mut Chain,
        index: usize,
        candidates: &[Direction],
        unghost: bool,
    ) -> Result<Vec<RankedDirection>, ChainError> {
        if self.heuristics.is_empty() {
            return Ok(candidates
                .iter()
                .map(|&direction| RankedDirection {
                    direction,
                    score: HeuristicScore::ZERO,
                })
                .collect());
        }

        for heuristic in &mut self.heuristics {
            heuristic.reset();
        }

        for &direction in candidates {
            let heuristics = &mut self.heuristics;
            chain.transaction(|chain| -> Result<(), ChainError> {
                chain.change_direction(index, direction, false)?;
                if unghost {
                    chain.collect_positions();
                }
                for heuristic in heuristics.iter_mut() {
                    heuristic.run(chain);
                }
                Ok(())
            })?;
        }

        let mut combined = vec![HeuristicScore::ZERO; candidates.len()];
        for heuristic in &self.heuristics {
            for (total, score) in combined.iter_mut().zip(heuristic.interpret()) {
                *total += score;
            }
        }

        let mut ranked: Vec<RankedDirection> = candidates
            .iter()
            .zip(combined)
            .map(|(&direction, score)| RankedDirection { direction, score })
            .collect();
        ranked.sort_by(|a, b| b.score.0.total_cmp(&a.score.0));
        Ok(ranked)
    }
}

/// Largest value, or `None` for an empty slice.
pub(crate) fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub(crate) fn min_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}
