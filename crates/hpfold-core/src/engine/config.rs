use crate::core::models::direction::Dimensionality;
use crate::core::scoring::BondScore;
use crate::engine::heuristics::HeuristicKind;
use crate::engine::utils::acceptance::CoolingSchedule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Unknown algorithm '{0}'")]
    UnknownAlgorithm(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
    BruteForce,
    DepthFirst,
    Greedy,
    SimulatedAnnealing,
    BeamSearch,
    PureRandom,
    IterativeRandom,
    Spiral,
    HillClimb,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 9] = [
        AlgorithmKind::BruteForce,
        AlgorithmKind::DepthFirst,
        AlgorithmKind::Greedy,
        AlgorithmKind::SimulatedAnnealing,
        AlgorithmKind::BeamSearch,
        AlgorithmKind::PureRandom,
        AlgorithmKind::IterativeRandom,
        AlgorithmKind::Spiral,
        AlgorithmKind::HillClimb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::BruteForce => "brute-force",
            AlgorithmKind::DepthFirst => "depth-first",
            AlgorithmKind::Greedy => "greedy",
            AlgorithmKind::SimulatedAnnealing => "simulated-annealing",
            AlgorithmKind::BeamSearch => "beam-search",
            AlgorithmKind::PureRandom => "pure-random",
            AlgorithmKind::IterativeRandom => "iterative-random",
            AlgorithmKind::Spiral => "spiral",
            AlgorithmKind::HillClimb => "hill-climb",
        }
    }
}

impl FromStr for AlgorithmKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings every search shares.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchSettings {
    pub dimensions: Dimensionality,
    pub time_limit: Option<Duration>,
    pub seed: Option<u64>,
}

impl SearchSettings {
    pub fn with_seed(self, seed: Option<u64>) -> Self {
        Self { seed, ..self }
    }
}

/// Parameters of the score-progress pruner used by depth-first search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePruningConfig {
    pub alpha: f64,
    pub beta: f64,
    pub min_depth: usize,
    pub min_best_score: BondScore,
}

impl Default for ScorePruningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 1.0,
            min_depth: 8,
            min_best_score: BondScore(-2),
        }
    }
}

impl ScorePruningConfig {
    /// A configuration whose threshold can never be undercut.
    pub fn never() -> Self {
        Self {
            beta: f64::INFINITY,
            ..Self::default()
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.beta == f64::INFINITY
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicConfig {
    pub kinds: Vec<HeuristicKind>,
    pub potential_mult_factor: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            kinds: Vec::new(),
            potential_mult_factor: 7.0,
        }
    }
}

impl HeuristicConfig {
    pub fn with_kinds(kinds: Vec<HeuristicKind>) -> Self {
        Self {
            kinds,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BruteForceConfig {
    pub max_iterations: Option<u64>,
    pub top_k: usize,
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        Self {
            max_iterations: None,
            top_k: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepthFirstConfig {
    pub max_iterations: u64,
    pub heuristics: HeuristicConfig,
    pub score_pruning: ScorePruningConfig,
    pub neighbour_pruning: bool,
    pub budget_pruning: bool,
    pub initial_budget: i64,
    pub fix_first_direction: bool,
}

impl Default for DepthFirstConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            heuristics: HeuristicConfig::default(),
            score_pruning: ScorePruningConfig::default(),
            neighbour_pruning: false,
            budget_pruning: true,
            initial_budget: 100,
            fix_first_direction: false,
        }
    }
}

impl DepthFirstConfig {
    /// Exhaustive search: no pruning of any kind and no iteration cap.
    pub fn exhaustive() -> Self {
        Self {
            max_iterations: u64::MAX,
            score_pruning: ScorePruningConfig::never(),
            neighbour_pruning: false,
            budget_pruning: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GreedyConfig {
    pub max_attempts: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RandomConfig {
    pub max_attempts: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HillClimbConfig {
    pub iterations: u64,
}

impl Default for HillClimbConfig {
    fn default() -> Self {
        Self { iterations: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingConfig {
    pub n_permutations: u64,
    pub reset_threshold: u64,
    pub schedule: CoolingSchedule,
    pub heuristics: HeuristicConfig,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            n_permutations: 5000,
            reset_threshold: 1000,
            schedule: CoolingSchedule::default(),
            heuristics: HeuristicConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeamSearchConfig {
    pub max_iterations: u64,
    pub scoring_param: f64,
    pub beam_width: Option<usize>,
}

impl Default for BeamSearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            scoring_param: 0.0,
            beam_width: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoldConfig {
    pub algorithm: AlgorithmKind,
    pub search: SearchSettings,
    pub restarts: usize,
    pub num_solutions: usize,
    pub brute_force: BruteForceConfig,
    pub depth_first: DepthFirstConfig,
    pub greedy: GreedyConfig,
    pub random: RandomConfig,
    pub hill_climb: HillClimbConfig,
    pub annealing: AnnealingConfig,
    pub beam_search: BeamSearchConfig,
}

#[derive(Default)]
pub struct FoldConfigBuilder {
    algorithm: Option<AlgorithmKind>,
    dimensions: Option<Dimensionality>,
    time_limit: Option<Duration>,
    seed: Option<u64>,
    restarts: Option<usize>,
    num_solutions: Option<usize>,
    brute_force: Option<BruteForceConfig>,
    depth_first: Option<DepthFirstConfig>,
    greedy: Option<GreedyConfig>,
    random: Option<RandomConfig>,
    hill_climb: Option<HillClimbConfig>,
    annealing: Option<AnnealingConfig>,
    beam_search: Option<BeamSearchConfig>,
}

impl FoldConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithm(mut self, algorithm: AlgorithmKind) -> Self {
        self.algorithm = Some(algorithm);
        self
    }
    pub fn dimensions(mut self, dimensions: Dimensionality) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
    pub fn time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn restarts(mut self, n: usize) -> Self {
        self.restarts = Some(n);
        self
    }
    pub fn num_solutions(mut self, n: usize) -> Self {
        self.num_solutions = Some(n);
        self
    }
    pub fn brute_force(mut self, config: BruteForceConfig) -> Self {
        self.brute_force = Some(config);
        self
    }
    pub fn depth_first(mut self, config: DepthFirstConfig) -> Self {
        self.depth_first = Some(config);
        self
    }
    pub fn greedy(mut self, config: GreedyConfig) -> Self {
        self.greedy = Some(config);
        self
    }
    pub fn random(mut self, config: RandomConfig) -> Self {
        self.random = Some(config);
        self
    }
    pub fn hill_climb(mut self, config: HillClimbConfig) -> Self {
        self.hill_climb = Some(config);
        self
    }
    pub fn annealing(mut self, config: AnnealingConfig) -> Self {
        self.annealing = Some(config);
        self
    }
    pub fn beam_search(mut self, config: BeamSearchConfig) -> Self {
        self.beam_search = Some(config);
        self
    }

    pub fn build(self) -> Result<FoldConfig, ConfigError> {
        let config = FoldConfig {
            algorithm: self
                .algorithm
                .ok_or(ConfigError::MissingParameter("algorithm"))?,
            search: SearchSettings {
                dimensions: self
                    .dimensions
                    .ok_or(ConfigError::MissingParameter("dimensions"))?,
                time_limit: self.time_limit,
                seed: self.seed,
            },
            restarts: self.restarts.unwrap_or(1),
            num_solutions: self.num_solutions.unwrap_or(1),
            brute_force: self.brute_force.unwrap_or_default(),
            depth_first: self.depth_first.unwrap_or_default(),
            greedy: self.greedy.unwrap_or_default(),
            random: self.random.unwrap_or_default(),
            hill_climb: self.hill_climb.unwrap_or_default(),
            annealing: self.annealing.unwrap_or_default(),
            beam_search: self.beam_search.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

impl FoldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.restarts == 0 {
            return Err(invalid("restarts", "must be at least 1"));
        }
        if self.num_solutions == 0 {
            return Err(invalid("num_solutions", "must be at least 1"));
        }
        if self.brute_force.top_k == 0 {
            return Err(invalid("top_k", "must be at least 1"));
        }

        let pruning = &self.depth_first.score_pruning;
        if !(pruning.alpha > 0.0) {
            return Err(invalid(
                "alpha",
                format!("must be positive, got {}", pruning.alpha),
            ));
        }
        if pruning.beta.is_nan() {
            return Err(invalid("beta", "must be a number"));
        }

        for heuristics in [&self.depth_first.heuristics, &self.annealing.heuristics] {
            if !(heuristics.potential_mult_factor > 0.0) {
                return Err(invalid(
                    "potential_mult_factor",
                    format!("must be positive, got {}", heuristics.potential_mult_factor),
                ));
            }
        }

        self.annealing.schedule.validate()?;

        let beam = &self.beam_search;
        if !beam.scoring_param.is_finite() || beam.scoring_param < 0.0 {
            return Err(invalid(
                "scoring_param",
                format!("must be a non-negative number, got {}", beam.scoring_param),
            ));
        }
        if beam.beam_width == Some(0) {
            return Err(invalid("beam_width", "must be at least 1 when set"));
        }
        Ok(())
    }
}
