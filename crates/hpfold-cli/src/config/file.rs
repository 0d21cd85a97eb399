use crate::error::{CliError, Result};
use hpfold::core::scoring::BondScore;
use hpfold::engine::config as core_config;
use hpfold::engine::config::AlgorithmKind;
use hpfold::engine::heuristics::HeuristicKind;
use hpfold::engine::utils::acceptance::{CoolingSchedule, DEFAULT_DECREASE};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSearchConfig {
    pub algorithm: Option<AlgorithmKind>,
    pub dimensions: Option<u8>,
    pub seed: Option<u64>,
    pub restarts: Option<usize>,
    pub num_solutions: Option<usize>,
    pub time_limit_secs: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBruteForceConfig {
    pub max_iterations: Option<u64>,
    pub top_k: Option<usize>,
}

impl FileBruteForceConfig {
    pub fn apply(self, config: &mut core_config::BruteForceConfig) {
        if self.max_iterations.is_some() {
            config.max_iterations = self.max_iterations;
        }
        config.top_k = self.top_k.unwrap_or(config.top_k);
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileScorePruningConfig {
    pub enabled: Option<bool>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub min_depth: Option<usize>,
    pub min_best_score: Option<i32>,
}

impl FileScorePruningConfig {
    pub fn apply(self, config: &mut core_config::ScorePruningConfig) {
        if self.enabled == Some(false) {
            *config = core_config::ScorePruningConfig::never();
            return;
        }
        config.alpha = self.alpha.unwrap_or(config.alpha);
        config.beta = self.beta.unwrap_or(config.beta);
        config.min_depth = self.min_depth.unwrap_or(config.min_depth);
        if let Some(score) = self.min_best_score {
            config.min_best_score = BondScore(score);
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDepthFirstConfig {
    pub max_iterations: Option<u64>,
    pub heuristics: Option<Vec<HeuristicKind>>,
    pub potential_mult_factor: Option<f64>,
    pub neighbour_pruning: Option<bool>,
    pub budget_pruning: Option<bool>,
    pub initial_budget: Option<i64>,
    pub fix_first_direction: Option<bool>,
    pub pruning: Option<FileScorePruningConfig>,
}

impl FileDepthFirstConfig {
    pub fn apply(self, config: &mut core_config::DepthFirstConfig) {
        config.max_iterations = self.max_iterations.unwrap_or(config.max_iterations);
        apply_heuristics(
            self.heuristics,
            self.potential_mult_factor,
            &mut config.heuristics,
        );
        config.neighbour_pruning = self.neighbour_pruning.unwrap_or(config.neighbour_pruning);
        config.budget_pruning = self.budget_pruning.unwrap_or(config.budget_pruning);
        config.initial_budget = self.initial_budget.unwrap_or(config.initial_budget);
        config.fix_first_direction = self
            .fix_first_direction
            .unwrap_or(config.fix_first_direction);
        if let Some(pruning) = self.pruning {
            pruning.apply(&mut config.score_pruning);
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileAttemptsConfig {
    pub max_attempts: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileHillClimbConfig {
    pub iterations: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", rename_all_fields = "kebab-case", tag = "kind")]
pub enum FileScheduleConfig {
    Exponential {
        decrease: Option<f64>,
    },
    Metropolis {
        initial_temperature: f64,
        cooling_rate: f64,
    },
}

impl From<FileScheduleConfig> for CoolingSchedule {
    fn from(p: FileScheduleConfig) -> Self {
        match p {
            FileScheduleConfig::Exponential { decrease } => CoolingSchedule::Exponential {
                decrease: decrease.unwrap_or(DEFAULT_DECREASE),
            },
            FileScheduleConfig::Metropolis {
                initial_temperature,
                cooling_rate,
            } => CoolingSchedule::Metropolis {
                initial_temperature,
                cooling_rate,
            },
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileAnnealingConfig {
    pub n_permutations: Option<u64>,
    pub reset_threshold: Option<u64>,
    pub heuristics: Option<Vec<HeuristicKind>>,
    pub potential_mult_factor: Option<f64>,
    pub schedule: Option<FileScheduleConfig>,
}

impl FileAnnealingConfig {
    pub fn apply(self, config: &mut core_config::AnnealingConfig) {
        config.n_permutations = self.n_permutations.unwrap_or(config.n_permutations);
        config.reset_threshold = self.reset_threshold.unwrap_or(config.reset_threshold);
        apply_heuristics(
            self.heuristics,
            self.potential_mult_factor,
            &mut config.heuristics,
        );
        if let Some(schedule) = self.schedule {
            config.schedule = schedule.into();
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBeamSearchConfig {
    pub max_iterations: Option<u64>,
    pub scoring_param: Option<f64>,
    pub beam_width: Option<usize>,
}

impl FileBeamSearchConfig {
    pub fn apply(self, config: &mut core_config::BeamSearchConfig) {
        config.max_iterations = self.max_iterations.unwrap_or(config.max_iterations);
        config.scoring_param = self.scoring_param.unwrap_or(config.scoring_param);
        if self.beam_width.is_some() {
            config.beam_width = self.beam_width;
        }
    }
}

fn apply_heuristics(
    kinds: Option<Vec<HeuristicKind>>,
    mult_factor: Option<f64>,
    config: &mut core_config::HeuristicConfig,
) {
    if let Some(kinds) = kinds {
        config.kinds = kinds;
    }
    config.potential_mult_factor = mult_factor.unwrap_or(config.potential_mult_factor);
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub search: Option<FileSearchConfig>,
    pub brute_force: Option<FileBruteForceConfig>,
    pub depth_first: Option<FileDepthFirstConfig>,
    pub greedy: Option<FileAttemptsConfig>,
    pub random: Option<FileAttemptsConfig>,
    pub hill_climb: Option<FileHillClimbConfig>,
    pub simulated_annealing: Option<FileAnnealingConfig>,
    pub beam_search: Option<FileBeamSearchConfig>,
}

impl FileConfig {
    /// Reads a config file as a raw table so `--set` overrides can be
    /// applied before the typed parse.
    pub fn read_table(path: &Path) -> Result<toml::Table> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_table(table: toml::Table) -> Result<Self> {
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| CliError::Config(e.to_string()))
    }
}
