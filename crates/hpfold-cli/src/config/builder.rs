use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::FoldArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use hpfold::core::models::direction::Dimensionality;
use hpfold::core::models::sequence::Sequence;
use hpfold::engine::config::{self as core_config, AlgorithmKind, FoldConfig};
use std::time::Duration;
use tracing::{debug, warn};

/// Merges defaults, the config file, `--set` overrides and explicit flags,
/// in increasing order of precedence.
pub fn build_config(args: &FoldArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let sequence: Sequence = args.sequence.parse()?;

    let table = match &args.config {
        Some(path) => FileConfig::read_table(path)?,
        None => toml::Table::new(),
    };
    let table = apply_set_values(table, &args.set_values)?;
    let file_config = FileConfig::from_table(table)?;
    debug!("Configuration file contents: {:?}", file_config);

    let search = file_config.search.unwrap_or_default();
    let algorithm = args
        .algorithm
        .or(search.algorithm)
        .unwrap_or(defaults.algorithm);
    let dimensions = match args.dimensions.or(search.dimensions) {
        Some(rank) => {
            Dimensionality::try_from(rank).map_err(|e| CliError::Argument(e.to_string()))?
        }
        None => defaults.dimensions,
    };
    let time_limit = args
        .time_limit
        .or(search.time_limit_secs)
        .map(|secs| {
            Duration::try_from_secs_f64(secs).map_err(|_| {
                CliError::Argument(format!("Invalid time limit: {} seconds", secs))
            })
        })
        .transpose()?;

    let mut brute_force = core_config::BruteForceConfig::default();
    if let Some(file) = file_config.brute_force {
        file.apply(&mut brute_force);
    }
    let mut depth_first = core_config::DepthFirstConfig::default();
    if let Some(file) = file_config.depth_first {
        file.apply(&mut depth_first);
    }
    let greedy = core_config::GreedyConfig {
        max_attempts: file_config.greedy.and_then(|g| g.max_attempts),
    };
    let random = core_config::RandomConfig {
        max_attempts: file_config.random.and_then(|r| r.max_attempts),
    };
    let mut hill_climb = core_config::HillClimbConfig::default();
    if let Some(iterations) = file_config.hill_climb.and_then(|h| h.iterations) {
        hill_climb.iterations = iterations;
    }
    let mut annealing = core_config::AnnealingConfig::default();
    if let Some(file) = file_config.simulated_annealing {
        file.apply(&mut annealing);
    }
    let mut beam_search = core_config::BeamSearchConfig::default();
    if let Some(file) = file_config.beam_search {
        file.apply(&mut beam_search);
    }

    if !args.heuristics.is_empty() {
        depth_first.heuristics.kinds = args.heuristics.clone();
        annealing.heuristics.kinds = args.heuristics.clone();
    }
    if args.no_pruning {
        depth_first.score_pruning = core_config::ScorePruningConfig::never();
        depth_first.neighbour_pruning = false;
        depth_first.budget_pruning = false;
    }

    let mut fold_config = core_config::FoldConfigBuilder::new()
        .algorithm(algorithm)
        .dimensions(dimensions)
        .time_limit(time_limit)
        .seed(args.seed.or(search.seed))
        .restarts(
            args.restarts
                .or(search.restarts)
                .unwrap_or(defaults.restarts),
        )
        .num_solutions(
            args.num_solutions
                .or(search.num_solutions)
                .unwrap_or(defaults.num_solutions),
        )
        .brute_force(brute_force)
        .depth_first(depth_first)
        .greedy(greedy)
        .random(random)
        .hill_climb(hill_climb)
        .annealing(annealing)
        .beam_search(beam_search)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    if let Some(max) = args.max_iterations {
        apply_iteration_budget(&mut fold_config, max);
    }

    Ok(AppConfig {
        sequence,
        output_path: args.output.clone(),
        core_config: fold_config,
    })
}

/// Points `--max-iterations` at the budget the chosen algorithm actually uses.
fn apply_iteration_budget(config: &mut FoldConfig, max: u64) {
    match config.algorithm {
        AlgorithmKind::BruteForce => config.brute_force.max_iterations = Some(max),
        AlgorithmKind::DepthFirst => config.depth_first.max_iterations = max,
        AlgorithmKind::Greedy => config.greedy.max_attempts = Some(max),
        AlgorithmKind::SimulatedAnnealing => config.annealing.n_permutations = max,
        AlgorithmKind::BeamSearch => config.beam_search.max_iterations = max,
        AlgorithmKind::PureRandom | AlgorithmKind::IterativeRandom => {
            config.random.max_attempts = Some(max)
        }
        AlgorithmKind::HillClimb => config.hill_climb.iterations = max,
        AlgorithmKind::Spiral => {
            warn!("--max-iterations has no effect on the spiral fold.");
        }
    }
}

fn apply_set_values(mut table: toml::Table, set_values: &[String]) -> Result<toml::Table> {
    for raw in set_values {
        let assignment =
            parser::parse_assignment(raw).map_err(|e| CliError::Config(e.to_string()))?;
        let (leaf, parents) = assignment
            .path
            .split_last()
            .ok_or_else(|| CliError::Config(format!("Empty key in --set '{}'", raw)))?;

        let mut current = &mut table;
        for &part in parents {
            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            current = entry.as_table_mut().ok_or_else(|| {
                CliError::Config(format!("Cannot set '{}': '{}' is not a table", raw, part))
            })?;
        }
        current.insert(leaf.to_string(), parser::parse_value(assignment.value));
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpfold::core::scoring::BondScore;
    use hpfold::engine::heuristics::HeuristicKind;
    use hpfold::engine::utils::acceptance::CoolingSchedule;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_fold_args() -> FoldArgs {
        FoldArgs {
            sequence: "HPHPPHHPHH".to_string(),
            algorithm: None,
            dimensions: None,
            config: None,
            output: None,
            seed: None,
            restarts: None,
            num_solutions: None,
            max_iterations: None,
            time_limit: None,
            heuristics: vec![],
            no_pruning: false,
            set_values: vec![],
        }
    }

    fn write_config(text: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hpfold.toml");
        fs::write(&path, text).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let app = build_config(&base_fold_args()).unwrap();
        let defaults = DefaultsConfig::default();
        let cfg = app.core_config;

        assert_eq!(app.sequence.len(), 10);
        assert_eq!(cfg.algorithm, defaults.algorithm);
        assert_eq!(cfg.search.dimensions, defaults.dimensions);
        assert_eq!(cfg.restarts, defaults.restarts);
        assert_eq!(cfg.num_solutions, defaults.num_solutions);
        assert_eq!(cfg.depth_first, core_config::DepthFirstConfig::default());
        assert!(cfg.search.time_limit.is_none());
        assert!(app.output_path.is_none());
    }

    #[test]
    fn file_values_are_merged() {
        let (_dir, path) = write_config(
            r#"
            [search]
            algorithm = "beam-search"
            dimensions = 3
            seed = 4
            restarts = 3
            num-solutions = 2
            time-limit-secs = 1.5

            [beam-search]
            max-iterations = 900
            scoring-param = 0.25

            [simulated-annealing]
            heuristics = ["potential-plus"]

            [simulated-annealing.schedule]
            kind = "exponential"
            decrease = 0.999
            "#,
        );
        let mut args = base_fold_args();
        args.config = Some(path);

        let cfg = build_config(&args).unwrap().core_config;
        assert_eq!(cfg.algorithm, AlgorithmKind::BeamSearch);
        assert_eq!(cfg.search.dimensions, Dimensionality::Three);
        assert_eq!(cfg.search.seed, Some(4));
        assert_eq!(cfg.search.time_limit, Some(Duration::from_millis(1500)));
        assert_eq!(cfg.restarts, 3);
        assert_eq!(cfg.num_solutions, 2);
        assert_eq!(cfg.beam_search.max_iterations, 900);
        assert_eq!(cfg.beam_search.scoring_param, 0.25);
        assert_eq!(cfg.annealing.heuristics.kinds, vec![HeuristicKind::PotentialPlus]);
        assert_eq!(
            cfg.annealing.schedule,
            CoolingSchedule::Exponential { decrease: 0.999 }
        );
    }

    #[test]
    fn flags_override_file_values() {
        let (_dir, path) = write_config(
            r#"
            [search]
            algorithm = "greedy"
            dimensions = 2
            restarts = 8
            "#,
        );
        let mut args = base_fold_args();
        args.config = Some(path);
        args.algorithm = Some(AlgorithmKind::DepthFirst);
        args.dimensions = Some(3);
        args.restarts = Some(2);
        args.heuristics = vec![HeuristicKind::FoldAmount];
        args.max_iterations = Some(1234);

        let cfg = build_config(&args).unwrap().core_config;
        assert_eq!(cfg.algorithm, AlgorithmKind::DepthFirst);
        assert_eq!(cfg.search.dimensions, Dimensionality::Three);
        assert_eq!(cfg.restarts, 2);
        assert_eq!(cfg.depth_first.heuristics.kinds, vec![HeuristicKind::FoldAmount]);
        assert_eq!(cfg.depth_first.max_iterations, 1234);
    }

    #[test]
    fn set_values_override_file_and_create_tables() {
        let (_dir, path) = write_config("[depth-first.pruning]\nalpha = 0.3\n");
        let mut args = base_fold_args();
        args.config = Some(path);
        args.set_values = vec![
            "depth-first.pruning.alpha=0.8".to_string(),
            "depth-first.pruning.min-best-score=-3".to_string(),
            "search.algorithm=hill-climb".to_string(),
            "hill-climb.iterations=42".to_string(),
            "brute-force.top-k=3".to_string(),
        ];

        let cfg = build_config(&args).unwrap().core_config;
        assert_eq!(cfg.depth_first.score_pruning.alpha, 0.8);
        assert_eq!(cfg.depth_first.score_pruning.min_best_score, BondScore(-3));
        assert_eq!(cfg.algorithm, AlgorithmKind::HillClimb);
        assert_eq!(cfg.hill_climb.iterations, 42);
        assert_eq!(cfg.brute_force.top_k, 3);
    }

    #[test]
    fn unknown_set_key_is_a_config_error() {
        let mut args = base_fold_args();
        args.set_values = vec!["search.colour=blue".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        args.set_values = vec!["search".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn no_pruning_disables_every_pruner() {
        let mut args = base_fold_args();
        args.no_pruning = true;
        let cfg = build_config(&args).unwrap().core_config;
        assert!(cfg.depth_first.score_pruning.is_disabled());
        assert!(!cfg.depth_first.neighbour_pruning);
        assert!(!cfg.depth_first.budget_pruning);
    }

    #[test]
    fn invalid_inputs_are_reported() {
        let mut args = base_fold_args();
        args.sequence = "HPXH".to_string();
        assert!(matches!(build_config(&args), Err(CliError::Sequence(_))));

        let mut args = base_fold_args();
        args.num_solutions = Some(0);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let mut args = base_fold_args();
        args.time_limit = Some(-1.0);
        assert!(matches!(build_config(&args), Err(CliError::Argument(_))));
    }
}
