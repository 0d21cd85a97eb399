use hpfold::core::models::direction::Dimensionality;
use hpfold::engine::config::AlgorithmKind;

pub struct DefaultsConfig {
    pub algorithm: AlgorithmKind,
    pub dimensions: Dimensionality,
    pub restarts: usize,
    pub num_solutions: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::DepthFirst,
            dimensions: Dimensionality::Two,
            restarts: 1,
            num_solutions: 1,
        }
    }
}
