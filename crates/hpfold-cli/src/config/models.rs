use hpfold::core::models::sequence::Sequence;
use hpfold::engine::config::FoldConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub sequence: Sequence,
    pub output_path: Option<PathBuf>,
    pub core_config: FoldConfig,
}
