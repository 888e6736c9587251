// Configuration for family-tree
// Resolves environment, .env and CLI overrides into one AppConfig

#[allow(clippy::module_inception)]
mod config;

pub use config::{
    init_app_config, AppConfig, Endpoints, API_VERSION, DEFAULT_BASE_URL, DEFAULT_LOG_FILE,
    DEFAULT_TREE_ID,
};
