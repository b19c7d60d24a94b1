#![allow(non_snake_case)]
use std::env;
use std::path::PathBuf;

use log::info;

use RustedMathSolver::Utils::config::{ConfigSource, DEFAULT_CONFIG_PATH, ServerConfig};
use RustedMathSolver::Utils::logger::init_logger;
use RustedMathSolver::server::{ServerError, serve};

/// usage: `RustedMathSolver [config.toml]`
#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let (config, source) = ServerConfig::load_or_default(&path)?;
    init_logger(&config.log_level);
    match source {
        ConfigSource::File => info!("configuration loaded from {}", path.display()),
        ConfigSource::Defaults => info!("no config at {}, using defaults", path.display()),
    }
    serve(&config).await
}
