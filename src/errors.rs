use thiserror::Error;

use alu_config::ConfigError;
use alu_core::CatalogLoadError;
use alu_storage_json::StorageError;

/// Failures while wiring up the application outside of a single command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),
    #[error("Remote backend error: {0}")]
    Remote(String),
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Errors surfaced by the shell loop itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::App(AppError::from(err))
    }
}

impl From<CatalogLoadError> for CliError {
    fn from(err: CatalogLoadError) -> Self {
        CliError::App(AppError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}
