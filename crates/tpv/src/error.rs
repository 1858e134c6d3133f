//! CLI error types.

use tpv_config::ConfigError;
use tpv_path::PathError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{path}: {}", .source.reason())]
    Path { path: String, source: PathError },

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Validation(String),
}
