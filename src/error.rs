use std::path::PathBuf;

use thiserror::Error;

/// Failures outside the simulation core. The core itself never fails: a lost
/// round is an outcome, not an error.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error("could not load victory art from {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not set up logging: {0}")]
    Logging(String),
}
