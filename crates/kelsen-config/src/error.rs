use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no norm ids left above {0} for generated norms")]
    IdSpaceExhausted(u32),
}
