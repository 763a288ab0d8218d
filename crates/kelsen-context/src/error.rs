use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("legal context file not found: {0}")]
    NotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed legal context: {0}")]
    Malformed(#[from] serde_json::Error),
}
