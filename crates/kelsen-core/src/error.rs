use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("norm {0} is already defined")]
    DuplicateNorm(u32),

    #[error("norm {id} follows norm {previous}; authored norm ids must increase")]
    OutOfOrder { id: u32, previous: u32 },
}

/// Failure of the reference grammar, positioned at the offending token.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}
