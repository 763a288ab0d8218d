use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("schema has no institution")]
    MissingInstitution,

    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),
}
