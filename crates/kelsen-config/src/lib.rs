pub mod document;
pub mod enrich;
pub mod error;
pub mod validator;

pub use document::{AutomatedNorms, NormTemplate, SchemaConfig};
pub use enrich::{EnrichmentReport, apply_automated_norms};
pub use error::ConfigError;
pub use validator::{ConfigValidator, IssueKind, ValidationIssue, edit_distance, validate_schema};
