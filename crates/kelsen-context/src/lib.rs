//! Legal-context corpus: norms from legal sources, explicit role mappings,
//! and the heuristics that infer mappings and annotations from them.

pub mod annotate;
pub mod corpus;
pub mod error;
pub mod roles;

#[cfg(test)]
mod fixtures;

pub use corpus::{ContextNorm, LegalContext, LegalSource, NormStructure, RoleTarget};
pub use error::ContextError;
pub use roles::RoleMappings;
