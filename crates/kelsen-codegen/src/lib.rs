//! Kelsen code generation.
//!
//! [`Generator`] renders an enriched [`Schema`](kelsen_core::Schema) as
//! `string`, `subject`, `asset`, `clause`, `fact`, and `agenda`
//! declarations. With a [`LegalContext`](kelsen_context::LegalContext) it
//! appends assets and clauses for every corpus norm that applies to the
//! institution, followed by annotations.

pub mod classify;
pub mod context;
pub mod error;
pub mod render;

pub use classify::{AssetClassifier, AssetKind, AssetType, KeywordClassifier, Polarity};
pub use error::GenerateError;
pub use render::{Generator, generate, generate_with_context};
