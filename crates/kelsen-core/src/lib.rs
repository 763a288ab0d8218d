//! Core of the Kelsen schema transpiler: the noise-tolerant scanner, the
//! schema model it feeds, and the text helpers shared by later stages.

pub mod deontic;
pub mod error;
pub mod lexer;
pub mod ordered;
pub mod parser;
pub mod schema;
pub mod text;
pub mod token;

pub use deontic::{ComplianceType, DeonticOperator, InstitutionType, Multiplicity};
pub use error::{ParseError, SchemaError};
pub use lexer::{Lexer, tokenize};
pub use ordered::OrderedMap;
pub use parser::parse_schema;
pub use schema::{
    Agenda, Condition, Institution, LegalFact, Norm, NormOrigin, Relief, Schema, ViolatedNorms,
    Violation,
};
pub use token::Token;
