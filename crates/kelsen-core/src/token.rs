//! Token vocabulary handed from the scanner to a grammar.

use std::fmt;

use crate::deontic::{ComplianceType, DeonticOperator};

/// A classified lexical unit. Variants that carry text keep the raw word so
/// the grammar can rebuild phrases from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Double-quoted literal, quotes removed.
    String(String),
    /// `institution` / `[Institution]`
    Institution,
    /// Integer literal; a trailing period is tolerated.
    Number(u32),
    /// `regla`
    NormReference,
    Deontic(DeonticOperator),
    /// `en-caso-que`
    Conditional,
    /// `y`
    Conjunction,
    /// `violación` / `violacion*`
    Violation,
    /// `entonces`
    Consequence,
    /// `hecho` / `hecho-juridico*`
    Fact,
    /// `evidencia`
    Evidence,
    /// `busca`
    Seek,
    /// `establezca`
    Establish,
    Compliance(ComplianceType),
    /// `adjudique`
    Adjudicate,
    /// `lo-esencial*` / `esencial`
    Essential,
    /// `lo-siguiente*` / `siguiente`
    Following,
    /// `actua*`
    Scope,
    InstitutionType(String),
    Multiplicity(String),
    /// `derecho-*`
    LegalDomain(String),
    Role(String),
    /// Capitalised word.
    InstitutionName(String),
    /// Anything else.
    Word(String),
    /// End-of-input sentinel.
    End,
}

impl Token {
    /// Short name of the token kind for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Institution => "institution marker",
            Self::Number(_) => "number",
            Self::NormReference => "norm reference",
            Self::Deontic(_) => "deontic operator",
            Self::Conditional => "conditional",
            Self::Conjunction => "conjunction",
            Self::Violation => "violation marker",
            Self::Consequence => "consequence marker",
            Self::Fact => "fact marker",
            Self::Evidence => "evidence marker",
            Self::Seek => "seek",
            Self::Establish => "establish",
            Self::Compliance(_) => "compliance",
            Self::Adjudicate => "adjudicate",
            Self::Essential => "essential",
            Self::Following => "following",
            Self::Scope => "scope marker",
            Self::InstitutionType(_) => "institution type",
            Self::Multiplicity(_) => "multiplicity",
            Self::LegalDomain(_) => "legal domain",
            Self::Role(_) => "role",
            Self::InstitutionName(_) => "name",
            Self::Word(_) => "word",
            Self::End => "end of input",
        }
    }

    /// Raw text carried by text-valued tokens.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::String(s)
            | Self::InstitutionType(s)
            | Self::Multiplicity(s)
            | Self::LegalDomain(s)
            | Self::Role(s)
            | Self::InstitutionName(s)
            | Self::Word(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {n}"),
            Self::Deontic(op) => write!(f, "deontic '{}'", op.keyword()),
            Self::Compliance(c) => write!(f, "compliance {}", c.as_kelsen()),
            other => match other.text() {
                Some(text) => write!(f, "{} '{text}'", other.kind()),
                None => f.write_str(other.kind()),
            },
        }
    }
}
