//! Closed vocabularies of the schema language: deontic operators,
//! institution types, multiplicity, and compliance.
//!
//! Each enum maps from the Spanish surface keyword (case-insensitive, with a
//! fixed default for anything unrecognised) and renders to its Kelsen form.

use crate::text::eq_fold;

/// The four deontic positions a norm can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeonticOperator {
    /// `debe`
    Obligation,
    /// `no-debe`
    Prohibition,
    /// `puede`
    Privilege,
    /// `tiene-derecho-a`
    ClaimRight,
}

impl DeonticOperator {
    /// Map a surface keyword to an operator. Unrecognised text is an obligation.
    pub fn from_keyword(text: &str) -> Self {
        if eq_fold(text, "debe") {
            Self::Obligation
        } else if eq_fold(text, "no-debe") {
            Self::Prohibition
        } else if eq_fold(text, "puede") {
            Self::Privilege
        } else if eq_fold(text, "tiene-derecho-a") {
            Self::ClaimRight
        } else {
            Self::Obligation
        }
    }

    /// Strict variant used by the scanner: `None` unless `text` is exactly a keyword.
    pub fn parse_keyword(text: &str) -> Option<Self> {
        [
            ("debe", Self::Obligation),
            ("no-debe", Self::Prohibition),
            ("puede", Self::Privilege),
            ("tiene-derecho-a", Self::ClaimRight),
        ]
        .into_iter()
        .find(|(kw, _)| eq_fold(text, kw))
        .map(|(_, op)| op)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Obligation => "debe",
            Self::Prohibition => "no-debe",
            Self::Privilege => "puede",
            Self::ClaimRight => "tiene-derecho-a",
        }
    }

    /// Operator name in Kelsen clause syntax.
    pub fn as_kelsen(&self) -> &'static str {
        match self {
            Self::Obligation => "OB",
            Self::Prohibition => "PR",
            Self::Privilege => "PVG",
            Self::ClaimRight => "CR",
        }
    }
}

/// Kind of legal institution being modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstitutionType {
    #[default]
    Contract,
    Procedure,
    LegalAct,
    LegalFact,
}

impl InstitutionType {
    /// Map a type keyword. Unrecognised text is a contract.
    pub fn from_keyword(text: &str) -> Self {
        if eq_fold(text, "contrato") {
            Self::Contract
        } else if eq_fold(text, "procedimiento") {
            Self::Procedure
        } else if eq_fold(text, "acto jurídico") || eq_fold(text, "acto-juridico") {
            Self::LegalAct
        } else if eq_fold(text, "hecho jurídico") || eq_fold(text, "hecho-juridico") {
            Self::LegalFact
        } else {
            Self::Contract
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contract => "CONTRACT",
            Self::Procedure => "PROCEDURE",
            Self::LegalAct => "LEGAL_ACT",
            Self::LegalFact => "LEGAL_FACT",
        }
    }
}

/// How many instances of the institution the schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Multiplicity {
    #[default]
    Multiple,
    Single,
}

impl Multiplicity {
    /// Map a multiplicity keyword. Unrecognised text is `Multiple`.
    pub fn from_keyword(text: &str) -> Self {
        if ["una", "un", "single"].iter().any(|kw| eq_fold(text, kw)) {
            Self::Single
        } else {
            Self::Multiple
        }
    }
}

/// Outcome an agenda asks the adjudicator to establish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplianceType {
    /// `cumplimiento`
    Fulfilled,
    /// `incumplimiento`
    Breached,
}

impl ComplianceType {
    /// Map a compliance keyword. Unrecognised text is `Fulfilled`.
    pub fn from_keyword(text: &str) -> Self {
        if eq_fold(text, "incumplimiento") {
            Self::Breached
        } else {
            Self::Fulfilled
        }
    }

    /// Agenda kind in Kelsen syntax.
    pub fn as_kelsen(&self) -> &'static str {
        match self {
            Self::Fulfilled => "FULFILL",
            Self::Breached => "BREACH",
        }
    }

    /// Suffix used when naming agendas.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fulfilled => "Fulfillment",
            Self::Breached => "Breach",
        }
    }
}
