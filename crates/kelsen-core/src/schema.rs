//! In-memory model of a legal institution schema.
//!
//! A [`Schema`] owns one [`Institution`] and insertion-ordered lists of
//! norms, violations, facts, and agendas. It is built by a grammar, grown by
//! enrichment, and read by the generator.

use crate::deontic::{ComplianceType, DeonticOperator, InstitutionType, Multiplicity};
use crate::error::SchemaError;
use crate::text::subject_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    pub name: String,
    /// Type keyword as written, e.g. `contrato`.
    pub type_name: String,
    pub kind: InstitutionType,
    pub multiplicity: Multiplicity,
    pub legal_domain: String,
}

impl Institution {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        multiplicity: Multiplicity,
        legal_domain: impl Into<String>,
    ) -> Self {
        let type_name = type_name.into();
        Self {
            name: name.into(),
            kind: InstitutionType::from_keyword(&type_name),
            type_name,
            multiplicity,
            legal_domain: legal_domain.into(),
        }
    }
}

/// Precondition on a norm: free text or "norm N holds".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Text(String),
    NormReference(u32),
}

/// Where a norm came from.
///
/// Generated norms record the rule that produced them so enrichment can
/// recognise its own output on a second run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormOrigin {
    Authored,
    /// Tier 1: entry `index` of the domain's default list.
    DomainDefault { domain: String, index: usize },
    /// Tier 2: template `index` applied to authored norm `trigger`.
    Template { trigger: u32, index: usize },
    /// Tier 3: entry `index` of the list keyed by authored norm `trigger`.
    Conditional { trigger: u32, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Norm {
    pub id: u32,
    pub role: String,
    pub deontic: DeonticOperator,
    pub action: String,
    /// Object the action bears on.
    pub scope: Option<String>,
    pub conditions: Vec<Condition>,
    pub origin: NormOrigin,
}

impl Norm {
    pub fn new(
        id: u32,
        role: impl Into<String>,
        deontic: DeonticOperator,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id,
            role: role.into(),
            deontic,
            action: action.into(),
            scope: None,
            conditions: Vec::new(),
            origin: NormOrigin::Authored,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_origin(mut self, origin: NormOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn is_authored(&self) -> bool {
        self.origin == NormOrigin::Authored
    }
}

/// The norm(s) a violation refers to. A compound violation always has two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolatedNorms {
    Single(u32),
    Compound(u32, u32),
}

impl ViolatedNorms {
    pub fn ids(&self) -> Vec<u32> {
        match *self {
            Self::Single(a) => vec![a],
            Self::Compound(a, b) => vec![a, b],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub norms: ViolatedNorms,
    /// Role bound by the consequence.
    pub role: String,
    pub deontic: DeonticOperator,
    pub consequence: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalFact {
    pub description: String,
    pub evidence: String,
}

/// What an agenda asks for: every norm asset, or an explicit remedy list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relief {
    Essential,
    Remedies(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agenda {
    pub requesting_role: String,
    pub compliance: ComplianceType,
    pub institution: String,
    pub beneficiary_role: String,
    pub relief: Relief,
}

impl Agenda {
    pub fn is_essential(&self) -> bool {
        self.relief == Relief::Essential
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    institution: Option<Institution>,
    norms: Vec<Norm>,
    violations: Vec<Violation>,
    facts: Vec<LegalFact>,
    agendas: Vec<Agenda>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the institution wholesale.
    pub fn set_institution(&mut self, institution: Institution) {
        self.institution = Some(institution);
    }

    pub fn institution(&self) -> Option<&Institution> {
        self.institution.as_ref()
    }

    /// Append a norm. Ids are unique, and authored norms must arrive in
    /// increasing id order; generated norms are exempt from the ordering.
    pub fn add_norm(&mut self, norm: Norm) -> Result<&mut Norm, SchemaError> {
        if self.norm(norm.id).is_some() {
            return Err(SchemaError::DuplicateNorm(norm.id));
        }
        if norm.is_authored() {
            if let Some(previous) = self.authored_norms().map(|n| n.id).max() {
                if previous > norm.id {
                    return Err(SchemaError::OutOfOrder {
                        id: norm.id,
                        previous,
                    });
                }
            }
        }
        self.norms.push(norm);
        let last = self.norms.len() - 1;
        Ok(&mut self.norms[last])
    }

    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn add_fact(&mut self, fact: LegalFact) {
        self.facts.push(fact);
    }

    pub fn add_agenda(&mut self, agenda: Agenda) {
        self.agendas.push(agenda);
    }

    pub fn norms(&self) -> &[Norm] {
        &self.norms
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn facts(&self) -> &[LegalFact] {
        &self.facts
    }

    pub fn agendas(&self) -> &[Agenda] {
        &self.agendas
    }

    pub fn norm(&self, id: u32) -> Option<&Norm> {
        self.norms.iter().find(|n| n.id == id)
    }

    /// 1-based position of norm `id` in insertion order.
    pub fn norm_position(&self, id: u32) -> Option<usize> {
        self.norms.iter().position(|n| n.id == id).map(|i| i + 1)
    }

    /// Highest identifier in use, 0 for an empty schema.
    pub fn max_norm_id(&self) -> u32 {
        self.norms.iter().map(|n| n.id).max().unwrap_or(0)
    }

    pub fn authored_norms(&self) -> impl Iterator<Item = &Norm> {
        self.norms.iter().filter(|n| n.is_authored())
    }

    pub fn has_origin(&self, origin: &NormOrigin) -> bool {
        self.norms.iter().any(|n| &n.origin == origin)
    }

    /// Distinct roles in first-seen order across norms, violations, and
    /// agenda requesters/beneficiaries. Roles that differ only in case share
    /// a subject and are listed once, in their first spelling.
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = Vec::new();
        let candidates = self
            .norms
            .iter()
            .map(|n| n.role.as_str())
            .chain(self.violations.iter().map(|v| v.role.as_str()))
            .chain(
                self.agendas
                    .iter()
                    .flat_map(|a| [a.requesting_role.as_str(), a.beneficiary_role.as_str()]),
            );
        for role in candidates {
            if !role.is_empty() && !roles.iter().any(|r| subject_name(r) == subject_name(role)) {
                roles.push(role);
            }
        }
        roles
    }
}
