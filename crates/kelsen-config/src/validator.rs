//! Membership checks against the configuration, with fuzzy suggestions.
//!
//! All comparisons ignore case. A suggestion is the configured entry with the
//! smallest edit distance to the input (first one wins on ties), offered only
//! when that distance is at most [`MAX_SUGGESTION_DISTANCE`] and the input is
//! not already valid.

use std::fmt;

use kelsen_core::Schema;
use kelsen_core::text::eq_fold;

use crate::document::SchemaConfig;

pub const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Levenshtein distance over case-folded characters, unit costs.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Closest candidate within the suggestion distance; first minimum wins.
fn closest<'a>(input: &str, candidates: impl IntoIterator<Item = &'a String>) -> Option<&'a str> {
    let mut best: Option<(&'a str, usize)> = None;
    for candidate in candidates {
        let distance = edit_distance(input, candidate);
        if distance > MAX_SUGGESTION_DISTANCE {
            continue;
        }
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(s, _)| s)
}

fn contains_fold(list: &[String], value: &str) -> bool {
    list.iter().any(|item| eq_fold(item, value))
}

/// Validator over a borrowed configuration, with an optional current
/// institution used for role checks.
#[derive(Debug, Clone)]
pub struct ConfigValidator<'a> {
    config: &'a SchemaConfig,
    institution: Option<String>,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(config: &'a SchemaConfig) -> Self {
        Self {
            config,
            institution: None,
        }
    }

    pub fn set_current_institution(&mut self, institution: impl Into<String>) {
        self.institution = Some(institution.into());
    }

    pub fn current_institution(&self) -> Option<&str> {
        self.institution.as_deref()
    }

    pub fn is_valid_institution(&self, name: &str) -> bool {
        contains_fold(&self.config.institutions, name)
    }

    pub fn is_valid_type(&self, type_name: &str) -> bool {
        contains_fold(&self.config.types, type_name)
    }

    pub fn is_valid_domain(&self, domain: &str) -> bool {
        contains_fold(&self.config.domains, domain)
    }

    /// Role check against the current institution; false when none is set.
    pub fn is_valid_role(&self, role: &str) -> bool {
        self.institution
            .as_deref()
            .is_some_and(|inst| self.is_valid_role_for(inst, role))
    }

    pub fn is_valid_role_for(&self, institution: &str, role: &str) -> bool {
        self.config
            .roles_for(institution)
            .is_some_and(|roles| contains_fold(roles, role))
    }

    pub fn suggest_institution(&self, name: &str) -> Option<&'a str> {
        if self.is_valid_institution(name) {
            return None;
        }
        let config: &'a SchemaConfig = self.config;
        closest(name, &config.institutions)
    }

    pub fn suggest_type(&self, type_name: &str) -> Option<&'a str> {
        if self.is_valid_type(type_name) {
            return None;
        }
        let config: &'a SchemaConfig = self.config;
        closest(type_name, &config.types)
    }

    pub fn suggest_domain(&self, domain: &str) -> Option<&'a str> {
        if self.is_valid_domain(domain) {
            return None;
        }
        let config: &'a SchemaConfig = self.config;
        closest(domain, &config.domains)
    }

    /// Closest role of the current institution.
    pub fn suggest_role(&self, role: &str) -> Option<&'a str> {
        let config: &'a SchemaConfig = self.config;
        let roles = config.roles_for(self.institution.as_deref()?)?;
        if contains_fold(roles, role) {
            return None;
        }
        closest(role, roles)
    }
}

// ── Whole-schema validation ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Institution,
    InstitutionType,
    LegalDomain,
    Role,
}

impl IssueKind {
    fn label(&self) -> &'static str {
        match self {
            Self::Institution => "institution",
            Self::InstitutionType => "institution type",
            Self::LegalDomain => "legal domain",
            Self::Role => "role",
        }
    }
}

/// A value that failed a membership test. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub value: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind.label(), self.value)?;
        if let Some(s) = &self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

/// Check the institution header and every role in use.
///
/// Roles are only checked when the configuration has a role vocabulary for
/// the institution; each unknown role is reported once.
pub fn validate_schema(config: &SchemaConfig, schema: &Schema) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let Some(inst) = schema.institution() else {
        return issues;
    };

    let mut validator = ConfigValidator::new(config);
    validator.set_current_institution(inst.name.clone());

    let mut report = |kind, value: &str, suggestion: Option<&str>| {
        issues.push(ValidationIssue {
            kind,
            value: value.to_string(),
            suggestion: suggestion.map(str::to_string),
        });
    };

    if !validator.is_valid_institution(&inst.name) {
        report(
            IssueKind::Institution,
            &inst.name,
            validator.suggest_institution(&inst.name),
        );
    }
    if !validator.is_valid_type(&inst.type_name) {
        report(
            IssueKind::InstitutionType,
            &inst.type_name,
            validator.suggest_type(&inst.type_name),
        );
    }
    if !inst.legal_domain.is_empty() && !validator.is_valid_domain(&inst.legal_domain) {
        report(
            IssueKind::LegalDomain,
            &inst.legal_domain,
            validator.suggest_domain(&inst.legal_domain),
        );
    }

    if config.roles_for(&inst.name).is_some() {
        let mut seen: Vec<&str> = Vec::new();
        for role in schema.roles() {
            if seen.iter().any(|r| eq_fold(r, role)) {
                continue;
            }
            seen.push(role);
            if !validator.is_valid_role(role) {
                report(IssueKind::Role, role, validator.suggest_role(role));
            }
        }
    }
    issues
}
