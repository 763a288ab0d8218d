//! The legal-context document.
//!
//! ```json
//! {
//!   "sources": {
//!     "<source id>": {
//!       "nombre": "Código Civil", "tipo": "codigo",
//!       "normas": {
//!         "<norm key>": {
//!           "id": "art1824",
//!           "estructura": { "accion", "pasivo", "activo", "objeto", "deontico", "condiciones": [] },
//!           "contexto": ["compraventa"],
//!           "derivadaDe": "codigo_civil.art1793"
//!         }
//!       }
//!     }
//!   },
//!   "roleMappings": { "<contract type>": { "<generic role>": "role" | ["role", ...] } },
//!   "roles": { "<institution>": ["role1", "role2"] }
//! }
//! ```
//!
//! Lookups are case-sensitive except where noted.

use std::path::Path;

use kelsen_core::OrderedMap;
use kelsen_core::text::eq_fold;
use serde::Deserialize;
use tracing::info;

use crate::error::ContextError;

/// Canonical roles used when an institution has none configured.
pub const DEFAULT_ROLES: (&str, &str) = ("parte1", "parte2");

/// A mapped role: one name, or a list whose first entry is preferred.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoleTarget {
    Single(String),
    Many(Vec<String>),
}

impl RoleTarget {
    /// The preferred role, `None` for an empty list.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(role) => Some(role),
            Self::Many(roles) => roles.first().map(String::as_str),
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(role) => std::slice::from_ref(role),
            Self::Many(roles) => roles,
        }
    }

    pub fn contains(&self, role: &str) -> bool {
        self.values().iter().any(|r| r == role)
    }
}

/// Who owes what to whom under a context norm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NormStructure {
    #[serde(default, rename = "accion")]
    pub action: Option<String>,
    /// The bound party.
    #[serde(default, rename = "pasivo")]
    pub passive: Option<String>,
    /// The benefiting party.
    #[serde(default, rename = "activo")]
    pub active: Option<String>,
    #[serde(default, rename = "objeto")]
    pub object: Option<String>,
    #[serde(default, rename = "deontico")]
    pub deontic: Option<String>,
    /// Institutions the norm applies to.
    #[serde(default, rename = "condiciones")]
    pub conditions: Vec<String>,
}

impl NormStructure {
    /// Whether `institution` is listed in the conditions, ignoring case.
    pub fn applies_to(&self, institution: &str) -> bool {
        self.conditions.iter().any(|c| eq_fold(c, institution))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContextNorm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "estructura")]
    pub structure: Option<NormStructure>,
    /// Contract types and domains the norm is relevant to.
    #[serde(default, rename = "contexto")]
    pub context: Vec<String>,
    /// `"source.id"` of the norm this one derives from.
    #[serde(default, rename = "derivadaDe")]
    pub derived_from: Option<String>,
}

impl ContextNorm {
    pub fn in_context_ignore_case(&self, contract_type: &str) -> bool {
        self.context.iter().any(|c| eq_fold(c, contract_type))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegalSource {
    #[serde(default, rename = "nombre")]
    pub name: Option<String>,
    #[serde(default, rename = "tipo")]
    pub kind: Option<String>,
    #[serde(default, rename = "normas")]
    pub norms: OrderedMap<ContextNorm>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegalContext {
    #[serde(default)]
    pub sources: OrderedMap<LegalSource>,
    /// Contract type → generic role → specific role(s).
    #[serde(default, rename = "roleMappings")]
    pub role_mappings: OrderedMap<OrderedMap<RoleTarget>>,
    /// Institution → canonical roles.
    #[serde(default)]
    pub roles: OrderedMap<Vec<String>>,
}

impl LegalContext {
    /// Read and parse a legal-context file.
    pub fn load(path: &Path) -> Result<Self, ContextError> {
        if !path.exists() {
            return Err(ContextError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let context = Self::from_json(&text)?;
        info!(
            path = %path.display(),
            sources = context.sources.len(),
            norms = context.norm_count(),
            "loaded legal context"
        );
        Ok(context)
    }

    pub fn from_json(text: &str) -> Result<Self, ContextError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn norm_count(&self) -> usize {
        self.sources.values().map(|s| s.norms.len()).sum()
    }

    /// Every norm with the key of its source and its own key, in document order.
    pub fn norms(&self) -> impl Iterator<Item = (&str, &LegalSource, &str, &ContextNorm)> {
        self.sources.iter().flat_map(|(source_key, source)| {
            source
                .norms
                .iter()
                .map(move |(norm_key, norm)| (source_key, source, norm_key, norm))
        })
    }

    pub fn get_norm(&self, source: &str, norm_id: &str) -> Option<&ContextNorm> {
        self.sources.get(source)?.norms.get(norm_id)
    }

    /// Whether norm `norm1` of `source1` declares it derives from norm
    /// `norm2` of `source2`.
    pub fn has_relationship(&self, source1: &str, norm1: &str, source2: &str, norm2: &str) -> bool {
        self.get_norm(source1, norm1)
            .and_then(|n| n.derived_from.as_deref())
            .is_some_and(|d| d == format!("{source2}.{norm2}"))
    }

    /// Norms relevant to a domain, keyed by their `id`.
    ///
    /// A norm is relevant when a context entry equals the domain or is a
    /// substring of it. Norms without an `id` are skipped.
    pub fn domain_norms(&self, domain: &str) -> Vec<(&str, &ContextNorm)> {
        self.norms()
            .filter_map(|(_, _, _, norm)| {
                let id = norm.id.as_deref()?;
                norm.context
                    .iter()
                    .any(|c| c == domain || domain.contains(c.as_str()))
                    .then_some((id, norm))
            })
            .collect()
    }

    /// The two canonical roles of an institution from the `roles` table
    /// (name matched ignoring case), each defaulting independently.
    pub fn institution_roles(&self, institution: &str) -> (&str, &str) {
        let roles = self.roles.get_ignore_case(institution);
        let role = |i: usize| roles.and_then(|r| r.get(i)).map(String::as_str);
        (
            role(0).unwrap_or(DEFAULT_ROLES.0),
            role(1).unwrap_or(DEFAULT_ROLES.1),
        )
    }
}
