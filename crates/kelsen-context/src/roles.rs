//! Generic-to-specific role mapping.
//!
//! Explicit `roleMappings` win. Without them, mappings are inferred from
//! the corpus: each norm whose context names the contract type contributes
//! its bound party under a generic label chosen from the action verb. The
//! inferred table is then closed under inversion so it can be walked in
//! both directions.

use kelsen_core::OrderedMap;
use tracing::debug;

use crate::corpus::{LegalContext, RoleTarget};

/// Generic label from action verbs, first match wins.
const ACTION_LABELS: &[(&[&str], &str)] = &[
    (&["pagar"], "deudor"),
    (&["entregar"], "obligado_entrega"),
    (&["mantener", "reparar"], "obligado_mantenimiento"),
];

const FALLBACK_LABEL: &str = "contratante";

/// Party nouns that, when mentioned in an action, name the counterpart
/// under a secondary label.
const COUNTERPARTS: &[(&str, &str)] = &[
    ("comprador", "receptor"),
    ("vendedor", "proveedor"),
    ("arrendador", "propietario"),
    ("arrendatario", "usuario"),
];

fn action_label(action: &str) -> &'static str {
    ACTION_LABELS
        .iter()
        .find(|(verbs, _)| verbs.iter().any(|v| action.contains(*v)))
        .map_or(FALLBACK_LABEL, |&(_, label)| label)
}

/// An inferred role table for one contract type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleMappings {
    entries: OrderedMap<RoleTarget>,
}

impl RoleMappings {
    pub fn get(&self, role: &str) -> Option<&RoleTarget> {
        self.entries.get(role)
    }

    /// Preferred mapping of `role`.
    pub fn resolve(&self, role: &str) -> Option<&str> {
        self.get(role)?.first()
    }

    pub fn contains_key(&self, role: &str) -> bool {
        self.entries.contains_key(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleTarget)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record `label → role`, promoting to a list on a second distinct role.
    fn add(&mut self, label: &str, role: &str) {
        match self.entries.get_mut(label) {
            None => {
                self.entries.insert(label, RoleTarget::Single(role.to_string()));
            }
            Some(target) => match target {
                RoleTarget::Single(existing) if existing.as_str() != role => {
                    *target = RoleTarget::Many(vec![existing.clone(), role.to_string()]);
                }
                RoleTarget::Many(roles) if !roles.iter().any(|r| r == role) => {
                    roles.push(role.to_string());
                }
                _ => {}
            },
        }
    }

    fn add_if_absent(&mut self, label: &str, role: &str) {
        if !self.entries.contains_key(label) {
            self.entries.insert(label, RoleTarget::Single(role.to_string()));
        }
    }

    /// Add `value → key` for every value that is not yet a key.
    fn close_under_inversion(&mut self) {
        let snapshot = self.entries.clone();
        for (key, target) in snapshot.iter() {
            for value in target.values() {
                self.add_if_absent(value, key);
            }
        }
    }
}

impl LegalContext {
    /// Infer role mappings for a contract type from the corpus.
    ///
    /// Returns `None` when no norm in the corpus is relevant.
    pub fn infer_role_mappings(&self, contract_type: &str) -> Option<RoleMappings> {
        let mut mappings = RoleMappings::default();

        for (_, _, _, norm) in self.norms() {
            if !norm.in_context_ignore_case(contract_type) {
                continue;
            }
            let Some(structure) = &norm.structure else {
                continue;
            };
            let (Some(passive), Some(action)) = (&structure.passive, &structure.action) else {
                continue;
            };

            mappings.add(action_label(action), passive);
            for &(noun, label) in COUNTERPARTS {
                if action.contains(noun) && passive != noun {
                    mappings.add_if_absent(label, noun);
                }
            }
        }

        if mappings.is_empty() {
            debug!(contract_type, "no role mappings inferred");
            return None;
        }
        mappings.close_under_inversion();
        debug!(contract_type, count = mappings.len(), "inferred role mappings");
        Some(mappings)
    }

    /// Map a generic role to the role used by `contract_type`.
    ///
    /// Explicit mappings first, then inferred ones, then the generic role
    /// itself. Never fails.
    pub fn map_role(&self, contract_type: &str, generic_role: &str) -> String {
        self.map_role_with(contract_type, generic_role, None)
    }

    /// [`map_role`](Self::map_role) with inference already run by the caller.
    pub(crate) fn map_role_with(
        &self,
        contract_type: &str,
        generic_role: &str,
        inferred: Option<&RoleMappings>,
    ) -> String {
        let explicit = self
            .role_mappings
            .get(contract_type)
            .and_then(|table| table.get(generic_role))
            .and_then(RoleTarget::first);
        if let Some(role) = explicit {
            debug!(contract_type, generic_role, role, "explicit role mapping");
            return role.to_string();
        }

        let owned;
        let inferred = match inferred {
            Some(mappings) => Some(mappings),
            None => {
                owned = self.infer_role_mappings(contract_type);
                owned.as_ref()
            }
        };
        if let Some(role) = inferred.and_then(|m| m.resolve(generic_role)) {
            debug!(contract_type, generic_role, role, "inferred role mapping");
            return role.to_string();
        }

        generic_role.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::CIVIL_CODE;
    use proptest::prelude::*;

    fn context() -> LegalContext {
        LegalContext::from_json(CIVIL_CODE).unwrap()
    }

    #[test]
    fn labels_follow_verb_priority() {
        assert_eq!(action_label("pagar y entregar"), "deudor");
        assert_eq!(action_label("entregar la cosa"), "obligado_entrega");
        assert_eq!(action_label("reparar el techo"), "obligado_mantenimiento");
        assert_eq!(action_label("custodiar"), "contratante");
    }

    #[test]
    fn infers_forward_secondary_and_inverse_mappings() {
        let inferred = context().infer_role_mappings("CompraVenta").unwrap();
        let keys: Vec<&str> = inferred.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            ["obligado_entrega", "receptor", "deudor", "proveedor", "vendedor", "comprador"]
        );
        assert_eq!(inferred.resolve("deudor"), Some("comprador"));
        assert_eq!(inferred.resolve("proveedor"), Some("vendedor"));
        assert_eq!(inferred.resolve("vendedor"), Some("obligado_entrega"));
        assert_eq!(inferred.resolve("comprador"), Some("receptor"));
    }

    #[test]
    fn irrelevant_contract_type_infers_nothing() {
        assert!(context().infer_role_mappings("permuta").is_none());
    }

    #[test]
    fn conflicting_roles_promote_to_list() {
        let ctx = LegalContext::from_json(
            r#"{"sources": {"s": {"normas": {
                "a": {"estructura": {"accion": "pagar renta", "pasivo": "arrendatario"}, "contexto": ["arrendamiento"]},
                "b": {"estructura": {"accion": "pagar fianza", "pasivo": "fiador"}, "contexto": ["arrendamiento"]},
                "c": {"estructura": {"accion": "pagar multa", "pasivo": "fiador"}, "contexto": ["arrendamiento"]}
            }}}}"#,
        )
        .unwrap();
        let inferred = ctx.infer_role_mappings("arrendamiento").unwrap();
        assert_eq!(
            inferred.get("deudor"),
            Some(&RoleTarget::Many(vec!["arrendatario".into(), "fiador".into()]))
        );
        assert_eq!(inferred.resolve("fiador"), Some("deudor"));
    }

    #[test]
    fn map_role_prefers_explicit_then_inferred_then_identity() {
        let ctx = context();
        assert_eq!(ctx.map_role("Arrendamiento", "propietario"), "arrendador");
        assert_eq!(ctx.map_role("Arrendamiento", "usuario"), "arrendatario");
        assert_eq!(ctx.map_role("compraventa", "deudor"), "comprador");
        assert_eq!(ctx.map_role("compraventa", "juez"), "juez");
        assert_eq!(ctx.map_role("permuta", "permutante"), "permutante");
    }

    #[test]
    fn explicit_table_is_case_sensitive() {
        // "arrendamiento" is not an explicit key; inference finds art1950.
        let ctx = context();
        assert_eq!(ctx.map_role("arrendamiento", "propietario"), "propietario");
        assert_eq!(
            ctx.map_role("arrendamiento", "obligado_mantenimiento"),
            "arrendador"
        );
    }

    const PASSIVES: &[&str] = &["comprador", "vendedor", "arrendador", "arrendatario", "fiador"];
    const ACTIONS: &[&str] = &[
        "pagar al vendedor",
        "entregar al comprador",
        "reparar para el arrendatario",
        "mantener",
        "avisar al arrendador",
        "custodiar",
    ];

    fn corpus(norms: &[(usize, usize)]) -> LegalContext {
        let normas: serde_json::Map<String, serde_json::Value> = norms
            .iter()
            .enumerate()
            .map(|(i, &(p, a))| {
                (
                    format!("n{i}"),
                    serde_json::json!({
                        "estructura": {"accion": ACTIONS[a], "pasivo": PASSIVES[p]},
                        "contexto": ["tipo"]
                    }),
                )
            })
            .collect();
        let doc = serde_json::json!({"sources": {"s": {"normas": normas}}});
        LegalContext::from_json(&doc.to_string()).unwrap()
    }

    proptest! {
        #[test]
        fn inferred_mappings_are_bidirectional(
            norms in prop::collection::vec((0..PASSIVES.len(), 0..ACTIONS.len()), 1..12)
        ) {
            let inferred = corpus(&norms).infer_role_mappings("TIPO").unwrap();
            for (key, target) in inferred.iter() {
                for value in target.values() {
                    prop_assert!(
                        inferred.contains_key(value),
                        "{key} -> {value} has no inverse entry"
                    );
                }
            }
        }
    }
}
