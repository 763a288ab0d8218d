//! Cross-references between schema norms and the corpus.

use kelsen_core::Norm;
use kelsen_core::text::eq_fold;

use crate::corpus::LegalContext;

/// Verbs that mark two actions as related when both mention one.
const KEY_VERBS: [&str; 5] = ["entregar", "pagar", "reparar", "garantizar", "transferir"];

/// Nouns that mark a scope and an object as related when both mention one.
const KEY_OBJECTS: [&str; 6] = ["bien", "producto", "precio", "pago", "servicio", "inmueble"];

impl LegalContext {
    /// Whether the norm's role is one of the roles `institution` maps to
    /// in `roleMappings`.
    pub fn validate_norm(&self, norm: &Norm, institution: &str) -> bool {
        self.role_mappings
            .get(institution)
            .is_some_and(|table| table.values().any(|target| target.contains(&norm.role)))
    }

    /// One `// Related to ...` line per corpus norm related to `norm`.
    ///
    /// A corpus norm is related when its action shares a key verb with the
    /// norm's action, its object shares a key noun with the norm's scope, or
    /// its bound party is the norm's role either directly or through
    /// [`map_role`](Self::map_role) under `contract_type`. Only sources with
    /// a name and a type, and norms with an id and an action, are cited.
    pub fn annotations(&self, norm: &Norm, contract_type: &str) -> Option<String> {
        let inferred = self.infer_role_mappings(contract_type);
        let mut out = String::new();

        for (_, source, _, candidate) in self.norms() {
            let (Some(source_name), Some(_)) = (&source.name, &source.kind) else {
                continue;
            };
            let Some(id) = &candidate.id else {
                continue;
            };
            let Some(structure) = &candidate.structure else {
                continue;
            };
            let Some(action) = &structure.action else {
                continue;
            };

            let shares_verb = KEY_VERBS
                .iter()
                .any(|v| norm.action.contains(v) && action.contains(v));
            let shares_object = match (&norm.scope, &structure.object) {
                (Some(scope), Some(object)) => KEY_OBJECTS
                    .iter()
                    .any(|o| scope.contains(o) && object.contains(o)),
                _ => false,
            };
            let same_party = structure.passive.as_deref().is_some_and(|passive| {
                eq_fold(passive, &norm.role)
                    || eq_fold(
                        &self.map_role_with(contract_type, passive, inferred.as_ref()),
                        &norm.role,
                    )
            });

            if shares_verb || shares_object || same_party {
                out.push_str(&format!("// Related to {source_name}: {id} - {action}\n"));
            }
        }

        (!out.is_empty()).then_some(out)
    }
}
