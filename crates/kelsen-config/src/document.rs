//! The schema configuration document (`schema_config.json`).
//!
//! ```json
//! {
//!   "instituciones": ["CompraVenta"],
//!   "tipos": ["contrato"],
//!   "dominios": ["derecho-patrimonial-privado"],
//!   "roles": { "CompraVenta": ["comprador", "vendedor"] },
//!   "automated_norms": {
//!     "domain_defaults":     { "<domain>": [ <template> ] },
//!     "universal_templates": { "<domain>": [ <template> ] },
//!     "conditional_on_id":   { "<norm id>": [ <template> ] }
//!   }
//! }
//! ```
//!
//! Every key is optional; a missing key is an empty list or table.

use std::path::Path;

use kelsen_core::OrderedMap;
use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;

/// One automatically generated norm as configured.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NormTemplate {
    pub role: String,
    /// Deontic keyword (`debe`, `no-debe`, ...).
    pub deontic: String,
    /// Action text. Universal templates may use `%{rule_id}` and
    /// `%{rule_action}`.
    pub action: String,
    /// Appended to the action as ` [Ref: ...]`.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AutomatedNorms {
    #[serde(default)]
    pub domain_defaults: OrderedMap<Vec<NormTemplate>>,
    #[serde(default)]
    pub universal_templates: OrderedMap<Vec<NormTemplate>>,
    #[serde(default)]
    pub conditional_on_id: OrderedMap<Vec<NormTemplate>>,
}

impl AutomatedNorms {
    pub fn is_empty(&self) -> bool {
        self.domain_defaults.is_empty()
            && self.universal_templates.is_empty()
            && self.conditional_on_id.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaConfig {
    #[serde(default, rename = "instituciones")]
    pub institutions: Vec<String>,
    #[serde(default, rename = "tipos")]
    pub types: Vec<String>,
    #[serde(default, rename = "dominios")]
    pub domains: Vec<String>,
    /// Institution name → role vocabulary.
    #[serde(default)]
    pub roles: OrderedMap<Vec<String>>,
    #[serde(default)]
    pub automated_norms: AutomatedNorms,
}

impl SchemaConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(
            path = %path.display(),
            institutions = config.institutions.len(),
            domains = config.domains.len(),
            "loaded schema configuration"
        );
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Role vocabulary of an institution; the name matches case-insensitively.
    pub fn roles_for(&self, institution: &str) -> Option<&[String]> {
        self.roles.get_ignore_case(institution).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "instituciones": ["CompraVenta", "Arrendamiento"],
        "tipos": ["contrato", "procedimiento"],
        "dominios": ["derecho-patrimonial-privado"],
        "roles": {
            "CompraVenta": ["comprador", "vendedor"],
            "Arrendamiento": ["arrendador", "arrendatario"]
        },
        "automated_norms": {
            "domain_defaults": {
                "derecho-patrimonial-privado": [
                    {"role": "vendedor", "deontic": "debe", "action": "sanear la evicción", "reference": "Art. 1603"}
                ]
            },
            "conditional_on_id": {
                "1": [{"role": "vendedor", "deontic": "puede", "action": "emitir factura", "scope": "documento"}]
            }
        }
    }"#;

    #[test]
    fn parses_all_sections() {
        let config = SchemaConfig::from_json(SAMPLE).unwrap();
        assert_eq!(config.institutions, ["CompraVenta", "Arrendamiento"]);
        assert_eq!(config.types.len(), 2);
        assert_eq!(config.roles.keys().collect::<Vec<_>>(), ["CompraVenta", "Arrendamiento"]);
        let defaults = config
            .automated_norms
            .domain_defaults
            .get("derecho-patrimonial-privado")
            .unwrap();
        assert_eq!(defaults[0].reference.as_deref(), Some("Art. 1603"));
        assert!(config.automated_norms.universal_templates.is_empty());
        let conditional = config.automated_norms.conditional_on_id.get("1").unwrap();
        assert_eq!(conditional[0].scope.as_deref(), Some("documento"));
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let config = SchemaConfig::from_json("{}").unwrap();
        assert!(config.institutions.is_empty());
        assert!(config.roles.is_empty());
        assert!(config.automated_norms.is_empty());
    }

    #[test]
    fn role_lookup_ignores_case() {
        let config = SchemaConfig::from_json(SAMPLE).unwrap();
        assert_eq!(
            config.roles_for("compraventa"),
            Some(&["comprador".to_string(), "vendedor".to_string()][..])
        );
        assert_eq!(config.roles_for("Permuta"), None);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            SchemaConfig::from_json("{\"instituciones\": [1, 2]"),
            Err(ConfigError::Malformed(_))
        ));
        assert!(matches!(
            SchemaConfig::from_json("{\"instituciones\": \"CompraVenta\"}"),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = SchemaConfig::load(file.path()).unwrap();
        assert_eq!(config.domains, ["derecho-patrimonial-privado"]);
    }

    #[test]
    fn load_missing_file_errors() {
        let result = SchemaConfig::load(Path::new("/nonexistent/schema_config.json"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
