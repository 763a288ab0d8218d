//! Automated norm enrichment.
//!
//! Three tiers append generated norms to a schema, sharing one id counter
//! that starts at the next full hundred above the highest existing id:
//!
//! 1. **Domain defaults**: every entry configured for the schema's domain.
//! 2. **Universal templates**: every template for the domain, applied to
//!    every authored norm, with `%{rule_id}` and `%{rule_action}` filled in.
//! 3. **Conditional on id**: entries keyed by an authored norm's id.
//!
//! Generated norms carry a [`NormOrigin`]; an origin already present in the
//! schema is skipped, so enriching twice adds nothing the second time. When
//! the ids above the highest authored id run out, enrichment fails and the
//! schema is left as it was.

use kelsen_core::{DeonticOperator, Norm, NormOrigin, Schema};
use tracing::{debug, info};

use crate::document::{AutomatedNorms, NormTemplate};
use crate::error::ConfigError;

/// Counts of norms added per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub domain_defaults: usize,
    pub templates: usize,
    pub conditional: usize,
}

impl EnrichmentReport {
    pub fn total(&self) -> usize {
        self.domain_defaults + self.templates + self.conditional
    }
}

/// First id handed to generated norms: the next full hundred above `max_id`,
/// or `None` past `u32::MAX`.
pub fn generated_id_threshold(max_id: u32) -> Option<u32> {
    (max_id / 100 + 1).checked_mul(100)
}

fn with_reference(action: &str, reference: Option<&str>) -> String {
    match reference {
        Some(r) => format!("{action} [Ref: {r}]"),
        None => action.to_string(),
    }
}

fn instantiate(template: &NormTemplate, id: u32, action: String, origin: NormOrigin) -> Norm {
    let mut norm = Norm::new(
        id,
        template.role.clone(),
        DeonticOperator::from_keyword(&template.deontic),
        action,
    )
    .with_origin(origin);
    norm.scope = template.scope.clone();
    norm
}

struct Enricher<'s> {
    schema: &'s mut Schema,
    /// Highest id before enrichment.
    max_id: u32,
    /// `None` once `u32::MAX` has been handed out.
    next_id: Option<u32>,
    report: EnrichmentReport,
}

impl Enricher<'_> {
    fn allocate(&mut self) -> Result<u32, ConfigError> {
        let id = self.next_id.ok_or(ConfigError::IdSpaceExhausted(self.max_id))?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    fn push(&mut self, norm: Norm) -> bool {
        match self.schema.add_norm(norm) {
            Ok(added) => {
                info!(id = added.id, role = %added.role, action = %added.action, "added automated norm");
                true
            }
            // Ids come from a counter above every existing id.
            Err(e) => {
                debug!(error = %e, "skipped automated norm");
                false
            }
        }
    }

    fn domain_defaults(&mut self, config: &AutomatedNorms, domain: &str) -> Result<(), ConfigError> {
        let Some(defaults) = config.domain_defaults.get_ignore_case(domain) else {
            return Ok(());
        };
        for (index, template) in defaults.iter().enumerate() {
            let origin = NormOrigin::DomainDefault {
                domain: domain.to_string(),
                index,
            };
            if self.schema.has_origin(&origin) {
                continue;
            }
            let action = with_reference(&template.action, template.reference.as_deref());
            let id = self.allocate()?;
            if self.push(instantiate(template, id, action, origin)) {
                self.report.domain_defaults += 1;
            }
        }
        Ok(())
    }

    fn templates(
        &mut self,
        config: &AutomatedNorms,
        domain: &str,
        authored: &[(u32, String)],
    ) -> Result<(), ConfigError> {
        let Some(templates) = config.universal_templates.get_ignore_case(domain) else {
            return Ok(());
        };
        for (trigger, trigger_action) in authored {
            for (index, template) in templates.iter().enumerate() {
                let origin = NormOrigin::Template {
                    trigger: *trigger,
                    index,
                };
                if self.schema.has_origin(&origin) {
                    continue;
                }
                let action = template
                    .action
                    .replace("%{rule_id}", &trigger.to_string())
                    .replace("%{rule_action}", trigger_action);
                let id = self.allocate()?;
                if self.push(instantiate(template, id, action, origin)) {
                    self.report.templates += 1;
                }
            }
        }
        Ok(())
    }

    fn conditional(
        &mut self,
        config: &AutomatedNorms,
        authored: &[(u32, String)],
    ) -> Result<(), ConfigError> {
        for (trigger, _) in authored {
            let Some(entries) = config.conditional_on_id.get(&trigger.to_string()) else {
                continue;
            };
            for (index, template) in entries.iter().enumerate() {
                let origin = NormOrigin::Conditional {
                    trigger: *trigger,
                    index,
                };
                if self.schema.has_origin(&origin) {
                    continue;
                }
                let action = with_reference(&template.action, template.reference.as_deref());
                let id = self.allocate()?;
                if self.push(instantiate(template, id, action, origin)) {
                    self.report.conditional += 1;
                }
            }
        }
        Ok(())
    }
}

/// Apply all three tiers in order and report what was added.
///
/// Only authored norms (as they stood before this call) trigger tiers 2 and 3.
/// Fails with [`ConfigError::IdSpaceExhausted`] when the generated ids would
/// pass `u32::MAX`; `schema` is then unchanged.
pub fn apply_automated_norms(
    schema: &mut Schema,
    config: &AutomatedNorms,
) -> Result<EnrichmentReport, ConfigError> {
    let domain = schema
        .institution()
        .map(|i| i.legal_domain.clone())
        .unwrap_or_default();
    let authored: Vec<(u32, String)> = schema
        .authored_norms()
        .map(|n| (n.id, n.action.clone()))
        .collect();
    let max_id = schema.max_norm_id();

    let mut enriched = schema.clone();
    let mut enricher = Enricher {
        schema: &mut enriched,
        max_id,
        next_id: generated_id_threshold(max_id),
        report: EnrichmentReport::default(),
    };
    if !domain.is_empty() {
        enricher.domain_defaults(config, &domain)?;
        enricher.templates(config, &domain, &authored)?;
    }
    enricher.conditional(config, &authored)?;

    let report = enricher.report;
    *schema = enriched;
    info!(
        domain = %domain,
        defaults = report.domain_defaults,
        templates = report.templates,
        conditional = report.conditional,
        "enrichment complete"
    );
    Ok(report)
}
