//! Legal-context extensions.
//!
//! After the base rendering, every corpus norm whose conditions name the
//! schema's institution contributes a string constant, an asset between its
//! mapped active and passive parties, and a clause. When those parties are
//! not the institution's two canonical roles a reciprocal asset and clause
//! with the parties swapped are added too. The output ends with annotations
//! relating each authored norm to the corpus.

use std::fmt::Write;

use kelsen_context::{ContextNorm, LegalContext, LegalSource, NormStructure};
use kelsen_core::text::{eq_fold, letter_first, sanitize, subject_name, var_name};
use kelsen_core::{DeonticOperator, Schema};
use tracing::{debug, info};

use crate::classify::{AssetClassifier, AssetType, Polarity};
use crate::error::GenerateError;
use crate::render::Generator;

const BANNER: &str = "// =========================================================================";
const RULE: &str = "// -------------------------------------------------------------------------";

/// Operator for a corpus `deontico` value; anything else is an obligation.
pub fn corpus_deontic(value: Option<&str>) -> DeonticOperator {
    match value {
        Some("prohibicion") => DeonticOperator::Prohibition,
        Some("privilegio") => DeonticOperator::Privilege,
        Some("derecho") => DeonticOperator::ClaimRight,
        _ => DeonticOperator::Obligation,
    }
}

/// Resolve a corpus party against the institution's canonical roles.
fn canonical_role<'r>(role: &'r str, first: &'r str, second: &'r str) -> &'r str {
    if eq_fold(role, first) {
        first
    } else if eq_fold(role, second) {
        second
    } else {
        role
    }
}

/// Norm keys become identifiers: anything but ASCII alphanumerics is `_`,
/// and a leading digit gets a `norma_` prefix.
fn identifier(key: &str) -> String {
    let name = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    letter_first(name, "norma_")
}

fn section_header(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "{RULE}")?;
    writeln!(out, "// {title}")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)
}

impl<C: AssetClassifier> Generator<C> {
    /// Base rendering followed by the legal-context extensions and
    /// annotations.
    pub fn render_with_context(
        &self,
        schema: &Schema,
        context: &LegalContext,
    ) -> Result<String, GenerateError> {
        let mut out = self.render(schema)?;
        let institution = schema.institution().ok_or(GenerateError::MissingInstitution)?;
        let (first_role, second_role) = context.institution_roles(&institution.name);

        let mut pass = ContextPass {
            base: &out,
            institution: &institution.name,
            first_role,
            second_role,
            classifier: &self.classifier,
            defined: Vec::new(),
            stems: Vec::new(),
            strings: String::new(),
            assets: String::new(),
            clauses: String::new(),
            applied: 0,
        };
        for (source_key, source) in context.sources.iter() {
            pass.source(source_key, source)?;
        }
        let extensions = pass.finish()?;
        out.push_str(&extensions);

        annotations(&mut out, schema, context, &institution.name.to_lowercase())?;
        Ok(out)
    }
}

struct ContextPass<'a, C> {
    /// Base output, checked for string name collisions.
    base: &'a str,
    institution: &'a str,
    first_role: &'a str,
    second_role: &'a str,
    classifier: &'a C,
    /// String names defined by this pass.
    defined: Vec<String>,
    /// Asset and clause stems defined by this pass.
    stems: Vec<String>,
    strings: String,
    assets: String,
    clauses: String,
    applied: usize,
}

impl<C: AssetClassifier> ContextPass<'_, C> {
    fn source(&mut self, source_key: &str, source: &LegalSource) -> Result<(), GenerateError> {
        let mut header_written = false;
        for (norm_key, norm) in source.norms.iter() {
            let Some((id, structure, action)) = self.applicable(norm) else {
                continue;
            };
            if !header_written {
                section_header(&mut self.assets, &format!("Assets from {source_key}"))?;
                header_written = true;
            }
            self.norm(source_key, source, norm_key, id, norm, structure, action)?;
        }
        Ok(())
    }

    /// Id, structure, and action of a norm that applies to the institution.
    fn applicable<'n>(&self, norm: &'n ContextNorm) -> Option<(&'n str, &'n NormStructure, &'n str)> {
        let id = norm.id.as_deref()?;
        let structure = norm.structure.as_ref()?;
        if !structure.applies_to(self.institution) {
            return None;
        }
        let action = structure.action.as_deref()?;
        Some((id, structure, action))
    }

    /// Define a string for `action` and return its name. A name already
    /// used by the base output or by this pass gets a `legal_` prefix, then
    /// a numeric suffix.
    fn define_string(&mut self, action: &str) -> Result<String, GenerateError> {
        let var = var_name(action);
        let taken = |name: &str| {
            self.base.contains(&format!("string {name} ="))
                || self.defined.iter().any(|d| d == name)
        };
        let mut name = if taken(&var) { format!("legal_{var}") } else { var.clone() };
        let mut suffix = 2;
        while taken(&name) {
            name = format!("legal_{var}_{suffix}");
            suffix += 1;
        }
        writeln!(self.strings, "string {name} = \"{}\";", sanitize(action))?;
        self.defined.push(name.clone());
        Ok(name)
    }

    /// Stem of a norm's asset and clause names. A norm key already used by
    /// an earlier source is qualified with this source's key, then numbered.
    fn define_stem(&mut self, source_key: &str, norm_key: &str) -> String {
        let taken = |name: &str| self.stems.iter().any(|s| s == name);
        let bare = identifier(norm_key);
        let qualified = if taken(&bare) {
            identifier(&format!("{source_key}_{norm_key}"))
        } else {
            bare
        };
        let mut stem = qualified.clone();
        let mut suffix = 2;
        while taken(&stem) {
            stem = format!("{qualified}_{suffix}");
            suffix += 1;
        }
        self.stems.push(stem.clone());
        stem
    }

    #[allow(clippy::too_many_arguments)]
    fn norm(
        &mut self,
        source_key: &str,
        source: &LegalSource,
        norm_key: &str,
        id: &str,
        norm: &ContextNorm,
        structure: &NormStructure,
        action: &str,
    ) -> Result<(), GenerateError> {
        let source_name = source.name.as_deref().unwrap_or(source_key);
        let string = self.define_string(action)?;
        let deontic = corpus_deontic(structure.deontic.as_deref()).as_kelsen();
        let kind = self.classifier.object_kind(structure.object.as_deref());

        writeln!(self.assets, "// Source: {source_name} - {id}")?;
        if let Some(parent) = &norm.derived_from {
            writeln!(self.assets, "// Derived from: {parent}")?;
        }
        if !norm.context.is_empty() {
            writeln!(self.assets, "// Context: {}", norm.context.join(", "))?;
        }
        writeln!(
            self.assets,
            "// Note: Applies to {} (in conditions list)",
            self.institution
        )?;

        if let (Some(active), Some(passive)) = (&structure.active, &structure.passive) {
            let from = canonical_role(active, self.first_role, self.second_role);
            let to = canonical_role(passive, self.first_role, self.second_role);
            let stem = self.define_stem(source_key, norm_key);
            let asset = format!("{stem}Asset");
            let asset_type = AssetType(kind, Polarity::Positive);
            let (from_subject, to_subject) = (subject_name(from), subject_name(to));

            writeln!(
                self.assets,
                "asset {asset} = {asset_type}, {from_subject}, {string}, {to_subject};"
            )?;
            writeln!(
                self.clauses,
                "clause {stem}_obligation = {{ {}, {deontic}({asset}) }};",
                self.institution
            )?;

            let canonical = (eq_fold(from, self.first_role) && eq_fold(to, self.second_role))
                || (eq_fold(from, self.second_role) && eq_fold(to, self.first_role));
            if !canonical {
                writeln!(
                    self.assets,
                    "asset {asset}_Reciprocal = {asset_type}, {to_subject}, {string}, {from_subject};"
                )?;
                writeln!(
                    self.clauses,
                    "clause {stem}_obligation_reciprocal = {{ {}, {deontic}({asset}_Reciprocal) }};",
                    self.institution
                )?;
            }
        }
        writeln!(self.assets)?;

        self.applied += 1;
        debug!(source = source_name, id, "applied context norm");
        Ok(())
    }

    fn finish(self) -> Result<String, GenerateError> {
        let mut out = String::new();
        writeln!(out)?;
        writeln!(out, "{BANNER}")?;
        writeln!(out, "// LEGAL CONTEXT EXTENSIONS")?;
        writeln!(out, "{BANNER}")?;
        writeln!(out)?;
        if !self.defined.is_empty() {
            writeln!(out, "// String definitions for legal context actions")?;
            out.push_str(&self.strings);
            writeln!(out)?;
        }
        out.push_str(&self.assets);
        if !self.clauses.is_empty() {
            section_header(&mut out, "Obligation clauses from legal sources")?;
            out.push_str(&self.clauses);
        }
        info!(
            institution = self.institution,
            applied = self.applied,
            strings = self.defined.len(),
            "appended legal context extensions"
        );
        Ok(out)
    }
}

/// Append a block relating each authored norm to the corpus.
fn annotations(
    out: &mut String,
    schema: &Schema,
    context: &LegalContext,
    contract_type: &str,
) -> Result<(), GenerateError> {
    let notes: Vec<(String, String)> = schema
        .authored_norms()
        .filter_map(|norm| {
            let notes = context.annotations(norm, contract_type)?;
            let title = format!(
                "// Norm {}: {} {} {}",
                norm.id,
                norm.role,
                norm.deontic.keyword(),
                norm.action
            );
            Some((title, notes))
        })
        .collect();
    if notes.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    section_header(out, "Legal annotations")?;
    for (title, lines) in &notes {
        writeln!(out, "{title}")?;
        out.push_str(lines);
        writeln!(out)?;
    }
    debug!(norms = notes.len(), "appended legal annotations");
    Ok(())
}
