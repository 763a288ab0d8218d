//! Base Kelsen rendering.
//!
//! Sections are written in a fixed order: string constants, subjects, the
//! institution asset, one asset and clause per norm, violation clauses,
//! facts, and agendas. Norms are numbered by their 1-based position in the
//! schema, and every name derived from a norm carries that position.

use std::fmt::Write;

use kelsen_context::LegalContext;
use kelsen_core::text::{
    asset_stem, capitalize, fact_id, norm_asset_name, sanitize, string_name, subject_name,
};
use kelsen_core::{Condition, Institution, Norm, Relief, Schema, ViolatedNorms, Violation};
use tracing::{debug, warn};

use crate::classify::{AssetClassifier, AssetKind, AssetType, KeywordClassifier, Polarity};
use crate::error::GenerateError;

/// Subject used when the schema has fewer than two roles.
pub(crate) const PLACEHOLDER: &str = "PLACEHOLDER";

/// Render `schema` with the keyword classifier.
pub fn generate(schema: &Schema) -> Result<String, GenerateError> {
    Generator::new(KeywordClassifier).render(schema)
}

/// Render `schema` followed by the legal-context extensions.
pub fn generate_with_context(schema: &Schema, context: &LegalContext) -> Result<String, GenerateError> {
    Generator::new(KeywordClassifier).render_with_context(schema, context)
}

/// Schema renderer, parameterised by how assets are typed.
#[derive(Debug, Clone, Default)]
pub struct Generator<C = KeywordClassifier> {
    pub(crate) classifier: C,
}

impl<C: AssetClassifier> Generator<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn render(&self, schema: &Schema) -> Result<String, GenerateError> {
        let institution = schema.institution().ok_or(GenerateError::MissingInstitution)?;
        let mut pass = BasePass {
            schema,
            institution,
            roles: schema.roles(),
            classifier: &self.classifier,
            out: String::new(),
        };
        pass.strings()?;
        pass.subjects()?;
        pass.base_asset()?;
        pass.norms()?;
        pass.violations()?;
        pass.facts()?;
        pass.agendas()?;
        debug!(
            norms = schema.norms().len(),
            violations = schema.violations().len(),
            facts = schema.facts().len(),
            agendas = schema.agendas().len(),
            bytes = pass.out.len(),
            "rendered schema"
        );
        Ok(pass.out)
    }
}

struct BasePass<'a, C> {
    schema: &'a Schema,
    institution: &'a Institution,
    /// Distinct roles in first-seen order.
    roles: Vec<&'a str>,
    classifier: &'a C,
    out: String,
}

impl<C: AssetClassifier> BasePass<'_, C> {
    fn base_string(&self) -> String {
        self.institution.name.to_lowercase()
    }

    /// Counterparty of `role`: the other of the first two roles.
    fn target(&self, role: &str) -> String {
        match self.roles.as_slice() {
            [first, second, ..] if subject_name(first) == subject_name(role) => subject_name(second),
            [first, _, ..] => subject_name(first),
            _ => PLACEHOLDER.to_string(),
        }
    }

    /// Asset name of the norm with identifier `id`, if it exists.
    fn asset_of(&self, id: u32) -> Option<String> {
        let position = self.schema.norm_position(id)?;
        let norm = self.schema.norm(id)?;
        Some(norm_asset_name(&norm.action, position))
    }

    fn strings(&mut self) -> Result<(), GenerateError> {
        let base = self.base_string();
        writeln!(self.out, "// String definitions for actions")?;
        writeln!(self.out, "string {base} = \"acuerda {base}\";")?;
        for (position, norm) in (1..).zip(self.schema.norms()) {
            writeln!(
                self.out,
                "string {} = \"{}\";",
                string_name(&norm.action, position),
                sanitize(&norm.action)
            )?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn subjects(&mut self) -> Result<(), GenerateError> {
        writeln!(self.out, "// Subject declarations")?;
        for role in &self.roles {
            writeln!(
                self.out,
                "subject {} = \"Placeholder {role}\", \"Placeholder address\", 12345678, \"placeholder{role}@example.com\";",
                subject_name(role)
            )?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn base_asset(&mut self) -> Result<(), GenerateError> {
        let (from, to) = match self.roles.as_slice() {
            [first, second, ..] => (subject_name(first), subject_name(second)),
            _ => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
        };
        writeln!(self.out, "// Base contract asset")?;
        writeln!(
            self.out,
            "asset {} = Service, +, {from}, {}, {to};",
            self.institution.name,
            self.base_string()
        )?;
        writeln!(self.out)?;
        Ok(())
    }

    fn norms(&mut self) -> Result<(), GenerateError> {
        writeln!(self.out, "// Norm assets")?;
        let schema = self.schema;
        for (position, norm) in (1..).zip(schema.norms()) {
            self.norm(norm, position)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn norm(&mut self, norm: &Norm, position: usize) -> Result<(), GenerateError> {
        let asset = norm_asset_name(&norm.action, position);
        let subject = subject_name(&norm.role);
        let target = self.target(&norm.role);
        let kind = self.classifier.norm_kind(norm);
        let polarity = self.classifier.polarity(&norm.action);
        writeln!(
            self.out,
            "asset {asset} = {}, {subject}, {}, {target};",
            AssetType(kind, polarity),
            string_name(&norm.action, position)
        )?;

        let mut premises = vec![self.institution.name.clone()];
        let mut text_conditions = 0;
        for condition in &norm.conditions {
            match condition {
                Condition::NormReference(id) => match self.asset_of(*id) {
                    Some(referenced) => premises.push(referenced),
                    None => warn!(norm = norm.id, referenced = id, "condition references unknown norm"),
                },
                Condition::Text(text) => {
                    text_conditions += 1;
                    let suffix = if text_conditions == 1 {
                        String::new()
                    } else {
                        format!("_{text_conditions}")
                    };
                    writeln!(self.out, "// Conditional norm")?;
                    writeln!(
                        self.out,
                        "string condition{position}{suffix} = \"{}\";",
                        sanitize(text)
                    )?;
                    writeln!(
                        self.out,
                        "asset Condition{position}{suffix} = Service, +, {subject}, condition{position}{suffix}, {target};"
                    )?;
                    premises.push(format!("Condition{position}{suffix}"));
                }
            }
        }

        writeln!(
            self.out,
            "clause norm{position} = {{ {}, {}({asset}) }};",
            premises.join(" AND "),
            norm.deontic.as_kelsen()
        )?;
        Ok(())
    }

    fn violations(&mut self) -> Result<(), GenerateError> {
        let schema = self.schema;
        if schema.violations().is_empty() {
            return Ok(());
        }
        writeln!(self.out, "// Violation clauses")?;
        for (index, violation) in (1..).zip(schema.violations()) {
            self.violation(violation, index)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn violation(&mut self, violation: &Violation, index: usize) -> Result<(), GenerateError> {
        let assets: Option<Vec<String>> = violation
            .norms
            .ids()
            .into_iter()
            .map(|id| self.asset_of(id))
            .collect();
        let Some(assets) = assets else {
            warn!(norms = ?violation.norms.ids(), "violation references unknown norm");
            return Ok(());
        };

        let (string, asset, clause) = match violation.norms {
            ViolatedNorms::Single(_) => (
                format!("violation_string_{index}"),
                format!("{}Consequence{index}", asset_stem(&violation.consequence)),
                format!("viol_clause_{index}"),
            ),
            ViolatedNorms::Compound(first, second) => {
                writeln!(self.out, "// Compound violation for norms {first} and {second}")?;
                (
                    format!("compound_violation_string_{index}"),
                    format!("{}CompoundConsequence{index}", asset_stem(&violation.consequence)),
                    format!("compound_viol_clause_{index}"),
                )
            }
        };
        let premise = assets
            .iter()
            .map(|a| format!("not({a})"))
            .collect::<Vec<_>>()
            .join(" AND ");

        writeln!(self.out, "string {string} = \"{}\";", sanitize(&violation.consequence))?;
        writeln!(
            self.out,
            "asset {asset} = {}, {}, {string}, {};",
            AssetType(AssetKind::Service, Polarity::Positive),
            subject_name(&violation.role),
            self.target(&violation.role)
        )?;
        writeln!(
            self.out,
            "clause {clause} = {{ {premise}, {}({asset}) }};",
            violation.deontic.as_kelsen()
        )?;
        Ok(())
    }

    /// Asset of the first norm whose action appears in `description`,
    /// else the institution asset.
    fn related_asset(&self, description: &str) -> String {
        (1..)
            .zip(self.schema.norms())
            .find(|(_, n)| !n.action.is_empty() && description.contains(n.action.as_str()))
            .map(|(position, n)| norm_asset_name(&n.action, position))
            .unwrap_or_else(|| self.institution.name.clone())
    }

    fn facts(&mut self) -> Result<(), GenerateError> {
        let schema = self.schema;
        if schema.facts().is_empty() {
            return Ok(());
        }
        writeln!(self.out, "// Facts")?;
        for (index, fact) in (1..).zip(schema.facts()) {
            let related = self.related_asset(&fact.description);
            writeln!(
                self.out,
                "fact {} = {related}, \"{}\", \"{}\";",
                fact_id(&fact.description, index),
                sanitize(&fact.description),
                sanitize(&fact.evidence)
            )?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn agendas(&mut self) -> Result<(), GenerateError> {
        let schema = self.schema;
        if schema.agendas().is_empty() {
            return Ok(());
        }
        writeln!(self.out, "// Agendas")?;
        for (index, agenda) in (1..).zip(schema.agendas()) {
            write!(
                self.out,
                "agenda {}{}{index} = {} {{{}",
                capitalize(&agenda.requesting_role),
                agenda.compliance.label(),
                agenda.compliance.as_kelsen(),
                self.institution.name
            )?;
            match &agenda.relief {
                Relief::Essential => {
                    for (position, norm) in (1..).zip(schema.norms()) {
                        write!(self.out, ", {}", norm_asset_name(&norm.action, position))?;
                    }
                    writeln!(self.out, "}};")?;
                }
                Relief::Remedies(remedies) => {
                    for remedy in remedies {
                        write!(self.out, "\n    // {remedy}")?;
                    }
                    writeln!(self.out, "\n}};")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelsen_core::{
        Agenda, ComplianceType, DeonticOperator, LegalFact, Multiplicity, parse_schema,
    };

    fn compraventa() -> Schema {
        let mut schema = Schema::new();
        schema.set_institution(Institution::new(
            "CompraVenta",
            "contrato",
            Multiplicity::Multiple,
            "derecho-patrimonial-privado",
        ));
        schema
            .add_norm(Norm::new(1, "comprador", DeonticOperator::Obligation, "pagar el precio"))
            .unwrap();
        schema
    }

    fn with_seller(mut schema: Schema) -> Schema {
        schema
            .add_norm(
                Norm::new(2, "vendedor", DeonticOperator::Obligation, "entregar el inmueble")
                    .with_scope("inmueble")
                    .with_condition(Condition::NormReference(1)),
            )
            .unwrap();
        schema
    }

    #[test]
    fn role_spellings_share_one_subject() {
        let mut schema = with_seller(compraventa());
        schema
            .add_norm(Norm::new(3, "Comprador", DeonticOperator::Obligation, "recibir la cosa"))
            .unwrap();
        let out = generate(&schema).unwrap();
        assert_eq!(out.matches("subject COMPRADOR =").count(), 1, "{out}");
        assert_eq!(out.matches("subject VENDEDOR =").count(), 1, "{out}");
        assert!(out.contains(
            "asset RecibirAsset3 = Service, +, COMPRADOR, recibir_la_cosa_3, VENDEDOR;\n"
        ), "{out}");
    }

    #[test]
    fn single_norm_scenario() {
        let out = generate(&compraventa()).unwrap();
        assert!(out.contains("string compraventa = \"acuerda compraventa\";\n"), "{out}");
        assert!(out.contains("string pagar_el_precio_1 = \"pagar el precio\";\n"), "{out}");
        assert!(out.contains(
            "subject COMPRADOR = \"Placeholder comprador\", \"Placeholder address\", 12345678, \"placeholdercomprador@example.com\";\n"
        ));
        assert!(out.contains("asset CompraVenta = Service, +, PLACEHOLDER, compraventa, PLACEHOLDER;\n"));
        assert!(out.contains(
            "asset PagarAsset1 = Service, +, COMPRADOR, pagar_el_precio_1, PLACEHOLDER;\n"
        ));
        assert!(out.contains("clause norm1 = { CompraVenta, OB(PagarAsset1) };\n"));
        assert!(!out.contains("// Violation clauses"));
        assert!(!out.contains("// Agendas"));
    }

    #[test]
    fn sections_in_order() {
        let out = generate(&with_seller(compraventa())).unwrap();
        let at = |needle: &str| out.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
        assert!(at("// String definitions") < at("// Subject declarations"));
        assert!(at("// Subject declarations") < at("// Base contract asset"));
        assert!(at("// Base contract asset") < at("// Norm assets"));
    }

    #[test]
    fn property_assets_and_norm_reference_conditions() {
        let out = generate(&with_seller(compraventa())).unwrap();
        assert!(out.contains("asset CompraVenta = Service, +, COMPRADOR, compraventa, VENDEDOR;\n"));
        assert!(out.contains(
            "asset PagarAsset1 = Service, +, COMPRADOR, pagar_el_precio_1, VENDEDOR;\n"
        ));
        assert!(out.contains(
            "asset EntregarAsset2 = Property, NM, VENDEDOR, entregar_el_inmueble_2, COMPRADOR;\n"
        ), "{out}");
        assert!(out.contains(
            "clause norm2 = { CompraVenta AND PagarAsset1, OB(EntregarAsset2) };\n"
        ));
    }

    #[test]
    fn text_conditions_declare_their_own_assets() {
        let mut schema = compraventa();
        schema
            .add_norm(
                Norm::new(2, "vendedor", DeonticOperator::Prohibition, "no ceder el contrato")
                    .with_condition(Condition::Text("exista (deuda)".into()))
                    .with_condition(Condition::Text("haya aviso".into())),
            )
            .unwrap();
        let out = generate(&schema).unwrap();
        assert!(out.contains(
            "// Conditional norm\nstring condition2 = \"exista  deuda \";\nasset Condition2 = Service, +, VENDEDOR, condition2, COMPRADOR;\n"
        ), "{out}");
        assert!(out.contains("asset Condition2_2 = Service, +, VENDEDOR, condition2_2, COMPRADOR;\n"));
        assert!(out.contains("asset NoAsset2 = Service, -, VENDEDOR, no_ceder_el_contrato_2, COMPRADOR;\n"));
        assert!(out.contains(
            "clause norm2 = { CompraVenta AND Condition2 AND Condition2_2, PR(NoAsset2) };\n"
        ));
    }

    #[test]
    fn unknown_condition_reference_is_dropped() {
        let mut schema = compraventa();
        schema
            .add_norm(
                Norm::new(2, "vendedor", DeonticOperator::Obligation, "entregar")
                    .with_condition(Condition::NormReference(9)),
            )
            .unwrap();
        let out = generate(&schema).unwrap();
        assert!(out.contains("clause norm2 = { CompraVenta, OB(EntregarAsset2) };\n"));
    }

    #[test]
    fn single_violation_scenario() {
        let mut schema = compraventa();
        schema.add_violation(Violation {
            norms: ViolatedNorms::Single(1),
            role: "vendedor".into(),
            deontic: DeonticOperator::ClaimRight,
            consequence: "indemnizar daños".into(),
        });
        let out = generate(&schema).unwrap();
        assert!(out.contains("// Violation clauses\n"));
        assert!(out.contains("string violation_string_1 = \"indemnizar daños\";\n"));
        assert!(out.contains(
            "asset IndemnizarConsequence1 = Service, +, VENDEDOR, violation_string_1, COMPRADOR;\n"
        ), "{out}");
        assert!(out.contains(
            "clause viol_clause_1 = { not(PagarAsset1), CR(IndemnizarConsequence1) };\n"
        ));
    }

    #[test]
    fn compound_violation_conjoins_both_norms() {
        let mut schema = with_seller(compraventa());
        schema.add_violation(Violation {
            norms: ViolatedNorms::Compound(1, 2),
            role: "juez".into(),
            deontic: DeonticOperator::Obligation,
            consequence: "resolver el contrato".into(),
        });
        let out = generate(&schema).unwrap();
        assert!(out.contains("// Compound violation for norms 1 and 2\n"));
        assert!(out.contains("string compound_violation_string_1 = \"resolver el contrato\";\n"));
        assert!(out.contains(
            "asset ResolverCompoundConsequence1 = Service, +, JUEZ, compound_violation_string_1, COMPRADOR;\n"
        ));
        assert!(out.contains(
            "clause compound_viol_clause_1 = { not(PagarAsset1) AND not(EntregarAsset2), OB(ResolverCompoundConsequence1) };\n"
        ));
    }

    #[test]
    fn violation_of_unknown_norm_is_skipped() {
        let mut schema = compraventa();
        schema.add_violation(Violation {
            norms: ViolatedNorms::Single(7),
            role: "vendedor".into(),
            deontic: DeonticOperator::ClaimRight,
            consequence: "indemnizar".into(),
        });
        let out = generate(&schema).unwrap();
        assert!(out.contains("// Violation clauses\n"));
        assert!(!out.contains("viol_clause_1"));
    }

    #[test]
    fn violation_names_norm_by_position() {
        let mut schema = Schema::new();
        schema.set_institution(Institution::new("Mutuo", "contrato", Multiplicity::Multiple, ""));
        schema
            .add_norm(Norm::new(5, "deudor", DeonticOperator::Obligation, "devolver el dinero"))
            .unwrap();
        schema.add_violation(Violation {
            norms: ViolatedNorms::Single(5),
            role: "acreedor".into(),
            deontic: DeonticOperator::ClaimRight,
            consequence: "cobrar intereses".into(),
        });
        let out = generate(&schema).unwrap();
        assert!(out.contains("clause viol_clause_1 = { not(DevolverAsset1), CR(CobrarConsequence1) };\n"));
    }

    #[test]
    fn facts_link_to_related_norm() {
        let mut schema = compraventa();
        schema.add_fact(LegalFact {
            description: "consta pagar el precio total".into(),
            evidence: "recibo \"firmado\"".into(),
        });
        schema.add_fact(LegalFact {
            description: "entrega, realizada".into(),
            evidence: "acta".into(),
        });
        let out = generate(&schema).unwrap();
        assert!(out.contains(
            "fact CONSTA_PAGAR_EL_PRECIO_TOTAL_1 = PagarAsset1, \"consta pagar el precio total\", \"recibo firmado\";\n"
        ), "{out}");
        assert!(out.contains(
            "fact ENTREGA_REALIZADA_2 = CompraVenta, \"entrega realizada\", \"acta\";\n"
        ), "{out}");
    }

    #[test]
    fn agendas_list_assets_or_remedies() {
        let mut schema = with_seller(compraventa());
        schema.add_agenda(Agenda {
            requesting_role: "vendedor".into(),
            compliance: ComplianceType::Fulfilled,
            institution: "CompraVenta".into(),
            beneficiary_role: "vendedor".into(),
            relief: Relief::Essential,
        });
        schema.add_agenda(Agenda {
            requesting_role: "comprador".into(),
            compliance: ComplianceType::Breached,
            institution: "CompraVenta".into(),
            beneficiary_role: "juez".into(),
            relief: Relief::Remedies(vec!["resolver".into(), "indemnizar".into()]),
        });
        let out = generate(&schema).unwrap();
        assert!(out.contains(
            "agenda VendedorFulfillment1 = FULFILL {CompraVenta, PagarAsset1, EntregarAsset2};\n"
        ), "{out}");
        assert!(out.ends_with(
            "agenda CompradorBreach2 = BREACH {CompraVenta\n    // resolver\n    // indemnizar\n};\n"
        ), "{out}");
    }

    #[test]
    fn missing_institution_is_an_error() {
        let result = generate(&Schema::new());
        assert!(matches!(result, Err(GenerateError::MissingInstitution)));
    }

    #[test]
    fn custom_classifier_is_used() {
        struct AllProperty;
        impl AssetClassifier for AllProperty {
            fn norm_kind(&self, _: &Norm) -> AssetKind {
                AssetKind::MovableProperty
            }
            fn polarity(&self, _: &str) -> Polarity {
                Polarity::Positive
            }
            fn object_kind(&self, _: Option<&str>) -> AssetKind {
                AssetKind::MovableProperty
            }
        }
        let out = Generator::new(AllProperty).render(&compraventa()).unwrap();
        assert!(out.contains("asset PagarAsset1 = Property, M, COMPRADOR, pagar_el_precio_1, PLACEHOLDER;\n"));
    }

    #[test]
    fn parsed_and_enriched_schema_renders() {
        let mut schema = parse_schema(
            "[Institution] CompraVenta contrato múltiples derecho-patrimonial-privado\n\
             1. el-comprador debe \"pagar el precio\"\n\
             violacion 1 entonces vendedor \"indemnizar daños\"\n",
        )
        .unwrap();
        let config = kelsen_config::SchemaConfig::from_json(
            r#"{"automated_norms": {"conditional_on_id": {
                "1": [{"role": "vendedor", "deontic": "debe", "action": "emitir factura", "reference": "Art. 29"}]
            }}}"#,
        )
        .unwrap();
        kelsen_config::apply_automated_norms(&mut schema, &config.automated_norms).unwrap();

        let out = generate(&schema).unwrap();
        assert!(out.contains("clause norm1 = { CompraVenta, OB(PagarAsset1) };\n"));
        assert!(out.contains("string emitir_factura_Ref_Art_29_2 = \"emitir factura  Ref: Art. 29 \";\n"), "{out}");
        assert!(out.contains("clause norm2 = { CompraVenta, OB(EmitirAsset2) };\n"));
        assert!(out.contains(
            "clause viol_clause_1 = { not(PagarAsset1), CR(IndemnizarConsequence1) };\n"
        ));
    }
}
