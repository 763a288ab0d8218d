//! Text helpers shared by the scanner, the validators, and the generator.
//!
//! Identifier derivation follows Kelsen's lexical rules: emitted names are
//! ASCII alphanumerics plus `_`, and string literals must not contain the
//! characters the Kelsen parser treats as delimiters.

/// Maximum length of the action-derived part of a string constant name.
const STRING_NAME_MAX: usize = 30;

/// Maximum length of the description-derived part of a fact identifier.
const FACT_ID_MAX: usize = 30;

/// Maximum length of a context-pass variable name.
const VAR_NAME_MAX: usize = 20;

/// Case-insensitive equality over Unicode lowercase mappings.
pub fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Case-insensitive substring test.
pub fn contains_fold(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive prefix test.
pub fn starts_with_fold(text: &str, prefix: &str) -> bool {
    let mut chars = text.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| chars.next() == Some(p))
}

/// Make free text safe to embed in a Kelsen string literal.
///
/// Drops `$ " ' , ; { % }` and replaces `( ) [ ]` with a space.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '$' | '"' | '\'' | ',' | ';' | '{' | '%' | '}'))
        .map(|c| if matches!(c, '(' | ')' | '[' | ']') { ' ' } else { c })
        .collect()
}

/// Kelsen identifiers start with a letter; put `lead` in front of a name
/// that starts with a digit.
pub fn letter_first(name: String, lead: &str) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{lead}{name}")
    } else {
        name
    }
}

/// Uppercase a role for use as a subject identifier.
pub fn subject_name(role: &str) -> String {
    role.to_uppercase()
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name of the string constant that holds a norm's action.
///
/// ASCII alphanumerics are kept, every other run collapses to a single `_`,
/// the body is capped at 30 characters, and `_{position}` is appended.
/// A leading digit gets an `accion_` prefix.
///
/// "pagar el precio", 1 → "pagar_el_precio_1"
pub fn string_name(action: &str, position: usize) -> String {
    let mut name = String::with_capacity(STRING_NAME_MAX + 4);
    for c in action.chars() {
        if name.len() >= STRING_NAME_MAX {
            break;
        }
        if c.is_ascii_alphanumeric() {
            name.push(c);
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
    }
    let body = name.trim_end_matches('_');
    letter_first(format!("{body}_{position}"), "accion_")
}

/// PascalCase stem of an asset derived from the first word of `text`.
///
/// Non-alphanumeric characters are dropped so the result is a valid
/// identifier. An empty stem becomes `Norm`, and a numeric one is prefixed
/// with it.
pub fn asset_stem(text: &str) -> String {
    let first = text.split_whitespace().next().unwrap_or_default();
    let filtered: String = first.chars().filter(char::is_ascii_alphanumeric).collect();
    if filtered.is_empty() {
        "Norm".to_string()
    } else {
        letter_first(capitalize(&filtered), "Norm")
    }
}

/// Name of the asset generated for the norm at `position` (1-based).
pub fn norm_asset_name(action: &str, position: usize) -> String {
    format!("{}Asset{position}", asset_stem(action))
}

/// Identifier of a fact: sanitized description, whitespace to `_`,
/// uppercased, capped at 30 characters, suffixed with `_{index}`, and
/// prefixed with `FACT_` when it would start with a digit.
pub fn fact_id(description: &str, index: usize) -> String {
    let body: String = sanitize(description)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '_')
        .map(|c| if c.is_whitespace() { '_' } else { c.to_ascii_uppercase() })
        .take(FACT_ID_MAX)
        .collect();
    letter_first(format!("{body}_{index}"), "FACT_")
}

/// Short lowercase variable name from the first word of a context action.
pub fn var_name(action: &str) -> String {
    let first = action.split_whitespace().next().unwrap_or_default();
    let name: String = first
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(VAR_NAME_MAX)
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() {
        "accion".to_string()
    } else {
        letter_first(name, "accion")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_helpers() {
        assert!(eq_fold("CompraVenta", "compraventa"));
        assert!(eq_fold("MÚLTIPLES", "múltiples"));
        assert!(!eq_fold("compra", "compraventa"));
        assert!(contains_fold("Pagar el PRECIO", "precio"));
        assert!(starts_with_fold("Violacion-grave", "violacion"));
        assert!(!starts_with_fold("vio", "violacion"));
    }

    #[test]
    fn sanitize_strips_and_replaces() {
        assert_eq!(sanitize("pagar $100, ya; {x}"), "pagar 100 ya x");
        assert_eq!(sanitize("entregar (bien) [a]"), "entregar  bien   a ");
        assert_eq!(sanitize("l'acte \"x\" 50%"), "lacte x 50");
    }

    #[test]
    fn string_names_collapse_runs() {
        assert_eq!(string_name("pagar el precio", 1), "pagar_el_precio_1");
        assert_eq!(string_name("indemnizar  --  daños", 3), "indemnizar_da_os_3");
        assert_eq!(string_name("  pagar.", 2), "pagar_2");
    }

    #[test]
    fn string_names_are_capped() {
        let long = "a".repeat(80);
        let name = string_name(&long, 12);
        assert_eq!(name.len(), 30 + "_12".len());
        assert!(name.ends_with("_12"));
    }

    #[test]
    fn asset_names_use_first_word() {
        assert_eq!(norm_asset_name("pagar el precio", 1), "PagarAsset1");
        assert_eq!(norm_asset_name("entregar, el bien", 2), "EntregarAsset2");
        assert_eq!(asset_stem("¿"), "Norm");
    }

    #[test]
    fn fact_ids_are_upper_snake() {
        assert_eq!(fact_id("pago realizado", 1), "PAGO_REALIZADO_1");
        let id = fact_id(&"x ".repeat(40), 2);
        assert_eq!(id.len(), 30 + 2);
    }

    #[test]
    fn var_names_are_short_and_lowercase() {
        assert_eq!(var_name("Entregar la cosa"), "entregar");
        assert_eq!(var_name("supercalifragilisticoespialidoso"), "supercalifragilistic");
        assert_eq!(var_name(""), "accion");
    }

    #[test]
    fn names_never_start_with_a_digit() {
        assert_eq!(string_name("2 pagos mensuales", 1), "accion_2_pagos_mensuales_1");
        assert_eq!(norm_asset_name("3 cuotas", 2), "Norm3Asset2");
        assert_eq!(fact_id("2 pagos", 1), "FACT_2_PAGOS_1");
        assert_eq!(var_name("30 días"), "accion30");
        assert_eq!(letter_first("art1824".into(), "n"), "art1824");
    }

    #[test]
    fn subjects_and_capitals() {
        assert_eq!(subject_name("comprador"), "COMPRADOR");
        assert_eq!(capitalize("árbol"), "Árbol");
        assert_eq!(capitalize(""), "");
    }
}
