//! Asset typing.
//!
//! Kelsen assets are either services, which carry a polarity, or movable
//! or non-movable property, which do not. The generator asks an
//! [`AssetClassifier`] for both; [`KeywordClassifier`] decides by keyword
//! search and can be replaced by any other table.

use std::fmt;

use kelsen_core::Norm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Service,
    MovableProperty,
    NonMovableProperty,
}

impl AssetKind {
    pub fn as_kelsen(&self) -> &'static str {
        match self {
            Self::Service => "Service",
            Self::MovableProperty => "Property, M",
            Self::NonMovableProperty => "Property, NM",
        }
    }

    pub fn is_property(&self) -> bool {
        !matches!(self, Self::Service)
    }
}

/// Direction of a service: performing (`+`) or refraining (`-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn as_kelsen(&self) -> &'static str {
        match self {
            Self::Positive => "+",
            Self::Negative => "-",
        }
    }
}

/// The type part of an asset declaration, e.g. `Service, +` or `Property, NM`.
pub struct AssetType(pub AssetKind, pub Polarity);

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            AssetKind::Service => write!(f, "Service, {}", self.1.as_kelsen()),
            kind => f.write_str(kind.as_kelsen()),
        }
    }
}

pub trait AssetClassifier {
    /// Kind of the asset generated for a schema norm.
    fn norm_kind(&self, norm: &Norm) -> AssetKind;

    /// Polarity of a service described by `action`.
    fn polarity(&self, action: &str) -> Polarity;

    /// Kind of the asset generated for a corpus norm with this object.
    fn object_kind(&self, object: Option<&str>) -> AssetKind;
}

/// Keyword search over scope, action, and object text. Matches are
/// case-sensitive substrings.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

const SCOPE_NON_MOVABLE: &[&str] = &["inmueble"];
const SCOPE_MOVABLE: &[&str] = &["propiedad"];
const OMISSION: &[&str] = &["no ", "abstenerse", "evitar"];
const OBJECT_NON_MOVABLE: &[&str] = &["inmueble", "propiedad", "bien"];
const OBJECT_MOVABLE: &[&str] = &["documento", "precio", "pago"];

fn mentions(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

impl AssetClassifier for KeywordClassifier {
    fn norm_kind(&self, norm: &Norm) -> AssetKind {
        match norm.scope.as_deref() {
            Some(scope) if mentions(scope, SCOPE_NON_MOVABLE) => {
                AssetKind::NonMovableProperty
            }
            Some(scope) if mentions(scope, SCOPE_MOVABLE) => AssetKind::MovableProperty,
            _ => AssetKind::Service,
        }
    }

    fn polarity(&self, action: &str) -> Polarity {
        if mentions(action, OMISSION) {
            Polarity::Negative
        } else {
            Polarity::Positive
        }
    }

    fn object_kind(&self, object: Option<&str>) -> AssetKind {
        match object {
            Some(o) if mentions(o, OBJECT_NON_MOVABLE) => AssetKind::NonMovableProperty,
            Some(o) if mentions(o, OBJECT_MOVABLE) => AssetKind::MovableProperty,
            _ => AssetKind::Service,
        }
    }
}
