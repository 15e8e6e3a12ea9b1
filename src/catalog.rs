//! Registries of the generated collection operations.
//!
//! Each entry states which capabilities its element type must have. A flag
//! that is `false` never excludes a method. Standard methods are gated on the
//! annotated type itself; projection methods are gated on each projection
//! target.

use crate::capability::TypeTraits;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MethodTemplate {
    pub name: &'static str,
    pub requires_numeric: bool,
    pub requires_comparable: bool,
    pub requires_ordered: bool,
}

impl MethodTemplate {
    const fn plain(name: &'static str) -> Self {
        Self {
            name,
            requires_numeric: false,
            requires_comparable: false,
            requires_ordered: false,
        }
    }

    const fn numeric(name: &'static str) -> Self {
        Self {
            requires_numeric: true,
            ..Self::plain(name)
        }
    }

    const fn comparable(name: &'static str) -> Self {
        Self {
            requires_comparable: true,
            ..Self::plain(name)
        }
    }

    const fn ordered(name: &'static str) -> Self {
        Self {
            requires_ordered: true,
            ..Self::plain(name)
        }
    }

    /// True when every capability this method requires is present.
    pub fn is_satisfied_by(&self, traits: TypeTraits) -> bool {
        (!self.requires_numeric || traits.numeric)
            && (!self.requires_comparable || traits.comparable)
            && (!self.requires_ordered || traits.ordered)
    }

    /// Short requirement summary, e.g. `comparable` or `-`.
    pub fn requirement_label(&self) -> String {
        let labels: Vec<&str> = [
            (self.requires_numeric, "numeric"),
            (self.requires_comparable, "comparable"),
            (self.requires_ordered, "ordered"),
        ]
        .into_iter()
        .filter_map(|(required, label)| required.then_some(label))
        .collect();

        if labels.is_empty() {
            "-".to_string()
        } else {
            labels.join(", ")
        }
    }
}

const STANDARD: &[MethodTemplate] = &[
    MethodTemplate::plain("All"),
    MethodTemplate::plain("Any"),
    MethodTemplate::numeric("Average"),
    MethodTemplate::comparable("Contains"),
    MethodTemplate::plain("Count"),
    MethodTemplate::comparable("Distinct"),
    MethodTemplate::plain("DistinctBy"),
    MethodTemplate::plain("Each"),
    MethodTemplate::plain("First"),
    MethodTemplate::ordered("IsSorted"),
    MethodTemplate::plain("IsSortedBy"),
    MethodTemplate::plain("IsSortedByDesc"),
    MethodTemplate::ordered("IsSortedDesc"),
    MethodTemplate::ordered("Max"),
    MethodTemplate::plain("MaxBy"),
    MethodTemplate::ordered("Min"),
    MethodTemplate::plain("MinBy"),
    MethodTemplate::plain("Single"),
    MethodTemplate::ordered("Sort"),
    MethodTemplate::plain("SortBy"),
    MethodTemplate::plain("SortByDesc"),
    MethodTemplate::ordered("SortDesc"),
    MethodTemplate::numeric("Sum"),
    MethodTemplate::plain("Where"),
];

const PROJECTION: &[MethodTemplate] = &[
    MethodTemplate::plain("Aggregate"),
    MethodTemplate::numeric("Average"),
    MethodTemplate::comparable("GroupBy"),
    MethodTemplate::ordered("Max"),
    MethodTemplate::ordered("Min"),
    MethodTemplate::plain("Select"),
    MethodTemplate::numeric("Sum"),
];

static STANDARD_TEMPLATES: Lazy<BTreeMap<&'static str, MethodTemplate>> =
    Lazy::new(|| STANDARD.iter().map(|t| (t.name, *t)).collect());

static PROJECTION_TEMPLATES: Lazy<BTreeMap<&'static str, MethodTemplate>> =
    Lazy::new(|| PROJECTION.iter().map(|t| (t.name, *t)).collect());

pub fn standard_template(name: &str) -> Option<&'static MethodTemplate> {
    STANDARD_TEMPLATES.get(name)
}

pub fn projection_template(name: &str) -> Option<&'static MethodTemplate> {
    PROJECTION_TEMPLATES.get(name)
}

pub fn is_standard_method(name: &str) -> bool {
    STANDARD_TEMPLATES.contains_key(name)
}

pub fn is_projection_method(name: &str) -> bool {
    PROJECTION_TEMPLATES.contains_key(name)
}

/// Every standard method name, sorted.
pub fn standard_method_names() -> Vec<String> {
    STANDARD_TEMPLATES.keys().map(|k| k.to_string()).collect()
}

/// Every projection method name, sorted.
pub fn projection_method_names() -> Vec<String> {
    PROJECTION_TEMPLATES.keys().map(|k| k.to_string()).collect()
}

pub fn standard_templates() -> impl Iterator<Item = &'static MethodTemplate> {
    STANDARD_TEMPLATES.values()
}

pub fn projection_templates() -> impl Iterator<Item = &'static MethodTemplate> {
    PROJECTION_TEMPLATES.values()
}

pub fn standard_count() -> usize {
    STANDARD_TEMPLATES.len()
}

pub fn projection_count() -> usize {
    PROJECTION_TEMPLATES.len()
}

/// Both registries in name order, as printed by `collgen catalog`.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    pub standard: Vec<MethodTemplate>,
    pub projection: Vec<MethodTemplate>,
}

pub fn listing() -> CatalogListing {
    CatalogListing {
        standard: standard_templates().copied().collect(),
        projection: projection_templates().copied().collect(),
    }
}
