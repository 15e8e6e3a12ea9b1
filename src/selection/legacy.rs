//! Warnings for the retired per-field annotation.
//!
//! Custom methods used to be requested with a field attribute such as
//! `#[collgen(SumBy)]`. Those attributes are no longer honored; each one is
//! reported so it can be moved into the type's `+gen` directive.

use crate::capability::TypeUniverse;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIGRATION_GUIDE: &str = "MIGRATING.md";

static LEGACY_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\s*\[\s*collgen\s*[(=]").unwrap());

pub fn has_legacy_tag(raw_tag: &str) -> bool {
    LEGACY_ATTRIBUTE.is_match(raw_tag)
}

/// Reports every field of a struct handle that still carries the legacy
/// attribute. Non-struct handles have no fields and report nothing.
pub fn check_deprecated_tags<U: TypeUniverse>(
    universe: &U,
    handle: &U::Handle,
    type_name: &str,
    diagnostics: &mut Diagnostics,
) {
    for field in universe
        .fields(handle)
        .into_iter()
        .filter(|f| has_legacy_tag(&f.raw_tag))
    {
        diagnostics.report(
            DiagnosticKind::Deprecated,
            type_name,
            format!(
                "custom methods ({} on {}) have been deprecated, see {}",
                field.raw_tag, field.name, MIGRATION_GUIDE
            ),
        );
    }
}
