//! Candidate method sets before capability gating.

use crate::annotation::GenSpec;
use crate::catalog::{
    is_projection_method, is_standard_method, projection_method_names, standard_method_names,
};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodBuckets {
    pub standard: Vec<String>,
    pub projection: Vec<String>,
}

/// Splits the requested methods into standard and projection candidates.
///
/// Without a `methods` tag every standard method is a candidate, and every
/// projection method is one when projection types are given. With the tag,
/// only listed names are candidates; a name counts as a projection method
/// only in the presence of a `projections` tag.
pub fn determine_methods(spec: &GenSpec, diagnostics: &mut Diagnostics) -> MethodBuckets {
    let Some(methods) = &spec.methods else {
        return MethodBuckets {
            standard: standard_method_names(),
            projection: if spec.projections.is_some() {
                projection_method_names()
            } else {
                Vec::new()
            },
        };
    };

    let mut buckets = MethodBuckets::default();
    for method in &methods.items {
        let standard = is_standard_method(method);
        let projection = spec.projections.is_some() && is_projection_method(method);

        if standard {
            buckets.standard.push(method.clone());
        }
        if projection {
            buckets.projection.push(method.clone());
        }
        if !standard && !projection {
            diagnostics.report(
                DiagnosticKind::UnknownMethod,
                &spec.name,
                format!("method {} is unknown (type {})", method, spec.name),
            );
        }
    }

    let projects_types = spec.projections.as_ref().is_some_and(|p| !p.is_empty());
    if projects_types && buckets.projection.is_empty() {
        diagnostics.report(
            DiagnosticKind::InconsistentConfiguration,
            &spec.name,
            format!(
                "you've included projection types without specifying projection methods on type {}",
                spec.name
            ),
        );
    }

    debug_assert!(
        buckets.projection.is_empty() || spec.projections.is_some(),
        "projection methods are only collected alongside projection types"
    );
    if !buckets.projection.is_empty() && spec.projections.is_none() {
        diagnostics.report(
            DiagnosticKind::InconsistentConfiguration,
            &spec.name,
            format!(
                "you've included projection methods without specifying projection types on type {}",
                spec.name
            ),
        );
    }

    buckets
}
