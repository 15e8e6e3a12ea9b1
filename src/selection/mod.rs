//! Turning annotated declarations into generation plans.

pub mod legacy;
pub mod methods;
pub mod plan;

use crate::annotation::extract_gen_spec;
use crate::capability::TypeUniverse;
use crate::config::CollgenConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::Result;
use crate::source::{discover, SourceTree};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, info_span};

pub use legacy::{check_deprecated_tags, has_legacy_tag, MIGRATION_GUIDE};
pub use methods::{determine_methods, MethodBuckets};
pub use plan::{plan_type, Projection, SupportRequirement, TypePlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanOptions {
    pub legacy_tag_check: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            legacy_tag_check: true,
        }
    }
}

impl From<&CollgenConfig> for PlanOptions {
    fn from(config: &CollgenConfig) -> Self {
        Self {
            legacy_tag_check: config.scan.legacy_tag_check,
        }
    }
}

/// Selected types of one package, in name order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagePlan {
    pub name: String,
    pub types: Vec<TypePlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub packages: Vec<PackagePlan>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PlanReport {
    pub fn type_count(&self) -> usize {
        self.packages.iter().map(|p| p.types.len()).sum()
    }

    pub fn find_type(&self, name: &str) -> Option<&TypePlan> {
        self.packages
            .iter()
            .flat_map(|p| p.types.iter())
            .find(|t| t.name == name)
    }
}

/// Plans every declared type of `tree`.
///
/// Only types carrying a `+gen` directive are selected. Packages without
/// selected types are left out.
pub fn plan_tree(
    tree: &SourceTree,
    options: &PlanOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<PackagePlan> {
    let mut packages = Vec::new();

    for package in &tree.packages {
        let mut types = Vec::new();
        for declared in &package.types {
            if options.legacy_tag_check {
                if let Ok(handle) = tree.model.resolve(&declared.name) {
                    check_deprecated_tags(&tree.model, &handle, &declared.name, diagnostics);
                }
            }

            let Some(spec) = extract_gen_spec(&declared.doc, &declared.name) else {
                continue;
            };
            debug!(package = %package.name, name = %spec.name, "selected type");
            types.push(plan_type(&package.name, &spec, &tree.model, diagnostics));
        }

        if !types.is_empty() {
            packages.push(PackagePlan {
                name: package.name.clone(),
                types,
            });
        }
    }

    packages
}

/// Discovers and plans the sources directly inside `dir`.
pub fn plan_directory(dir: &Path, config: &CollgenConfig) -> Result<PlanReport> {
    let _span = info_span!("plan_directory", dir = %dir.display()).entered();

    config.scan.validate()?;
    let mut diagnostics = Diagnostics::new();
    let tree = discover(dir, config.scan.ignore.clone(), &mut diagnostics)?;
    let packages = plan_tree(&tree, &PlanOptions::from(config), &mut diagnostics);

    let report = PlanReport {
        packages,
        diagnostics: diagnostics.into_vec(),
    };
    info!(
        types = report.type_count(),
        diagnostics = report.diagnostics.len(),
        "planning complete"
    );
    Ok(report)
}
