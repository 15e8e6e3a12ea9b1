//! Per-type generation plans.

use super::methods::determine_methods;
use crate::annotation::GenSpec;
use crate::capability::{TypeTraits, TypeUniverse};
use crate::catalog::{projection_template, standard_template};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, debug_span};

/// Methods that can fail to produce a value and need error support.
const REQUIRES_ERRORS: &[&str] = &["First", "Single", "Max", "Min", "MaxBy", "MinBy", "Average"];

/// Methods that need sort support.
const REQUIRES_SORT: &[&str] = &["Sort"];

/// Standard methods with this prefix need multi-key sort scaffolding.
const EXTENDED_SORT_PREFIX: &str = "SortBy";

/// Support module a generated file depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportRequirement {
    Errors,
    Sort,
}

impl SupportRequirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Errors => "errors",
            Self::Sort => "sort",
        }
    }
}

impl fmt::Display for SupportRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One approved (method, target type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub method: String,
    pub target: String,
}

impl Projection {
    /// Name of the generated method, e.g. `GroupByCategory`.
    pub fn method_name(&self) -> String {
        format!("{}{}", self.method, self.target)
    }
}

/// Generation instructions for one annotated type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypePlan {
    pub package: String,
    pub name: String,
    pub pointer: bool,
    pub standard_methods: Vec<String>,
    pub projections: Vec<Projection>,
    pub requirements: BTreeSet<SupportRequirement>,
    pub requires_extended_sort: bool,
}

impl TypePlan {
    pub fn new(package: impl Into<String>, spec: &GenSpec) -> Self {
        Self {
            package: package.into(),
            name: spec.name.clone(),
            pointer: spec.pointer,
            standard_methods: Vec::new(),
            projections: Vec::new(),
            requirements: BTreeSet::new(),
            requires_extended_sort: false,
        }
    }

    pub fn add_standard_method(&mut self, method: impl Into<String>) {
        self.standard_methods.push(method.into());
    }

    pub fn add_projection(&mut self, method: impl Into<String>, target: impl Into<String>) {
        self.projections.push(Projection {
            method: method.into(),
            target: target.into(),
        });
    }

    pub fn has_standard_method(&self, method: &str) -> bool {
        self.standard_methods.iter().any(|m| m == method)
    }

    pub fn has_projection(&self, method_name: &str) -> bool {
        self.projections.iter().any(|p| p.method_name() == method_name)
    }

    /// Element type as it appears in generated code.
    pub fn element_type(&self) -> String {
        if self.pointer {
            format!("&{}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Recomputes the derived requirement fields from the approved methods.
    pub fn finalize(&mut self) {
        self.requirements = support_requirements(&self.standard_methods, &self.projections);
        self.requires_extended_sort = requires_extended_sort(&self.standard_methods);
    }
}

pub fn support_requirements(
    standard_methods: &[String],
    projections: &[Projection],
) -> BTreeSet<SupportRequirement> {
    let names = standard_methods
        .iter()
        .map(String::as_str)
        .chain(projections.iter().map(|p| p.method.as_str()));

    let mut requirements = BTreeSet::new();
    for name in names {
        if REQUIRES_ERRORS.contains(&name) {
            requirements.insert(SupportRequirement::Errors);
        }
        if REQUIRES_SORT.contains(&name) {
            requirements.insert(SupportRequirement::Sort);
        }
    }
    requirements
}

pub fn requires_extended_sort(standard_methods: &[String]) -> bool {
    standard_methods
        .iter()
        .any(|m| m.starts_with(EXTENDED_SORT_PREFIX))
}

/// Builds the plan for one annotated type.
///
/// Standard methods are gated on the annotated type's capabilities and
/// projection methods on each target's. Nothing here aborts: every problem
/// becomes a diagnostic and planning continues with what is left.
pub fn plan_type<U: TypeUniverse>(
    package: &str,
    spec: &GenSpec,
    universe: &U,
    diagnostics: &mut Diagnostics,
) -> TypePlan {
    let _span = debug_span!("plan_type", name = %spec.name).entered();

    let mut plan = TypePlan::new(package, spec);
    let candidates = determine_methods(spec, diagnostics);

    match universe.resolve(&spec.name) {
        Ok(handle) => {
            let traits = universe.traits(&handle);
            debug!(?traits, "subject resolved");
            for method in &candidates.standard {
                let Some(template) = standard_template(method) else {
                    diagnostics.report(
                        DiagnosticKind::UnknownMethod,
                        &spec.name,
                        format!("unknown standard method {}", method),
                    );
                    continue;
                };
                if template.is_satisfied_by(traits) {
                    plan.add_standard_method(method.as_str());
                }
            }
        }
        Err(e) => diagnostics.report(
            DiagnosticKind::UnresolvedType,
            &spec.name,
            format!("failed to evaluate type {} ({})", spec.name, e),
        ),
    }

    if let Some(projections) = &spec.projections {
        for target in &projections.items {
            let traits = target_traits(universe, target, spec, diagnostics);
            for method in &candidates.projection {
                let Some(template) = projection_template(method) else {
                    diagnostics.report(
                        DiagnosticKind::UnknownMethod,
                        &spec.name,
                        format!("unknown projection method {}", method),
                    );
                    continue;
                };
                if template.is_satisfied_by(traits) {
                    plan.add_projection(method.as_str(), target.as_str());
                }
            }
        }
    }

    plan.finalize();
    debug!(
        standard = plan.standard_methods.len(),
        projections = plan.projections.len(),
        "type planned"
    );
    plan
}

fn target_traits<U: TypeUniverse>(
    universe: &U,
    target: &str,
    spec: &GenSpec,
    diagnostics: &mut Diagnostics,
) -> TypeTraits {
    match universe.resolve(target) {
        Ok(handle) => universe.traits(&handle),
        Err(e) => {
            diagnostics.report(
                DiagnosticKind::UnresolvedType,
                &spec.name,
                format!(
                    "unable to identify type {}, projected on {} ({})",
                    target, spec.name, e
                ),
            );
            TypeTraits::UNRESOLVED_TARGET
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::GenTag;
    use crate::capability::TypeModel;
    use crate::catalog::{projection_count, standard_count};
    use indoc::indoc;

    fn model() -> TypeModel {
        TypeModel::from_source(indoc! {"
            type Score = f64;
            struct Label { text: String }
            struct Handler { f: fn(i32) }
            type Handlers = [Handler; 7];
            type Broken = external::Missing;
        "})
        .unwrap()
    }

    fn run(spec: GenSpec) -> (TypePlan, Diagnostics) {
        let mut diags = Diagnostics::new();
        let plan = plan_type("pkg", &spec, &model(), &mut diags);
        (plan, diags)
    }

    #[test]
    fn test_numeric_subject_gets_every_standard_method() {
        let (plan, diags) = run(GenSpec::bare("Score"));
        assert!(diags.is_empty());
        assert_eq!(plan.standard_methods.len(), standard_count());
        assert!(plan.projections.is_empty());
        assert!(plan.has_standard_method("Distinct"));
        assert!(plan.has_standard_method("Sum"));
    }

    #[test]
    fn test_non_comparable_subject_loses_comparable_methods() {
        let spec = GenSpec::bare("Handler").with_methods(GenTag::new(["Distinct", "Where"]));
        let (plan, diags) = run(spec);
        assert!(diags.is_empty());
        assert_eq!(plan.standard_methods, vec!["Where"]);

        let (plan, _) = run(GenSpec::bare("Handlers"));
        assert!(!plan.has_standard_method("Distinct"));
        assert!(!plan.has_standard_method("Contains"));
        assert!(plan.has_standard_method("Each"));
    }

    #[test]
    fn test_unresolved_subject_gets_no_standard_methods() {
        let spec = GenSpec::bare("Broken").with_projections(GenTag::new(["i32"]));
        let (plan, diags) = run(spec);
        assert!(plan.standard_methods.is_empty());
        assert_eq!(plan.projections.len(), projection_count());
        assert_eq!(diags.count_of(DiagnosticKind::UnresolvedType), 1);
        assert!(diags.messages()[0].starts_with("failed to evaluate type Broken"));
    }

    #[test]
    fn test_projection_gating_uses_target_traits() {
        let spec = GenSpec::bare("Label").with_projections(GenTag::new(["Score", "Label", "Handler"]));
        let (plan, diags) = run(spec);
        assert!(diags.is_empty());

        assert!(plan.has_projection("AverageScore"));
        assert!(!plan.has_projection("AverageLabel"));
        assert!(plan.has_projection("GroupByLabel"));
        assert!(!plan.has_projection("GroupByHandler"));
        assert!(plan.has_projection("SelectHandler"));
        assert!(plan.has_standard_method("Distinct"));
    }

    #[test]
    fn test_unresolved_target_defaults_to_comparable_only() {
        let spec = GenSpec::bare("Label").with_projections(GenTag::new(["Mystery"]));
        let (plan, diags) = run(spec);
        assert_eq!(diags.count_of(DiagnosticKind::UnresolvedType), 1);
        assert!(diags.messages()[0].contains("unable to identify type Mystery, projected on Label"));
        assert!(plan.has_projection("GroupByMystery"));
        assert!(plan.has_projection("SelectMystery"));
        assert!(!plan.has_projection("SumMystery"));
        assert!(!plan.has_projection("MaxMystery"));
    }

    #[test]
    fn test_qualified_target_is_not_the_local_declaration() {
        let spec = GenSpec::bare("Label").with_projections(GenTag::new(["other::Score"]));
        let (plan, diags) = run(spec);
        assert_eq!(diags.count_of(DiagnosticKind::UnresolvedType), 1);
        assert_eq!(
            diags.messages()[0],
            "unable to identify type other::Score, projected on Label (undeclared type other::Score)"
        );
        let methods: Vec<_> = plan.projections.iter().map(|p| p.method.as_str()).collect();
        assert!(methods.contains(&"GroupBy"));
        assert!(!methods.contains(&"Average"));
        assert!(!methods.contains(&"Sum"));
    }

    #[test]
    fn test_requirements_are_sorted_and_derived() {
        let spec = GenSpec::bare("Score")
            .with_methods(GenTag::new(["Sort", "First", "Select"]))
            .with_projections(GenTag::new(["i32"]));
        let (plan, _) = run(spec);
        let reqs: Vec<_> = plan.requirements.iter().map(|r| r.as_str()).collect();
        assert_eq!(reqs, vec!["errors", "sort"]);
        assert!(!plan.requires_extended_sort);
    }

    #[test]
    fn test_projection_methods_contribute_requirements() {
        let requirements = support_requirements(
            &[],
            &[Projection {
                method: "Max".into(),
                target: "i32".into(),
            }],
        );
        assert!(requirements.contains(&SupportRequirement::Errors));
        assert!(!requirements.contains(&SupportRequirement::Sort));
    }

    #[test]
    fn test_extended_sort_follows_sort_by_prefix() {
        assert!(requires_extended_sort(&["Where".into(), "SortByDesc".into()]));
        assert!(!requires_extended_sort(&["IsSortedBy".into(), "Sort".into()]));
        assert!(!requires_extended_sort(&[]));
    }

    #[test]
    fn test_element_type_and_method_name() {
        let spec = GenSpec::bare("Label").with_pointer();
        let plan = TypePlan::new("pkg", &spec);
        assert_eq!(plan.element_type(), "&Label");
        let projection = Projection {
            method: "GroupBy".into(),
            target: "Label".into(),
        };
        assert_eq!(projection.method_name(), "GroupByLabel");
    }
}
