//! End-to-end planning over a directory of annotated declarations.

use collgen::{
    plan_directory, projection_count, standard_count, CollgenConfig, DiagnosticKind,
    PlanReport, SupportRequirement, TypePlan,
};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

const THINGS: &str = indoc! {r#"
    /// +gen
    pub type Thing1 = i64;

    pub type Thing2 = Thing1;

    /// +gen * methods:"Any,Where"
    pub type Thing3 = f64;

    /// +gen projections:"i32,Thing2"
    pub struct Thing4;

    /// +gen methods:"Count,GroupBy,Select,Aggregate" projections:"String,Thing4"
    pub type Thing5 = Thing4;

    /// +gen projections:"f64,Thing1,Thing4,Thing7"
    pub struct Thing6 {
        pub field: i32,
    }

    /// +gen
    pub struct Thing7 {
        pub field: fn(i32),
    }

    /// +gen
    pub type Thing8 = [Thing7; 7];
"#};

fn plan_sources(files: &[(&str, &str)]) -> PlanReport {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    plan_directory(dir.path(), &CollgenConfig::default()).unwrap()
}

fn things() -> PlanReport {
    plan_sources(&[("things.rs", THINGS)])
}

fn thing<'a>(report: &'a PlanReport, name: &str) -> &'a TypePlan {
    report
        .find_type(name)
        .unwrap_or_else(|| panic!("{} should have been selected", name))
}

fn projection_names(plan: &TypePlan) -> BTreeSet<String> {
    plan.projections.iter().map(|p| p.method_name()).collect()
}

#[test]
fn test_single_package_with_annotated_types() {
    let report = things();
    assert_eq!(report.packages.len(), 1);
    assert_eq!(report.packages[0].name, "things");

    let names: Vec<_> = report.packages[0]
        .types
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Thing1", "Thing3", "Thing4", "Thing5", "Thing6", "Thing7", "Thing8"]
    );
    assert!(report.find_type("Thing2").is_none());
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_standard_methods() {
    let report = things();

    let thing1 = thing(&report, "Thing1");
    assert!(!thing1.pointer);
    assert_eq!(thing1.standard_methods.len(), standard_count());
    assert!(thing1.projections.is_empty());

    let thing3 = thing(&report, "Thing3");
    assert!(thing3.pointer);
    assert_eq!(thing3.element_type(), "&Thing3");
    assert_eq!(thing3.standard_methods, vec!["Any", "Where"]);
    assert!(thing3.projections.is_empty());

    let thing4 = thing(&report, "Thing4");
    assert_eq!(thing4.projections.len(), 2 * projection_count());

    let thing5 = thing(&report, "Thing5");
    assert_eq!(thing5.standard_methods, vec!["Count"]);
    assert_eq!(thing5.projections.len(), 2 * 3);
}

#[test]
fn test_type_evaluation() {
    let report = things();

    let thing6 = thing(&report, "Thing6");
    let projections6 = projection_names(thing6);
    assert!(thing6.has_standard_method("Distinct"));
    assert!(projections6.contains("AverageThing1"));
    assert!(!projections6.contains("AverageThing4"));
    assert!(projections6.contains("GroupByThing4"));
    assert!(!projections6.contains("GroupByThing7"));
    assert!(projections6.contains("SelectThing7"));

    assert!(!thing(&report, "Thing7").has_standard_method("Distinct"));
    assert!(!thing(&report, "Thing8").has_standard_method("Distinct"));
}

#[test]
fn test_sort_requirements() {
    let report = things();

    let thing4 = thing(&report, "Thing4");
    assert!(thing4.requires_extended_sort);
    assert!(!thing4.has_standard_method("Sort"));
    assert!(thing4.requirements.contains(&SupportRequirement::Errors));

    let thing5 = thing(&report, "Thing5");
    assert!(!thing5.requires_extended_sort);
    assert!(thing5.requirements.is_empty());

    let thing1 = thing(&report, "Thing1");
    let requirements: Vec<_> = thing1.requirements.iter().copied().collect();
    assert_eq!(
        requirements,
        vec![SupportRequirement::Errors, SupportRequirement::Sort]
    );
}

#[test]
fn test_diagnostics_do_not_stop_planning() {
    let report = plan_sources(&[
        (
            "broken.rs",
            indoc! {r#"
                /// +gen methods:"Count,Frobnicate" projections:"Nowhere"
                pub struct Widget {
                    #[collgen(SumBy)]
                    pub weight: u32,
                }

                /// +gen
                pub type Remote = other::Type;
            "#},
        ),
        ("unparsable.rs", "pub struct {"),
    ]);

    let widget = thing(&report, "Widget");
    assert_eq!(widget.standard_methods, vec!["Count"]);
    assert!(widget.projections.is_empty());
    assert!(thing(&report, "Remote").standard_methods.is_empty());

    let kinds: Vec<_> = report.diagnostics.iter().map(|d| d.kind).collect();
    assert!(kinds.contains(&DiagnosticKind::UnknownMethod));
    assert!(kinds.contains(&DiagnosticKind::InconsistentConfiguration));
    assert!(kinds.contains(&DiagnosticKind::UnresolvedType));
    assert!(kinds.contains(&DiagnosticKind::Deprecated));
    assert!(kinds.contains(&DiagnosticKind::ParseFailure));
}

#[test]
fn test_ignore_patterns_and_legacy_switch() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("things.rs"), THINGS).unwrap();
    fs::write(
        dir.path().join("things_gen.rs"),
        "/// +gen\npub struct Generated { #[collgen(MaxBy)] pub n: u8 }\n",
    )
    .unwrap();

    let mut config = CollgenConfig::default();
    config.scan.ignore = vec!["*_gen.rs".to_string()];
    let report = plan_directory(dir.path(), &config).unwrap();
    assert!(report.find_type("Generated").is_none());
    assert!(report.diagnostics.is_empty());

    config.scan.ignore.clear();
    config.scan.legacy_tag_check = false;
    let report = plan_directory(dir.path(), &config).unwrap();
    assert!(report.find_type("Generated").is_some());
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.packages.len(), 2);
}

#[test]
fn test_missing_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent");
    assert!(plan_directory(&missing, &CollgenConfig::default()).is_err());
}
