// Export modules for library usage
pub mod annotation;
pub mod capability;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod output;
pub mod selection;
pub mod source;

// Re-export commonly used types
pub use crate::annotation::{extract_gen_spec, GenSpec, GenTag, DIRECTIVE};
pub use crate::capability::{ResolveError, TypeModel, TypeTraits, TypeUniverse};
pub use crate::catalog::{
    is_projection_method, is_standard_method, projection_count, projection_method_names,
    standard_count, standard_method_names, MethodTemplate,
};
pub use crate::config::{load_config, parse_config, CollgenConfig};
pub use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use crate::errors::{Error, Result};
pub use crate::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::selection::{
    determine_methods, plan_directory, plan_tree, plan_type, PackagePlan, PlanOptions,
    PlanReport, Projection, SupportRequirement, TypePlan,
};
pub use crate::source::{discover, parse_sources, SourceTree};
