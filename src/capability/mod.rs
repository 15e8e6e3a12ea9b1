//! Capability classification of element types.
//!
//! The selection engine only needs three structural facts about a type:
//! whether it is numeric, whether equality is well defined for it, and
//! whether it has a total order. [`TypeUniverse`] is the query interface;
//! [`model::TypeModel`] implements it over declarations lowered from Rust
//! source with `syn`.

pub mod lower;
pub mod model;

use serde::Serialize;
use thiserror::Error;

pub use model::{DeclKind, Declaration, FieldDecl, TypeExpr, TypeHandle, TypeModel};

/// Capabilities of a resolved type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TypeTraits {
    pub numeric: bool,
    pub comparable: bool,
    pub ordered: bool,
}

impl TypeTraits {
    /// Assumed for a projection target that cannot be resolved: comparable
    /// gated projections still apply, numeric and ordered ones do not.
    pub const UNRESOLVED_TARGET: TypeTraits = TypeTraits {
        numeric: false,
        comparable: true,
        ordered: false,
    };
}

/// Why a type name could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid type expression `{expr}`: {message}")]
    Syntax { expr: String, message: String },

    #[error("undeclared type {0}")]
    Undeclared(String),

    #[error("alias cycle through {0}")]
    AliasCycle(String),
}

/// A struct field as seen by the legacy annotation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    pub name: String,
    /// Token text of the field's non-doc attributes
    pub raw_tag: String,
}

/// Capability-query interface consumed by the selection engine.
pub trait TypeUniverse {
    type Handle;

    fn resolve(&self, name: &str) -> Result<Self::Handle, ResolveError>;

    fn is_numeric(&self, handle: &Self::Handle) -> bool;

    fn is_comparable(&self, handle: &Self::Handle) -> bool;

    fn is_ordered(&self, handle: &Self::Handle) -> bool;

    /// Fields of a struct handle; empty for anything else.
    fn fields(&self, handle: &Self::Handle) -> Vec<FieldTag>;

    fn traits(&self, handle: &Self::Handle) -> TypeTraits {
        TypeTraits {
            numeric: self.is_numeric(handle),
            comparable: self.is_comparable(handle),
            ordered: self.is_ordered(handle),
        }
    }
}
