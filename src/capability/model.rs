//! Structural type model built from lowered declarations.
//!
//! Resolution follows `type` aliases to the underlying representation.
//! Comparability propagates through aggregates and fixed-size arrays;
//! numeric and ordered do not.

use super::lower::{lower_item, lower_type, LowerScope};
use super::{FieldTag, ResolveError, TypeUniverse};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Int,
    Float,
    Bool,
    Char,
    /// `String`, `str` and `&str`
    Str,
}

/// Representation of a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Primitive(Primitive),
    Unit,
    /// `&T`, `&mut T`, `*const T`, `*mut T`
    Pointer(Box<TypeExpr>),
    /// `Box<T>`, `Rc<T>`, `Arc<T>`, `Option<T>`
    Wrapper(Box<TypeExpr>),
    /// `[T; N]`
    Array(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    /// Growable collections and slices, with their type arguments
    Dynamic(String, Vec<TypeExpr>),
    /// Function pointers and trait objects
    Function,
    /// Reference to a declaration by name
    Named(String),
    /// Generic parameters and anything we cannot model
    Opaque(String),
}

impl TypeExpr {
    fn visit_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Named(name) => out.push(name),
            Self::Pointer(inner) | Self::Wrapper(inner) | Self::Array(inner) => {
                inner.visit_names(out)
            }
            Self::Tuple(elems) | Self::Dynamic(_, elems) => {
                elems.iter().for_each(|e| e.visit_names(out))
            }
            _ => {}
        }
    }

    fn find_opaque(&self) -> Option<&str> {
        match self {
            Self::Opaque(text) => Some(text),
            Self::Pointer(inner) | Self::Wrapper(inner) | Self::Array(inner) => {
                inner.find_opaque()
            }
            Self::Tuple(elems) | Self::Dynamic(_, elems) => {
                elems.iter().find_map(TypeExpr::find_opaque)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub raw_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    Alias(TypeExpr),
    Struct(Vec<FieldDecl>),
    /// Member types of every variant
    Enum(Vec<TypeExpr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
}

/// A resolved type: the requested expression with top-level aliases
/// followed to their underlying representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHandle {
    pub name: String,
    pub underlying: TypeExpr,
}

/// Declarations visible to one scanned directory.
#[derive(Debug, Clone, Default)]
pub struct TypeModel {
    decls: BTreeMap<String, Declaration>,
}

impl TypeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration. Returns `false` and keeps the earlier one when
    /// the name is already declared.
    pub fn declare(&mut self, decl: Declaration) -> bool {
        if self.decls.contains_key(&decl.name) {
            debug!(name = %decl.name, "duplicate declaration ignored");
            return false;
        }
        self.decls.insert(decl.name.clone(), decl);
        true
    }

    /// Declares every type item of a parsed file.
    pub fn declare_file(&mut self, file: &syn::File) {
        for decl in file.items.iter().filter_map(lower_item) {
            self.declare(decl);
        }
    }

    /// Builds a model from source text; convenient for tests and tools.
    pub fn from_source(source: &str) -> syn::Result<Self> {
        let file = syn::parse_file(source)?;
        let mut model = Self::new();
        model.declare_file(&file);
        Ok(model)
    }

    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.decls.get(name)
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Follows aliases until a non-alias representation is reached.
    fn underlying(&self, expr: &TypeExpr) -> Result<TypeExpr, ResolveError> {
        let mut current = expr.clone();
        let mut seen = BTreeSet::new();
        loop {
            let TypeExpr::Named(name) = &current else {
                return Ok(current);
            };
            let decl = self
                .decls
                .get(name)
                .ok_or_else(|| ResolveError::Undeclared(name.clone()))?;
            let DeclKind::Alias(target) = &decl.kind else {
                return Ok(current);
            };
            if !seen.insert(name.clone()) {
                return Err(ResolveError::AliasCycle(name.clone()));
            }
            self.check_declared(target)?;
            current = target.clone();
        }
    }

    fn check_declared(&self, expr: &TypeExpr) -> Result<(), ResolveError> {
        let mut names = Vec::new();
        expr.visit_names(&mut names);
        match names.into_iter().find(|n| !self.decls.contains_key(*n)) {
            Some(missing) => Err(ResolveError::Undeclared(missing.to_string())),
            None => Ok(()),
        }
    }

    fn numeric(&self, expr: &TypeExpr) -> bool {
        matches!(
            self.underlying(expr),
            Ok(TypeExpr::Primitive(Primitive::Int | Primitive::Float))
        )
    }

    fn ordered(&self, expr: &TypeExpr) -> bool {
        matches!(
            self.underlying(expr),
            Ok(TypeExpr::Primitive(
                Primitive::Int | Primitive::Float | Primitive::Char | Primitive::Str
            ))
        )
    }

    fn comparable(&self, expr: &TypeExpr, visiting: &mut BTreeSet<String>) -> bool {
        match expr {
            TypeExpr::Primitive(_) | TypeExpr::Unit | TypeExpr::Pointer(_) => true,
            TypeExpr::Wrapper(inner) | TypeExpr::Array(inner) => self.comparable(inner, visiting),
            TypeExpr::Tuple(elems) => elems.iter().all(|e| self.comparable(e, visiting)),
            TypeExpr::Dynamic(..) | TypeExpr::Function => false,
            TypeExpr::Opaque(name) => {
                debug!(%name, "opaque member treated as non-comparable");
                false
            }
            TypeExpr::Named(name) => self.comparable_decl(name, visiting),
        }
    }

    fn comparable_decl(&self, name: &str, visiting: &mut BTreeSet<String>) -> bool {
        let Some(decl) = self.decls.get(name) else {
            debug!(%name, "unresolved member treated as non-comparable");
            return false;
        };
        // Back on a type already being checked: its other members decide,
        // unless the cycle runs only through aliases.
        if !visiting.insert(name.to_string()) {
            return !matches!(decl.kind, DeclKind::Alias(_));
        }
        let result = match &decl.kind {
            DeclKind::Alias(target) => self.comparable(target, visiting),
            DeclKind::Struct(fields) => fields.iter().all(|f| self.comparable(&f.ty, visiting)),
            DeclKind::Enum(members) => members.iter().all(|m| self.comparable(m, visiting)),
        };
        visiting.remove(name);
        result
    }
}

impl TypeUniverse for TypeModel {
    type Handle = TypeHandle;

    fn resolve(&self, name: &str) -> Result<TypeHandle, ResolveError> {
        let ty: syn::Type = syn::parse_str(name).map_err(|e| ResolveError::Syntax {
            expr: name.to_string(),
            message: e.to_string(),
        })?;
        let expr = lower_type(&ty, &LowerScope::default());
        if let Some(text) = expr.find_opaque() {
            return Err(ResolveError::Undeclared(text.to_string()));
        }
        self.check_declared(&expr)?;
        let underlying = self.underlying(&expr)?;
        if let TypeExpr::Opaque(text) = &underlying {
            return Err(ResolveError::Undeclared(text.clone()));
        }
        Ok(TypeHandle {
            name: name.to_string(),
            underlying,
        })
    }

    fn is_numeric(&self, handle: &TypeHandle) -> bool {
        self.numeric(&handle.underlying)
    }

    fn is_comparable(&self, handle: &TypeHandle) -> bool {
        self.comparable(&handle.underlying, &mut BTreeSet::new())
    }

    fn is_ordered(&self, handle: &TypeHandle) -> bool {
        self.ordered(&handle.underlying)
    }

    fn fields(&self, handle: &TypeHandle) -> Vec<FieldTag> {
        let TypeExpr::Named(name) = &handle.underlying else {
            return Vec::new();
        };
        match self.decls.get(name).map(|d| &d.kind) {
            Some(DeclKind::Struct(fields)) => fields
                .iter()
                .map(|f| FieldTag {
                    name: f.name.clone(),
                    raw_tag: f.raw_tag.clone(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
