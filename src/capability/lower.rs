//! Lowering of `syn` types and items into the structural model.

use super::model::{DeclKind, Declaration, FieldDecl, Primitive, TypeExpr};
use quote::ToTokens;

const INTEGERS: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];
const FLOATS: &[&str] = &["f32", "f64"];

/// Owning wrappers whose equality is that of their contents.
const WRAPPERS: &[&str] = &["Box", "Rc", "Arc", "Option"];

/// Growable or keyed std collections; never comparable.
const COLLECTIONS: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "BinaryHeap",
    "HashMap",
    "HashSet",
    "BTreeMap",
    "BTreeSet",
];

/// Crate roots whose paths may name builtin types.
const STD_ROOTS: &[&str] = &["std", "core", "alloc"];

/// Names in scope while lowering the members of one item.
#[derive(Debug, Clone, Default)]
pub struct LowerScope {
    /// Declaration that `Self` refers to
    pub self_name: Option<String>,
    /// Generic type parameters of the item
    pub generics: Vec<String>,
}

impl LowerScope {
    fn for_item(ident: &syn::Ident, generics: &syn::Generics) -> Self {
        Self {
            self_name: Some(ident.to_string()),
            generics: generics
                .type_params()
                .map(|param| param.ident.to_string())
                .collect(),
        }
    }
}

/// Lowers a type expression with the names of `scope` in effect.
pub fn lower_type(ty: &syn::Type, scope: &LowerScope) -> TypeExpr {
    match ty {
        syn::Type::Path(type_path) => {
            if type_path.qself.is_some() {
                return TypeExpr::Opaque(type_path.to_token_stream().to_string());
            }
            lower_path(&type_path.path, scope)
        }
        syn::Type::Reference(reference) => match &*reference.elem {
            syn::Type::Path(p) if p.qself.is_none() && p.path.is_ident("str") => {
                TypeExpr::Primitive(Primitive::Str)
            }
            elem => TypeExpr::Pointer(Box::new(lower_type(elem, scope))),
        },
        syn::Type::Ptr(ptr) => TypeExpr::Pointer(Box::new(lower_type(&ptr.elem, scope))),
        syn::Type::Array(array) => TypeExpr::Array(Box::new(lower_type(&array.elem, scope))),
        syn::Type::Slice(slice) => {
            TypeExpr::Dynamic("slice".to_string(), vec![lower_type(&slice.elem, scope)])
        }
        syn::Type::Tuple(tuple) if tuple.elems.is_empty() => TypeExpr::Unit,
        syn::Type::Tuple(tuple) => TypeExpr::Tuple(
            tuple
                .elems
                .iter()
                .map(|elem| lower_type(elem, scope))
                .collect(),
        ),
        syn::Type::Paren(paren) => lower_type(&paren.elem, scope),
        syn::Type::Group(group) => lower_type(&group.elem, scope),
        syn::Type::BareFn(_) | syn::Type::TraitObject(_) | syn::Type::ImplTrait(_) => {
            TypeExpr::Function
        }
        other => TypeExpr::Opaque(other.to_token_stream().to_string()),
    }
}

/// Only local names and builtins are modelled; any other qualified path
/// lowers to `Opaque` and so never matches a local declaration.
fn lower_path(path: &syn::Path, scope: &LowerScope) -> TypeExpr {
    let Some(last) = path.segments.last() else {
        return TypeExpr::Opaque(String::new());
    };
    let root = path
        .segments
        .first()
        .map(|segment| segment.ident.to_string())
        .unwrap_or_default();

    match path.segments.len() {
        1 if path.leading_colon.is_none() => lower_local(last, scope),
        2 if root == "self" => lower_local(last, scope),
        _ if STD_ROOTS.contains(&root.as_str()) => {
            lower_builtin(last, scope).unwrap_or_else(|| TypeExpr::Opaque(path_text(path)))
        }
        _ => TypeExpr::Opaque(path_text(path)),
    }
}

fn lower_local(segment: &syn::PathSegment, scope: &LowerScope) -> TypeExpr {
    let ident = segment.ident.to_string();
    if scope.generics.contains(&ident) {
        return TypeExpr::Opaque(ident);
    }
    if ident == "Self" {
        return match &scope.self_name {
            Some(name) => TypeExpr::Named(name.clone()),
            None => TypeExpr::Opaque(ident),
        };
    }
    lower_builtin(segment, scope).unwrap_or(TypeExpr::Named(ident))
}

fn lower_builtin(segment: &syn::PathSegment, scope: &LowerScope) -> Option<TypeExpr> {
    let ident = segment.ident.to_string();
    if INTEGERS.contains(&ident.as_str()) {
        return Some(TypeExpr::Primitive(Primitive::Int));
    }
    if FLOATS.contains(&ident.as_str()) {
        return Some(TypeExpr::Primitive(Primitive::Float));
    }

    let expr = match ident.as_str() {
        "bool" => TypeExpr::Primitive(Primitive::Bool),
        "char" => TypeExpr::Primitive(Primitive::Char),
        "str" | "String" => TypeExpr::Primitive(Primitive::Str),
        name if WRAPPERS.contains(&name) => match type_arguments(&segment.arguments).first() {
            Some(inner) => TypeExpr::Wrapper(Box::new(lower_type(inner, scope))),
            None => TypeExpr::Opaque(name.to_string()),
        },
        name if COLLECTIONS.contains(&name) => TypeExpr::Dynamic(
            name.to_string(),
            type_arguments(&segment.arguments)
                .into_iter()
                .map(|arg| lower_type(arg, scope))
                .collect(),
        ),
        _ => return None,
    };
    Some(expr)
}

fn type_arguments(arguments: &syn::PathArguments) -> Vec<&syn::Type> {
    match arguments {
        syn::PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn path_text(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// Token text of every non-doc attribute on a field.
pub fn raw_field_tag(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("doc"))
        .map(|attr| attr.to_token_stream().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn lower_fields(fields: &syn::Fields, scope: &LowerScope) -> Vec<FieldDecl> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| FieldDecl {
            name: field
                .ident
                .as_ref()
                .map_or_else(|| index.to_string(), ToString::to_string),
            ty: lower_type(&field.ty, scope),
            raw_tag: raw_field_tag(&field.attrs),
        })
        .collect()
}

/// Lowers a `struct`, `enum` or `type` item; other items yield `None`.
pub fn lower_item(item: &syn::Item) -> Option<Declaration> {
    match item {
        syn::Item::Struct(item) => {
            let scope = LowerScope::for_item(&item.ident, &item.generics);
            Some(Declaration {
                name: item.ident.to_string(),
                kind: DeclKind::Struct(lower_fields(&item.fields, &scope)),
            })
        }
        syn::Item::Enum(item) => {
            let scope = LowerScope::for_item(&item.ident, &item.generics);
            let members = item
                .variants
                .iter()
                .flat_map(|variant| lower_fields(&variant.fields, &scope))
                .map(|field| field.ty)
                .collect();
            Some(Declaration {
                name: item.ident.to_string(),
                kind: DeclKind::Enum(members),
            })
        }
        syn::Item::Type(item) => {
            let scope = LowerScope {
                self_name: None,
                ..LowerScope::for_item(&item.ident, &item.generics)
            };
            Some(Declaration {
                name: item.ident.to_string(),
                kind: DeclKind::Alias(lower_type(&item.ty, &scope)),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(src: &str) -> TypeExpr {
        let ty: syn::Type = syn::parse_str(src).unwrap();
        lower_type(&ty, &LowerScope::default())
    }

    #[test]
    fn test_primitives() {
        assert_eq!(lower("u64"), TypeExpr::Primitive(Primitive::Int));
        assert_eq!(lower("f32"), TypeExpr::Primitive(Primitive::Float));
        assert_eq!(lower("std::string::String"), TypeExpr::Primitive(Primitive::Str));
        assert_eq!(lower("&'static str"), TypeExpr::Primitive(Primitive::Str));
        assert_eq!(lower("()"), TypeExpr::Unit);
    }

    #[test]
    fn test_composites() {
        assert_eq!(
            lower("[Point; 4]"),
            TypeExpr::Array(Box::new(TypeExpr::Named("Point".into())))
        );
        assert_eq!(
            lower("Option<Box<i32>>"),
            TypeExpr::Wrapper(Box::new(TypeExpr::Wrapper(Box::new(TypeExpr::Primitive(
                Primitive::Int
            )))))
        );
        assert_eq!(
            lower("Vec<i32>"),
            TypeExpr::Dynamic("Vec".into(), vec![TypeExpr::Primitive(Primitive::Int)])
        );
        assert_eq!(lower("fn(i32) -> bool"), TypeExpr::Function);
        assert_eq!(lower("Box<dyn Fn(i32)>"), TypeExpr::Wrapper(Box::new(TypeExpr::Function)));
    }

    #[test]
    fn test_generic_params_are_opaque() {
        let ty: syn::Type = syn::parse_str("T").unwrap();
        let scope = LowerScope {
            generics: vec!["T".to_string()],
            ..LowerScope::default()
        };
        assert_eq!(lower_type(&ty, &scope), TypeExpr::Opaque("T".into()));
        assert_eq!(lower("T"), TypeExpr::Named("T".into()));
    }

    #[test]
    fn test_qualified_paths_only_reach_builtins() {
        assert_eq!(lower("other::Point"), TypeExpr::Opaque("other::Point".into()));
        assert_eq!(lower("::Point"), TypeExpr::Opaque("Point".into()));
        assert_eq!(lower("self::Point"), TypeExpr::Named("Point".into()));
        assert_eq!(
            lower("std::time::Duration"),
            TypeExpr::Opaque("std::time::Duration".into())
        );
        assert_eq!(
            lower("core::num::NonZeroU8"),
            TypeExpr::Opaque("core::num::NonZeroU8".into())
        );
        assert_eq!(
            lower("std::collections::HashMap<u8, Point>"),
            TypeExpr::Dynamic(
                "HashMap".into(),
                vec![
                    TypeExpr::Primitive(Primitive::Int),
                    TypeExpr::Named("Point".into())
                ]
            )
        );
    }

    #[test]
    fn test_self_names_the_enclosing_item() {
        let item: syn::Item =
            syn::parse_str("struct Node { next: Option<Box<Self>>, v: u8 }").unwrap();
        let DeclKind::Struct(fields) = lower_item(&item).unwrap().kind else {
            panic!("expected struct");
        };
        assert_eq!(
            fields[0].ty,
            TypeExpr::Wrapper(Box::new(TypeExpr::Wrapper(Box::new(TypeExpr::Named(
                "Node".into()
            )))))
        );
        assert_eq!(lower("Self"), TypeExpr::Opaque("Self".into()));
    }

    #[test]
    fn test_lower_struct_item_with_tags() {
        let item: syn::Item = syn::parse_str(
            r#"struct Order { #[collgen(SumBy)] total: f64, /// doc
            id: u32 }"#,
        )
        .unwrap();
        let decl = lower_item(&item).unwrap();
        assert_eq!(decl.name, "Order");
        let DeclKind::Struct(fields) = decl.kind else {
            panic!("expected struct");
        };
        assert_eq!(fields.len(), 2);
        assert!(fields[0].raw_tag.contains("collgen"));
        assert_eq!(fields[1].raw_tag, "");
    }

    #[test]
    fn test_tuple_struct_fields_are_indexed() {
        let item: syn::Item = syn::parse_str("struct Meters(f64, u8);").unwrap();
        let DeclKind::Struct(fields) = lower_item(&item).unwrap().kind else {
            panic!("expected struct");
        };
        assert_eq!(fields[0].name, "0");
        assert_eq!(fields[1].name, "1");
    }

    #[test]
    fn test_non_type_items_are_skipped() {
        let item: syn::Item = syn::parse_str("fn helper() {}").unwrap();
        assert!(lower_item(&item).is_none());
    }
}
