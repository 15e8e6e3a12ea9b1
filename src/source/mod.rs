//! Discovery of declared types in a directory of Rust sources.
//!
//! Every `.rs` file directly inside the directory becomes a package named
//! after its module. All files share one [`TypeModel`], so a projection
//! target declared in a sibling module resolves.

pub mod walker;

use crate::capability::TypeModel;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span, info, warn};

pub use walker::{find_source_files, SourceWalker};

/// A `struct`, `enum` or `type` item together with its documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub name: String,
    /// Doc comment text, one line per `#[doc]` attribute
    pub doc: String,
    pub file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePackage {
    pub name: String,
    /// Sorted by declaration name
    pub types: Vec<DeclaredType>,
}

#[derive(Debug, Clone, Default)]
pub struct SourceTree {
    pub packages: Vec<SourcePackage>,
    pub model: TypeModel,
}

impl SourceTree {
    pub fn declared_types(&self) -> impl Iterator<Item = &DeclaredType> {
        self.packages.iter().flat_map(|p| p.types.iter())
    }
}

/// Reads and parses every source file of `dir`.
///
/// Unreadable or unparsable files are reported as diagnostics and skipped;
/// only a failure to list the directory is an error.
pub fn discover(
    dir: &Path,
    ignore_patterns: Vec<String>,
    diagnostics: &mut Diagnostics,
) -> Result<SourceTree> {
    let metadata = std::fs::metadata(dir).map_err(|e| {
        Error::file_system_with_source("cannot access source directory", dir, e)
    })?;
    if !metadata.is_dir() {
        return Err(Error::file_system("source path is not a directory", dir));
    }

    let files = find_source_files(dir, ignore_patterns)?;
    info!(dir = %dir.display(), files = files.len(), "discovered source files");

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        match std::fs::read_to_string(&path) {
            Ok(content) => sources.push((path, content)),
            Err(e) => diagnostics.push(
                DiagnosticKind::ParseFailure,
                None,
                format!("failed to read {} ({})", path.display(), e),
            ),
        }
    }

    Ok(parse_sources(sources, diagnostics))
}

/// Builds a [`SourceTree`] from `(path, content)` pairs.
pub fn parse_sources<I>(sources: I, diagnostics: &mut Diagnostics) -> SourceTree
where
    I: IntoIterator<Item = (PathBuf, String)>,
{
    let mut model = TypeModel::new();
    let mut packages: BTreeMap<String, Vec<DeclaredType>> = BTreeMap::new();

    for (path, content) in sources {
        let _span = debug_span!("parse_file", path = %path.display()).entered();

        let file = match syn::parse_file(&content) {
            Ok(file) => file,
            Err(e) => {
                warn!("{}", Error::parse(&path, &e));
                diagnostics.push(
                    DiagnosticKind::ParseFailure,
                    None,
                    format!("failed to parse {} ({})", path.display(), e),
                );
                continue;
            }
        };

        model.declare_file(&file);
        let types = declared_types(&file, &path);
        debug!(types = types.len(), "collected declarations");
        packages
            .entry(package_name(&path))
            .or_default()
            .extend(types);
    }

    let packages = packages
        .into_iter()
        .map(|(name, mut types)| {
            types.sort_by(|a, b| a.name.cmp(&b.name));
            SourcePackage { name, types }
        })
        .collect();

    SourceTree { packages, model }
}

fn declared_types(file: &syn::File, path: &Path) -> Vec<DeclaredType> {
    file.items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Struct(s) => Some((&s.ident, &s.attrs)),
            syn::Item::Enum(e) => Some((&e.ident, &e.attrs)),
            syn::Item::Type(t) => Some((&t.ident, &t.attrs)),
            _ => None,
        })
        .map(|(ident, attrs)| DeclaredType {
            name: ident.to_string(),
            doc: doc_text(attrs),
            file: path.to_path_buf(),
        })
        .collect()
}

/// Joins the string values of `#[doc = "..."]` attributes with newlines.
pub fn doc_text(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(nv) => match &nv.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) => Some(s.value()),
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Module name of a source file: its stem, or the directory name for
/// `lib.rs`, `main.rs` and `mod.rs`.
pub fn package_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if matches!(stem.as_str(), "lib" | "main" | "mod") {
        if let Some(dir) = path
            .parent()
            .and_then(|p| p.canonicalize().ok().or_else(|| Some(p.to_path_buf())))
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        {
            return dir;
        }
    }
    stem
}
