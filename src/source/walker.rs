use crate::errors::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the Rust source files of a single directory.
pub struct SourceWalker {
    root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl SourceWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_patterns: vec![],
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Files directly inside the root, sorted by path.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let patterns = self
            .ignore_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type().is_file() && should_process(path, &patterns) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }
}

fn should_process(path: &Path, patterns: &[glob::Pattern]) -> bool {
    if path.extension().is_none_or(|ext| ext != "rs") {
        return false;
    }

    let path_str = path.to_string_lossy();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    !patterns
        .iter()
        .any(|p| p.matches(&path_str) || p.matches(&file_name))
}

pub fn find_source_files(root: &Path, ignore_patterns: Vec<String>) -> Result<Vec<PathBuf>> {
    SourceWalker::new(root.to_path_buf())
        .with_ignore_patterns(ignore_patterns)
        .walk()
}
