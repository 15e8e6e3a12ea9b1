use crate::errors::{Error, Result};
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = ".collgen.toml";

/// How many directories upwards to look for a configuration file
const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Root configuration structure for collgen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CollgenConfig {
    /// Source scanning configuration
    #[serde(default)]
    pub scan: ScanConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Glob patterns of source files to skip
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Report fields still using the retired per-field annotation
    #[serde(default = "default_legacy_tag_check")]
    pub legacy_tag_check: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            legacy_tag_check: default_legacy_tag_check(),
        }
    }
}

impl ScanConfig {
    /// Checks that every ignore pattern is a valid glob.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignore {
            glob::Pattern::new(pattern).map_err(|e| {
                Error::configuration(format!("invalid ignore pattern {:?}: {}", pattern, e))
            })?;
        }
        Ok(())
    }
}

fn default_legacy_tag_check() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format when none is given on the command line
    #[serde(default)]
    pub format: OutputFormat,
}

/// Contents written by `collgen init`
pub const DEFAULT_CONFIG: &str = r#"# collgen configuration

[scan]
# Source files to skip (glob patterns, matched against path and file name)
ignore = ["*_gen.rs"]
# Warn about fields that still use the retired #[collgen(...)] attribute
legacy_tag_check = true

[output]
# terminal, json or yaml
format = "terminal"
"#;

/// Parses `.collgen.toml` contents.
pub fn parse_config(contents: &str) -> std::result::Result<CollgenConfig, String> {
    toml::from_str::<CollgenConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// Searches `start` and its ancestors for the nearest config file.
///
/// The nearest file wins even when it cannot be used; a broken file falls
/// back to defaults rather than to a config further up.
pub fn load_config_from(start: &Path) -> CollgenConfig {
    find_config(start, MAX_TRAVERSAL_DEPTH).unwrap_or_default()
}

fn find_config(start: &Path, max_depth: usize) -> Option<CollgenConfig> {
    let Some(path) = start
        .ancestors()
        .take(max_depth)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
    else {
        debug!(
            "No {} within {} directories of {}. Using default config.",
            CONFIG_FILE_NAME,
            max_depth,
            start.display()
        );
        return None;
    };

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };
    match parse_config(&contents) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{}. Using defaults.", e);
            None
        }
    }
}

pub fn load_config() -> CollgenConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            CollgenConfig::default()
        }
    }
}
