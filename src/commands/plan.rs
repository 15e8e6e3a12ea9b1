use crate::config::{load_config, CollgenConfig};
use crate::output::{create_writer, OutputFormat};
use crate::selection::{plan_directory, PlanReport};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct PlanConfig {
    pub path: PathBuf,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub no_legacy_check: bool,
    pub strict: bool,
}

/// Command line flags take precedence over the configuration file.
pub fn effective_config(mut config: CollgenConfig, plan: &PlanConfig) -> CollgenConfig {
    if plan.no_legacy_check {
        config.scan.legacy_tag_check = false;
    }
    if let Some(format) = plan.format {
        config.output.format = format;
    }
    config
}

pub fn plan_project(plan: PlanConfig) -> Result<()> {
    let config = effective_config(load_config(), &plan);
    let report = plan_directory(&plan.path, &config)
        .with_context(|| format!("Failed to plan {}", plan.path.display()))?;

    let mut writer = create_writer(config.output.format, plan.output.as_deref())?;
    writer.write_report(&report)?;

    check_strict(&report, plan.strict)
}

fn check_strict(report: &PlanReport, strict: bool) -> Result<()> {
    if report.diagnostics.is_empty() {
        return Ok(());
    }
    if strict {
        anyhow::bail!(
            "{} diagnostics reported (--strict)",
            report.diagnostics.len()
        );
    }
    warn!(count = report.diagnostics.len(), "diagnostics reported");
    Ok(())
}
