use crate::catalog::{CatalogListing, MethodTemplate};
use crate::diagnostics::Diagnostic;
use crate::selection::{PackagePlan, PlanReport, TypePlan};
use clap::ValueEnum;
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Yaml,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &PlanReport) -> anyhow::Result<()>;
    fn write_catalog(&mut self, catalog: &CatalogListing) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &PlanReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_catalog(&mut self, catalog: &CatalogListing) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(catalog)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct YamlWriter<W: Write> {
    writer: W,
}

impl<W: Write> YamlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for YamlWriter<W> {
    fn write_report(&mut self, report: &PlanReport) -> anyhow::Result<()> {
        serde_yaml::to_writer(&mut self.writer, report)?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_catalog(&mut self, catalog: &CatalogListing) -> anyhow::Result<()> {
        serde_yaml::to_writer(&mut self.writer, catalog)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Human readable rendering with colors when the terminal supports them.
pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "═══════════════════════════════════════════".cyan())?;
        writeln!(self.writer, "{}", title.bold().cyan())?;
        writeln!(self.writer, "{}", "═══════════════════════════════════════════".cyan())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_package(&mut self, package: &PackagePlan) -> anyhow::Result<()> {
        writeln!(self.writer, "📦 {} {}", "package".bold(), package.name.bold())?;
        for plan in &package.types {
            self.write_type(plan)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_type(&mut self, plan: &TypePlan) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "  {} (element {})",
            plan.name.green().bold(),
            plan.element_type()
        )?;
        writeln!(
            self.writer,
            "    standard:    {}",
            join_or_dash(plan.standard_methods.iter().cloned())
        )?;
        writeln!(
            self.writer,
            "    projections: {}",
            join_or_dash(plan.projections.iter().map(|p| p.method_name()))
        )?;

        let mut requirements: Vec<String> =
            plan.requirements.iter().map(|r| r.to_string()).collect();
        if plan.requires_extended_sort {
            requirements.push("extended sort".to_string());
        }
        writeln!(
            self.writer,
            "    requires:    {}",
            join_or_dash(requirements.into_iter())
        )?;
        Ok(())
    }

    fn write_diagnostics(&mut self, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
        if diagnostics.is_empty() {
            return Ok(());
        }
        writeln!(
            self.writer,
            "⚠️  {} ({})",
            "DIAGNOSTICS".bold().yellow(),
            diagnostics.len()
        )?;
        for diagnostic in diagnostics {
            writeln!(
                self.writer,
                "  [{}] {}",
                diagnostic.kind.as_str().yellow(),
                diagnostic.message
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_templates(&mut self, title: &str, templates: &[MethodTemplate]) -> anyhow::Result<()> {
        writeln!(self.writer, "{} ({})", title.bold(), templates.len())?;
        for template in templates {
            writeln!(
                self.writer,
                "  {:<16} {}",
                template.name,
                template.requirement_label().dimmed()
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &PlanReport) -> anyhow::Result<()> {
        self.write_header("           COLLECTION PLAN")?;
        for package in &report.packages {
            self.write_package(package)?;
        }
        self.write_diagnostics(&report.diagnostics)?;

        let summary = format!(
            "{} types in {} packages, {} diagnostics",
            report.type_count(),
            report.packages.len(),
            report.diagnostics.len()
        );
        if report.diagnostics.is_empty() {
            writeln!(self.writer, "✅ {}", summary.green())?;
        } else {
            writeln!(self.writer, "ℹ️  {}", summary.yellow())?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_catalog(&mut self, catalog: &CatalogListing) -> anyhow::Result<()> {
        self.write_header("           METHOD CATALOG")?;
        self.write_templates("Standard methods", &catalog.standard)?;
        self.write_templates("Projection methods", &catalog.projection)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn join_or_dash(items: impl Iterator<Item = String>) -> String {
    let items: Vec<String> = items.collect();
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Writer for `format`, targeting `output` or stdout.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout()),
    };

    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Yaml => Box::new(YamlWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    })
}
