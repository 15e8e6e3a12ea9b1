use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "collgen")]
#[command(
    about = "Plans typed collection methods for annotated Rust declarations",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan the methods to generate for the types declared in a directory
    Plan {
        /// Directory whose source files are scanned (not recursive)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the check for retired #[collgen(...)] field attributes
        #[arg(long = "no-legacy-check")]
        no_legacy_check: bool,

        /// Exit with an error when any diagnostic was reported
        #[arg(long)]
        strict: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize a .collgen.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// List the standard and projection methods and their requirements
    Catalog {
        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Self::Plan { verbosity, .. } => *verbosity,
            _ => 0,
        }
    }
}

/// Default log filter for a `-v` count.
pub fn log_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
