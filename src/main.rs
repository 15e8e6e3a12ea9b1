use anyhow::Result;
use clap::Parser;
use collgen::cli::{log_directive, Cli, Commands};
use collgen::commands::plan::PlanConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_directive(verbosity))),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.verbosity());

    match cli.command {
        Commands::Plan {
            path,
            format,
            output,
            no_legacy_check,
            strict,
            verbosity: _,
        } => collgen::commands::plan::plan_project(PlanConfig {
            path,
            format,
            output,
            no_legacy_check,
            strict,
        }),
        Commands::Init { force } => collgen::commands::init::init_config(force),
        Commands::Catalog { format } => collgen::commands::catalog::show_catalog(format),
    }
}
