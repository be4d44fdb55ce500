//! Metabind CLI - table and schema metadata loader

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use metabind_cli::cli::{Args, Command};
use metabind_cli::{Outcome, execute, logging};
use metabind_connection::DataSourceConfig;
use metabind_drivers::DriverRegistry;

/// Loading failed or the configuration is invalid.
const EXIT_FAILURE: u8 = 1;
/// The requested table does not exist.
const EXIT_TABLE_NOT_FOUND: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::TableNotFound) => {
            if let Command::Table { name, .. } = &args.command {
                eprintln!("metabind: table not found: {name}");
            }
            ExitCode::from(EXIT_TABLE_NOT_FOUND)
        }
        Err(e) => {
            eprintln!("metabind: error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: &Args) -> Result<Outcome> {
    let config = DataSourceConfig::load(&args.config)
        .with_context(|| format!("failed to load config '{}'", args.config.display()))?;
    logging::init(&logging::effective_config(&config.logging, args))?;

    let registry = DriverRegistry::with_defaults();
    let stdout = io::stdout();
    execute(args, &config, &registry, &mut stdout.lock())
}
