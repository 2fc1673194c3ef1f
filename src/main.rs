// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Resolve {
            resolver,
            format,
            report,
        } => commands::cmd_resolve(&resolver, format, report),
        Commands::Lookup { login, resolver } => commands::cmd_lookup(&login, &resolver),
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
