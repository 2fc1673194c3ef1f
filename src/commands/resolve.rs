// src/commands/resolve.rs
//! Resolve and print the full login to GID mapping

use super::build_fact;
use crate::cli::{OutputFormat, ResolverArgs};
use acctgids::{GidsFact, Resolution, FACT_NAME};
use anyhow::{Context, Result};

pub fn cmd_resolve(args: &ResolverArgs, format: OutputFormat, report: bool) -> Result<()> {
    let fact = build_fact(args)?;

    let Some(resolution) = fact.resolve().context("Failed to resolve account GIDs")? else {
        eprintln!("Fact '{}' does not apply to this host", FACT_NAME);
        if format == OutputFormat::Json {
            println!("{}", GidsFact::render(None));
        }
        return Ok(());
    };

    if report {
        print_report(&resolution);
    }

    match format {
        OutputFormat::Json => {
            let value = GidsFact::render(Some(&resolution));
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            for (login, gid) in &resolution.gids {
                println!("{} {}", login, gid);
            }
        }
    }

    Ok(())
}

/// Summarize the lossy parts of a resolution on stderr
fn print_report(resolution: &Resolution) {
    eprintln!(
        "Resolved {} accounts via {}",
        resolution.gids.len(),
        resolution.source
    );
    for defaulted in &resolution.defaulted {
        eprintln!(
            "  defaulted: {} (GID field {:?} -> 0)",
            defaulted.login, defaulted.raw
        );
    }
    for skipped in &resolution.skipped {
        eprintln!("  skipped line {}: {:?}", skipped.line, skipped.content);
    }
}
