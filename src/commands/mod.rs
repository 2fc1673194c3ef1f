// src/commands/mod.rs
//! Command handlers for the acctgids CLI

mod lookup;
mod resolve;
mod system;

pub use lookup::cmd_lookup;
pub use resolve::cmd_resolve;
pub use system::cmd_completions;

use crate::cli::ResolverArgs;
use acctgids::{AccountGidResolver, GidsFact, ResolverConfig};
use anyhow::{Context, Result};

/// Load config, apply CLI overrides, and build the fact
fn build_fact(args: &ResolverArgs) -> Result<GidsFact> {
    let config = ResolverConfig::load(args.config.as_deref()).context("Failed to load config")?;
    let config = args.apply(config);
    Ok(GidsFact::new(AccountGidResolver::new(&config)))
}
