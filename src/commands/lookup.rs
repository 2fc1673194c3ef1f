// src/commands/lookup.rs
//! Look up the primary GID of a single login

use super::build_fact;
use crate::cli::ResolverArgs;
use anyhow::{Context, Result};
use tracing::info;

pub fn cmd_lookup(login: &str, args: &ResolverArgs) -> Result<()> {
    let fact = build_fact(args)?;
    let gid = fact
        .lookup(login)
        .with_context(|| format!("Failed to look up GID of '{}'", login))?;

    info!("Login '{}' has primary GID {}", login, gid);
    println!("{}", gid);
    Ok(())
}
