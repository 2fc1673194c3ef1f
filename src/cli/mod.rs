// src/cli/mod.rs
//! CLI definitions for acctgids
//!
//! This module contains the command-line interface definitions using clap.
//! The command implementations are in the `commands` module.

use acctgids::{GidPolicy, ResolverConfig, SourcePreference};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "acctgids")]
#[command(author = "acctgids Contributors")]
#[command(version)]
#[command(about = "Map system logins to their primary GID", long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve every login to its primary GID
    Resolve {
        #[command(flatten)]
        resolver: ResolverArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Also report defaulted GIDs and skipped records on stderr
        #[arg(long)]
        report: bool,
    },

    /// Print the primary GID of one login
    Lookup {
        /// Login name
        login: String,

        #[command(flatten)]
        resolver: ResolverArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that resolves accounts
#[derive(Args, Debug, Clone, Default)]
pub struct ResolverArgs {
    /// Config file (default: /etc/acctgids/config.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Fixed path of the getent utility
    #[arg(long)]
    pub getent_path: Option<PathBuf>,

    /// Root whose account database the fallback provider reads
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Account source to use
    #[arg(short, long, value_enum)]
    pub source: Option<SourcePreference>,

    /// Fail on invalid GIDs and malformed records instead of defaulting
    #[arg(long)]
    pub strict: bool,
}

impl ResolverArgs {
    /// Apply command-line overrides on top of a loaded config
    pub fn apply(&self, mut config: ResolverConfig) -> ResolverConfig {
        if let Some(path) = &self.getent_path {
            config.getent_path = path.clone();
        }
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(source) = self.source {
            config.source = source;
        }
        if self.strict {
            config.gid_policy = GidPolicy::Strict;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `{"gids": {"root": 0, ...}}`
    Json,
    /// One `login gid` pair per line
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_resolve() {
        let cli = Cli::parse_from([
            "acctgids",
            "resolve",
            "--format",
            "text",
            "--getent-path",
            "/opt/getent",
            "--source",
            "provider",
            "--strict",
        ]);

        match cli.command {
            Commands::Resolve {
                resolver,
                format,
                report,
            } => {
                assert_eq!(format, OutputFormat::Text);
                assert!(!report);
                let config = resolver.apply(ResolverConfig::default());
                assert_eq!(config.getent_path, PathBuf::from("/opt/getent"));
                assert_eq!(config.source, SourcePreference::Provider);
                assert_eq!(config.gid_policy, GidPolicy::Strict);
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_cli_parses_lookup() {
        let cli = Cli::parse_from(["acctgids", "-v", "lookup", "root", "--root", "/mnt/sysroot"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Lookup { login, resolver } => {
                assert_eq!(login, "root");
                assert_eq!(resolver.root, Some(PathBuf::from("/mnt/sysroot")));
            }
            _ => panic!("expected lookup"),
        }
    }

    #[test]
    fn test_apply_without_overrides_keeps_config() {
        let config = ResolverArgs::default().apply(ResolverConfig::default());
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
