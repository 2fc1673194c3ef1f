// src/accounts/resolver.rs

//! Account source selection and resolution

use super::{GetentSource, GidPolicy, LocalAccountProvider, ProviderSource, Resolution};
use crate::config::ResolverConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum_macros::Display;
use tracing::{debug, info, warn};

/// Where a resolution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `getent passwd` subprocess
    Getent,
    /// Per-instance account provider retrieval
    Provider,
}

/// Requested account source
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SourcePreference {
    /// getent when the utility exists, otherwise the provider
    #[default]
    Auto,
    /// Always getent
    Getent,
    /// Always the provider
    Provider,
}

/// Something that can enumerate accounts into a [`Resolution`]
pub trait AccountSource {
    fn kind(&self) -> SourceKind;

    /// Build a complete resolution. Any failure aborts without a partial result.
    fn collect(&self, policy: GidPolicy) -> Result<Resolution>;
}

/// Resolves every local account to its primary GID
///
/// The source is chosen once, when the resolver is built. Every call to
/// [`resolve`](Self::resolve) then produces a fresh mapping.
pub struct AccountGidResolver {
    source: Box<dyn AccountSource>,
    policy: GidPolicy,
}

impl AccountGidResolver {
    /// Build a resolver, probing for the utility with a plain existence test
    pub fn new(config: &ResolverConfig) -> Self {
        Self::with_probe(config, |path| path.exists())
    }

    /// Build a resolver with an injected availability check
    pub fn with_probe<F>(config: &ResolverConfig, probe: F) -> Self
    where
        F: Fn(&Path) -> bool,
    {
        let provider = LocalAccountProvider::new(config.root.clone());
        Self::with_probe_and_provider(config, probe, provider)
    }

    /// Build a resolver with an injected availability check and fallback provider
    pub fn with_probe_and_provider<F, P>(config: &ResolverConfig, probe: F, provider: P) -> Self
    where
        F: Fn(&Path) -> bool,
        P: super::AccountProvider + 'static,
    {
        let use_getent = match config.source {
            SourcePreference::Getent => true,
            SourcePreference::Provider => false,
            SourcePreference::Auto => {
                let available = probe(&config.getent_path);
                if !available {
                    warn!(
                        "{} not found, falling back to the account provider",
                        config.getent_path.display()
                    );
                }
                available
            }
        };

        let source: Box<dyn AccountSource> = if use_getent {
            Box::new(GetentSource::from_config(config))
        } else {
            Box::new(ProviderSource::new(provider))
        };

        Self::with_source(source, config.gid_policy)
    }

    /// Build a resolver around an explicit source
    pub fn with_source(source: Box<dyn AccountSource>, policy: GidPolicy) -> Self {
        info!("Using {} account source", source.kind());
        Self { source, policy }
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source.kind()
    }

    pub fn policy(&self) -> GidPolicy {
        self.policy
    }

    /// Produce the login to GID mapping
    pub fn resolve(&self) -> Result<Resolution> {
        debug!("Resolving account GIDs via {} ({:?})", self.source.kind(), self.policy);
        self.source.collect(self.policy)
    }
}
