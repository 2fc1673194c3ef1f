// src/accounts/getent.rs

//! Fast account source backed by `getent passwd`
//!
//! The utility runs with `LC_ALL` forced on the child only, so its output
//! uses untranslated formatting without touching this process's locale.

use super::resolver::{AccountSource, SourceKind};
use super::{passwd, GidPolicy, Resolution};
use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Runs the enumeration utility and parses its output
#[derive(Debug, Clone)]
pub struct GetentSource {
    utility: PathBuf,
    database: String,
    locale: String,
}

impl GetentSource {
    pub fn new(utility: impl Into<PathBuf>) -> Self {
        Self {
            utility: utility.into(),
            database: crate::config::DEFAULT_DATABASE.to_string(),
            locale: crate::config::DEFAULT_LOCALE.to_string(),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            utility: config.getent_path.clone(),
            database: config.database.clone(),
            locale: config.locale.clone(),
        }
    }

    /// Set the database argument (default `passwd`)
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the child's `LC_ALL` (default `C`)
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn utility(&self) -> &Path {
        &self.utility
    }

    /// Build the subprocess invocation
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.utility);
        cmd.arg(&self.database)
            .env("LC_ALL", &self.locale)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// Run the utility and return its complete standard output
    pub fn dump(&self) -> Result<String> {
        debug!(
            "Running {} {} (LC_ALL={})",
            self.utility.display(),
            self.database,
            self.locale
        );

        let output = self.command().output().map_err(|source| Error::UtilitySpawn {
            path: self.utility.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(Error::UtilityFailed {
                path: self.utility.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|source| Error::UtilityOutput {
            path: self.utility.clone(),
            source,
        })
    }
}

impl AccountSource for GetentSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Getent
    }

    fn collect(&self, policy: GidPolicy) -> Result<Resolution> {
        let text = self.dump()?;
        let resolution = passwd::collect(&text, SourceKind::Getent, policy)?;
        info!(
            "Resolved {} accounts via {}",
            resolution.gids.len(),
            self.utility.display()
        );
        Ok(resolution)
    }
}
