// src/config.rs

//! Resolver configuration
//!
//! Configuration is optional. Without a config file the resolver behaves
//! exactly like the classic `gids` fact: it probes `/usr/bin/getent`, runs
//! `getent passwd` under the `C` locale, and falls back to the local account
//! provider when the utility is missing.
//!
//! # Example config.toml
//!
//! ```toml
//! # Enumeration utility (fixed path, never searched in PATH)
//! getent_path = "/usr/bin/getent"
//! database = "passwd"
//! locale = "C"
//!
//! # Root whose account database the fallback provider reads
//! root = "/"
//!
//! # auto | getent | provider
//! source = "auto"
//!
//! # lenient | strict
//! gid_policy = "lenient"
//! ```

use crate::accounts::{GidPolicy, SourcePreference};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default path for the resolver config file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/acctgids/config.toml";

/// Well-known location of the fast enumeration utility
pub const DEFAULT_GETENT_PATH: &str = "/usr/bin/getent";

/// Database argument passed to the enumeration utility
pub const DEFAULT_DATABASE: &str = "passwd";

/// Locale forced on the enumeration utility
pub const DEFAULT_LOCALE: &str = "C";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Fixed path of the enumeration utility
    pub getent_path: PathBuf,

    /// Database name requested from the utility
    pub database: String,

    /// Value of `LC_ALL` for the utility's environment
    pub locale: String,

    /// Root filesystem used by the fallback provider
    pub root: PathBuf,

    /// Which account source to use
    pub source: SourcePreference,

    /// How invalid GIDs and malformed records are handled
    pub gid_policy: GidPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            getent_path: PathBuf::from(DEFAULT_GETENT_PATH),
            database: DEFAULT_DATABASE.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            root: PathBuf::from("/"),
            source: SourcePreference::Auto,
            gid_policy: GidPolicy::Lenient,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the built-in defaults. A missing file
    /// that was named explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    debug!("No config at {}, using defaults", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_classic_fact() {
        let config = ResolverConfig::default();
        assert_eq!(config.getent_path, PathBuf::from("/usr/bin/getent"));
        assert_eq!(config.database, "passwd");
        assert_eq!(config.locale, "C");
        assert_eq!(config.source, SourcePreference::Auto);
        assert_eq!(config.gid_policy, GidPolicy::Lenient);
        assert_eq!(config.root, PathBuf::from("/"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ResolverConfig::from_toml(
            r#"
            getent_path = "/opt/bin/getent"
            gid_policy = "strict"
            "#,
        )
        .unwrap();

        assert_eq!(config.getent_path, PathBuf::from("/opt/bin/getent"));
        assert_eq!(config.gid_policy, GidPolicy::Strict);
        assert_eq!(config.database, "passwd");
        assert_eq!(config.source, SourcePreference::Auto);
    }

    #[test]
    fn test_source_preference_parsing() {
        let config =
            ResolverConfig::from_toml("source = \"provider\"\nroot = \"/mnt/target\"").unwrap();
        assert_eq!(config.source, SourcePreference::Provider);
        assert_eq!(config.root, PathBuf::from("/mnt/target"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = ResolverConfig::from_toml("source = \"ldap\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        let err = ResolverConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "locale = \"POSIX\"\n").unwrap();

        let config = ResolverConfig::load(Some(&path)).unwrap();
        assert_eq!(config.locale, "POSIX");
    }
}
