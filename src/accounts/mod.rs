// src/accounts/mod.rs

//! Login to primary GID resolution
//!
//! Two account sources can produce the mapping:
//!
//! - **getent**: a single `getent passwd` subprocess whose colon-delimited
//!   output is parsed line by line. Fast even when accounts live in LDAP.
//! - **provider**: an [`AccountProvider`] that lists account instances and
//!   retrieves each instance's live state. One round trip per account, so
//!   it is only used when the utility is missing.
//!
//! Both sources share the same GID coercion: a field that is not an unsigned
//! 32-bit integer becomes `0` under [`GidPolicy::Lenient`] and is recorded
//! in [`Resolution::defaulted`], or aborts resolution under
//! [`GidPolicy::Strict`].

mod getent;
pub mod passwd;
mod provider;
mod resolver;

pub use getent::GetentSource;
pub use provider::{
    AccountInstance, AccountProperty, AccountProvider, AccountState, LocalAccountProvider,
    ProviderSource,
};
pub use resolver::{AccountGidResolver, AccountSource, SourceKind, SourcePreference};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Numeric group identifier (`gid_t` on Linux)
pub type Gid = u32;

/// Login name to primary GID
pub type GidMapping = BTreeMap<String, Gid>;

/// GID assigned when the raw field cannot be parsed
pub const DEFAULT_GID: Gid = 0;

/// A single account row before GID coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub login: String,
    pub gid_field: String,
}

/// How invalid GIDs and malformed records are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GidPolicy {
    /// Invalid GIDs become 0, malformed lines are skipped; both are reported
    #[default]
    Lenient,
    /// The first invalid GID or malformed line fails the whole resolution
    Strict,
}

/// A login whose GID field could not be parsed and was mapped to 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultedGid {
    pub login: String,
    pub raw: String,
}

/// An input line that was not an account record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// 1-based line number in the utility output
    pub line: usize,
    pub content: String,
}

/// Result of one resolution: the mapping plus what was lossy about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub source: SourceKind,
    pub gids: GidMapping,
    pub defaulted: Vec<DefaultedGid>,
    pub skipped: Vec<SkippedRecord>,
}

impl Resolution {
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            gids: GidMapping::new(),
            defaulted: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Record `login -> raw` under `policy`.
    ///
    /// Later records for the same login replace earlier ones, including
    /// any defaulted entry the earlier record left behind.
    pub fn record(&mut self, login: &str, raw: &str, policy: GidPolicy) -> Result<()> {
        self.defaulted.retain(|d| d.login != login);

        let gid = match coerce_gid(raw) {
            Some(gid) => gid,
            None => {
                if policy == GidPolicy::Strict {
                    return Err(Error::InvalidGid {
                        login: login.to_string(),
                        value: raw.to_string(),
                    });
                }
                warn!("Login '{}' has invalid GID {:?}, using {}", login, raw, DEFAULT_GID);
                self.defaulted.push(DefaultedGid {
                    login: login.to_string(),
                    raw: raw.to_string(),
                });
                DEFAULT_GID
            }
        };

        self.gids.insert(login.to_string(), gid);
        Ok(())
    }

    /// Record a line that is not an account record
    pub fn skip(&mut self, line: usize, content: &str, policy: GidPolicy) -> Result<()> {
        if policy == GidPolicy::Strict {
            return Err(Error::MalformedRecord {
                line,
                content: content.to_string(),
            });
        }
        warn!("Skipping malformed account record at line {}: {:?}", line, content);
        self.skipped.push(SkippedRecord {
            line,
            content: content.to_string(),
        });
        Ok(())
    }

    /// Primary GID of `login`
    pub fn gid(&self, login: &str) -> Option<Gid> {
        self.gids.get(login).copied()
    }

    /// True when every record was taken verbatim
    pub fn is_exact(&self) -> bool {
        self.defaulted.is_empty() && self.skipped.is_empty()
    }

    pub fn into_mapping(self) -> GidMapping {
        self.gids
    }
}

/// Parse a raw GID field.
///
/// Surrounding whitespace and a leading `+` are accepted. Empty,
/// non-numeric, negative and out-of-range values return `None`.
/// Stricter than numeric-prefix parsing on purpose: `"12abc"` is invalid,
/// not 12.
pub fn coerce_gid(raw: &str) -> Option<Gid> {
    raw.trim().parse::<Gid>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_gid() {
        assert_eq!(coerce_gid("0"), Some(0));
        assert_eq!(coerce_gid("100"), Some(100));
        assert_eq!(coerce_gid(" 42 "), Some(42));
        assert_eq!(coerce_gid("+7"), Some(7));
        assert_eq!(coerce_gid("4294967295"), Some(u32::MAX));
        assert_eq!(coerce_gid(""), None);
        assert_eq!(coerce_gid("abc"), None);
        assert_eq!(coerce_gid("-1"), None);
        assert_eq!(coerce_gid("4294967296"), None);
        assert_eq!(coerce_gid("12abc"), None);
    }

    #[test]
    fn test_record_last_occurrence_wins() {
        let mut resolution = Resolution::new(SourceKind::Getent);
        resolution.record("alice", "100", GidPolicy::Lenient).unwrap();
        resolution.record("alice", "200", GidPolicy::Lenient).unwrap();

        assert_eq!(resolution.gids.len(), 1);
        assert_eq!(resolution.gid("alice"), Some(200));
        assert!(resolution.is_exact());
    }

    #[test]
    fn test_record_invalid_gid_lenient() {
        let mut resolution = Resolution::new(SourceKind::Getent);
        resolution.record("bob", "", GidPolicy::Lenient).unwrap();
        resolution.record("carol", "abc", GidPolicy::Lenient).unwrap();

        assert_eq!(resolution.gid("bob"), Some(0));
        assert_eq!(resolution.gid("carol"), Some(0));
        assert_eq!(resolution.defaulted.len(), 2);
        assert_eq!(resolution.defaulted[1].raw, "abc");
        assert!(!resolution.is_exact());
    }

    #[test]
    fn test_valid_duplicate_clears_defaulted() {
        let mut resolution = Resolution::new(SourceKind::Getent);
        resolution.record("bob", "oops", GidPolicy::Lenient).unwrap();
        resolution.record("bob", "1001", GidPolicy::Lenient).unwrap();

        assert_eq!(resolution.gid("bob"), Some(1001));
        assert!(resolution.defaulted.is_empty());
    }

    #[test]
    fn test_record_invalid_gid_strict() {
        let mut resolution = Resolution::new(SourceKind::Provider);
        let err = resolution.record("bob", "-5", GidPolicy::Strict).unwrap_err();

        match err {
            Error::InvalidGid { login, value } => {
                assert_eq!(login, "bob");
                assert_eq!(value, "-5");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(resolution.gids.is_empty());
    }

    #[test]
    fn test_skip_policy() {
        let mut resolution = Resolution::new(SourceKind::Getent);
        resolution.skip(3, "garbage", GidPolicy::Lenient).unwrap();
        assert_eq!(
            resolution.skipped,
            vec![SkippedRecord {
                line: 3,
                content: "garbage".to_string()
            }]
        );

        let err = resolution.skip(4, "more", GidPolicy::Strict).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 4, .. }));
    }
}
