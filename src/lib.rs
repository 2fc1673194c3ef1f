// src/lib.rs

//! acctgids - login to primary GID inventory fact
//!
//! Builds a mapping from every login in the local account database to its
//! primary GID, for consumption by configuration-management and inventory
//! tooling.
//!
//! # Architecture
//!
//! - Fast path: one `getent passwd` subprocess, run under `LC_ALL=C`
//! - Fallback: an account provider walked instance by instance
//! - Source chosen once, at construction, by an existence test on the utility
//! - Lossy coercions (invalid GIDs, malformed lines) are reported, not hidden

pub mod accounts;
pub mod config;
mod error;
pub mod fact;

pub use accounts::{
    AccountGidResolver, AccountInstance, AccountProperty, AccountProvider, AccountRecord,
    AccountSource, AccountState, DefaultedGid, GetentSource, Gid, GidMapping, GidPolicy,
    LocalAccountProvider, ProviderSource, Resolution, SkippedRecord, SourceKind,
    SourcePreference, coerce_gid,
};
pub use config::{ResolverConfig, DEFAULT_CONFIG_PATH};
pub use error::{Error, Result};
pub use fact::{GidsFact, FACT_NAME};
