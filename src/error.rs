// src/error.rs

//! Error types for account resolution

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving login to GID mappings
#[derive(Debug, Error)]
pub enum Error {
    /// The enumeration utility exists but could not be started
    #[error("Failed to run {}: {source}", .path.display())]
    UtilitySpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The enumeration utility ran but reported failure
    #[error("{} exited with code {code:?}: {stderr}", .path.display())]
    UtilityFailed {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// The enumeration utility produced output that is not UTF-8
    #[error("Unreadable output from {}: {source}", .path.display())]
    UtilityOutput {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A record with fewer than four colon-separated fields (strict policy only)
    #[error("Malformed account record at line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },

    /// A GID that is not an unsigned 32-bit integer (strict policy only)
    #[error("Invalid GID {value:?} for login '{login}'")]
    InvalidGid { login: String, value: String },

    /// The account provider could not answer a query
    #[error("Account provider error: {0}")]
    Provider(String),

    /// The account provider could not read its backing file
    #[error("Failed to read {}: {source}", .path.display())]
    ProviderIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Lookup of a login that is not in the mapping
    #[error("Unknown login: {0}")]
    UnknownLogin(String),
}

/// Result type for account resolution
pub type Result<T> = std::result::Result<T, Error>;
