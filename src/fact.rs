// src/fact.rs

//! The `gids` inventory fact
//!
//! Maps every login on the host to its primary GID:
//!
//! ```text
//! gids['root']  # => 0
//! ```
//!
//! The fact only applies to Linux hosts. Elsewhere it resolves to no value
//! rather than an error, so inventory runs on other kernels are unaffected.

use crate::accounts::{AccountGidResolver, Gid, Resolution};
use crate::error::{Error, Result};
use serde_json::{json, Value};
use tracing::debug;

/// Name the fact is published under
pub const FACT_NAME: &str = "gids";

/// Kernel the fact is confined to
pub const CONFINED_KERNEL: &str = "linux";

pub struct GidsFact {
    resolver: AccountGidResolver,
    kernel: String,
}

impl GidsFact {
    pub fn new(resolver: AccountGidResolver) -> Self {
        Self {
            resolver,
            kernel: std::env::consts::OS.to_string(),
        }
    }

    /// Override the detected kernel
    pub fn with_kernel(mut self, kernel: impl Into<String>) -> Self {
        self.kernel = kernel.into();
        self
    }

    pub fn name(&self) -> &'static str {
        FACT_NAME
    }

    /// Whether the fact applies to this host
    pub fn is_suitable(&self) -> bool {
        self.kernel.eq_ignore_ascii_case(CONFINED_KERNEL)
    }

    /// Resolve the fact, or `None` when the host is confined out
    pub fn resolve(&self) -> Result<Option<Resolution>> {
        if !self.is_suitable() {
            debug!("Fact '{}' not suitable for kernel '{}'", FACT_NAME, self.kernel);
            return Ok(None);
        }
        self.resolver.resolve().map(Some)
    }

    /// Fact value as published: `{"gids": {login: gid}}`, or `{"gids": null}`
    pub fn value(&self) -> Result<Value> {
        Ok(Self::render(self.resolve()?.as_ref()))
    }

    /// Published form of an already resolved fact
    pub fn render(resolution: Option<&Resolution>) -> Value {
        let gids = match resolution {
            Some(resolution) => Value::Object(
                resolution
                    .gids
                    .iter()
                    .map(|(login, gid)| (login.clone(), Value::from(*gid)))
                    .collect(),
            ),
            None => Value::Null,
        };
        json!({ FACT_NAME: gids })
    }

    /// Primary GID of a single login
    pub fn lookup(&self, login: &str) -> Result<Gid> {
        self.resolve()?
            .and_then(|resolution| resolution.gid(login))
            .ok_or_else(|| Error::UnknownLogin(login.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{passwd, AccountSource, GidPolicy, SourceKind};

    struct Fixture;

    impl AccountSource for Fixture {
        fn kind(&self) -> SourceKind {
            SourceKind::Getent
        }

        fn collect(&self, policy: GidPolicy) -> Result<Resolution> {
            passwd::collect(
                "root:x:0:0:root:/root:/bin/bash\n\
                 daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin\n",
                SourceKind::Getent,
                policy,
            )
        }
    }

    fn fact() -> GidsFact {
        GidsFact::new(AccountGidResolver::with_source(
            Box::new(Fixture),
            GidPolicy::Lenient,
        ))
    }

    #[test]
    fn test_value_shape() {
        let fact = fact().with_kernel("Linux");
        assert_eq!(fact.name(), "gids");
        assert_eq!(
            fact.value().unwrap(),
            json!({ "gids": { "root": 0, "daemon": 1 } })
        );
    }

    #[test]
    fn test_render_matches_value() {
        let fact = fact().with_kernel("linux");
        let resolution = fact.resolve().unwrap();

        assert_eq!(GidsFact::render(resolution.as_ref()), fact.value().unwrap());
        assert_eq!(GidsFact::render(None), json!({ "gids": null }));
    }

    #[test]
    fn test_lookup() {
        let fact = fact().with_kernel("linux");
        assert_eq!(fact.lookup("root").unwrap(), 0);
        assert_eq!(fact.lookup("daemon").unwrap(), 1);
        assert!(matches!(fact.lookup("nobody"), Err(Error::UnknownLogin(_))));
    }

    #[test]
    fn test_confined_to_linux() {
        let fact = fact().with_kernel("freebsd");
        assert!(!fact.is_suitable());
        assert!(fact.resolve().unwrap().is_none());
        assert_eq!(fact.value().unwrap(), json!({ "gids": null }));
    }
}
