// src/accounts/provider.rs

//! Account-provider fallback
//!
//! Used when the enumeration utility is missing. The provider lists every
//! known account instance, then each instance's live state is retrieved one
//! at a time. With a directory service behind NSS every retrieval is a
//! network round trip, which is why this path is only the fallback.

use super::resolver::{AccountSource, SourceKind};
use super::{passwd, GidPolicy, Resolution};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::ffi::CStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::{debug, info};

/// Properties an account provider can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum AccountProperty {
    Name,
    Uid,
    Gid,
    Comment,
    Home,
    Shell,
}

/// An account known to a provider, identified by login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInstance {
    pub name: String,
}

impl AccountInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Current property values of one account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    properties: HashMap<AccountProperty, String>,
}

impl AccountState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: AccountProperty, value: impl Into<String>) -> Self {
        self.properties.insert(property, value.into());
        self
    }

    pub fn set(&mut self, property: AccountProperty, value: impl Into<String>) {
        self.properties.insert(property, value.into());
    }

    pub fn property(&self, property: AccountProperty) -> Option<&str> {
        self.properties.get(&property).map(String::as_str)
    }
}

/// A pluggable source of account instances and their live state
pub trait AccountProvider {
    /// List every account instance the provider knows about
    fn instances(&self) -> Result<Vec<AccountInstance>>;

    /// Fetch the current state of one instance
    fn retrieve(&self, instance: &AccountInstance) -> Result<AccountState>;
}

/// Provider backed by the local account database
///
/// On the live root (`/`) instances are enumerated and retrieved through
/// NSS, so accounts served by LDAP or SSSD are listed with their directory
/// values. On any other root instances come from the target's
/// `etc/passwd`, which is re-read for every retrieval, leaving the host
/// untouched. NIS compat entries (`+`, `-name`) are never instances.
#[derive(Debug, Clone)]
pub struct LocalAccountProvider {
    root: PathBuf,
}

impl LocalAccountProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn is_live_root(&self) -> bool {
        self.root == Path::new("/")
    }

    fn passwd_path(&self) -> PathBuf {
        self.root.join("etc/passwd")
    }

    fn read_passwd(&self) -> Result<String> {
        let path = self.passwd_path();
        fs::read_to_string(&path).map_err(|source| Error::ProviderIo { path, source })
    }

    fn retrieve_live(&self, name: &str) -> Result<AccountState> {
        let user = nix::unistd::User::from_name(name)
            .map_err(|e| Error::Provider(format!("Failed to look up user '{}': {}", name, e)))?
            .ok_or_else(|| Error::Provider(format!("User '{}' no longer exists", name)))?;

        Ok(AccountState::new()
            .with(AccountProperty::Name, user.name)
            .with(AccountProperty::Uid, user.uid.as_raw().to_string())
            .with(AccountProperty::Gid, user.gid.as_raw().to_string())
            .with(AccountProperty::Comment, user.gecos.to_string_lossy())
            .with(AccountProperty::Home, user.dir.to_string_lossy())
            .with(AccountProperty::Shell, user.shell.to_string_lossy()))
    }

    fn retrieve_in_target(&self, name: &str) -> Result<AccountState> {
        let content = self.read_passwd()?;

        // Last matching entry, same as the fast path
        let fields = content
            .lines()
            .filter_map(|line| {
                let fields: Vec<&str> = line.trim().split(':').collect();
                (fields.first() == Some(&name)).then_some(fields)
            })
            .last()
            .ok_or_else(|| {
                Error::Provider(format!(
                    "User '{}' not found in {}",
                    name,
                    self.passwd_path().display()
                ))
            })?;

        let mut state = AccountState::new().with(AccountProperty::Name, name);
        let layout = [
            (2, AccountProperty::Uid),
            (3, AccountProperty::Gid),
            (4, AccountProperty::Comment),
            (5, AccountProperty::Home),
            (6, AccountProperty::Shell),
        ];
        for (idx, property) in layout {
            if let Some(value) = fields.get(idx) {
                state.set(property, *value);
            }
        }
        Ok(state)
    }
}

impl AccountProvider for LocalAccountProvider {
    fn instances(&self) -> Result<Vec<AccountInstance>> {
        let names = if self.is_live_root() {
            enumerate_nss()
        } else {
            self.read_passwd()?
                .lines()
                .filter_map(passwd::parse_line)
                .map(|record| record.login)
                .collect()
        };

        let mut instances: Vec<AccountInstance> = Vec::new();
        for name in names {
            if is_compat_entry(&name) {
                debug!("Ignoring NIS compat entry '{}'", name);
                continue;
            }
            if !instances.iter().any(|i| i.name == name) {
                instances.push(AccountInstance::new(name));
            }
        }

        debug!(
            "Listed {} account instances under {}",
            instances.len(),
            self.root.display()
        );
        Ok(instances)
    }

    fn retrieve(&self, instance: &AccountInstance) -> Result<AccountState> {
        if self.is_live_root() {
            self.retrieve_live(&instance.name)
        } else {
            self.retrieve_in_target(&instance.name)
        }
    }
}

/// `+`/`-` lines of nsswitch `compat` mode, which name no real account
fn is_compat_entry(name: &str) -> bool {
    name.is_empty() || name.starts_with('+') || name.starts_with('-')
}

/// Serializes walks of the process-global `getpwent` cursor
static PWENT_LOCK: Mutex<()> = Mutex::new(());

/// Every login NSS knows about, including directory-service accounts
fn enumerate_nss() -> Vec<String> {
    let _guard = PWENT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let mut names = Vec::new();

    // SAFETY: the cursor is only touched while PWENT_LOCK is held, and each
    // entry is copied out before the next getpwent call invalidates it.
    unsafe {
        libc::setpwent();
        loop {
            let entry = libc::getpwent();
            if entry.is_null() {
                break;
            }
            let name = (*entry).pw_name;
            if !name.is_null() {
                names.push(CStr::from_ptr(name).to_string_lossy().into_owned());
            }
        }
        libc::endpwent();
    }

    names
}

/// Account source that walks a provider instance by instance
pub struct ProviderSource<P> {
    provider: P,
}

impl<P: AccountProvider> ProviderSource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: AccountProvider> AccountSource for ProviderSource<P> {
    fn kind(&self) -> SourceKind {
        SourceKind::Provider
    }

    fn collect(&self, policy: GidPolicy) -> Result<Resolution> {
        let mut resolution = Resolution::new(SourceKind::Provider);

        for instance in self.provider.instances()? {
            let state = self.provider.retrieve(&instance)?;
            let raw = state.property(AccountProperty::Gid).unwrap_or_default();
            resolution.record(&instance.name, raw, policy)?;
        }

        info!("Resolved {} accounts via account provider", resolution.gids.len());
        Ok(resolution)
    }
}
