//! Who the map is being built for.

use std::env;
use std::fmt;

use crate::error::{MapError, Result};

pub const DEFAULT_USER_ENV_VAR: &str = "SPENDCITY_USER";

/// Opaque user identifier. It names the user's spending file, so it may not
/// be blank or contain path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into().trim().to_string();
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(MapError::MissingUserContext);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait IdentityProvider {
    fn current_user(&self) -> Result<UserId>;
}

/// Identity handed in directly, e.g. from a command-line flag.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    pub fn new(id: Option<String>) -> Self {
        Self(id)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Result<UserId> {
        match &self.0 {
            Some(id) => UserId::new(id.as_str()),
            None => Err(MapError::MissingUserContext),
        }
    }
}

/// Identity read from an environment variable at call time.
#[derive(Debug, Clone)]
pub struct EnvIdentity {
    var: String,
}

impl EnvIdentity {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_USER_ENV_VAR)
    }
}

impl IdentityProvider for EnvIdentity {
    fn current_user(&self) -> Result<UserId> {
        let id = env::var(&self.var).map_err(|_| MapError::MissingUserContext)?;
        UserId::new(id)
    }
}
