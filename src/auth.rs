// src/auth.rs

//! Steam credentials.

use std::fmt;

use crate::errors::{DeployError, Result};
use crate::injectable::InjectableFile;

/// Environment variable holding the account password.
pub const PASSWORD_ENV: &str = "STEAM_PASSWORD";
/// Environment variable holding a base64-encoded session `config.vdf`.
pub const AUTH_VDF_ENV: &str = "STEAM_AUTH_VDF";

/// How `steamcmd` proves who it is.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Passed on the command line after the user name.
    Password(String),
    /// A logged-in session, written to `config/config.vdf` under the steam
    /// home before `steamcmd` runs.
    SessionVdf(InjectableFile),
    /// Whatever session is already cached in the installation.
    Cached,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Auth {
    username: String,
    credential: Credential,
}

impl Auth {
    pub fn new(username: impl Into<String>, credential: Credential) -> Self {
        Self {
            username: username.into(),
            credential,
        }
    }

    pub fn with_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(username, Credential::Password(password.into()))
    }

    pub fn with_session_vdf(username: impl Into<String>, vdf: InjectableFile) -> Self {
        Self::new(username, Credential::SessionVdf(vdf))
    }

    pub fn cached(username: impl Into<String>) -> Self {
        Self::new(username, Credential::Cached)
    }

    /// Resolve credentials from already-read environment values.
    ///
    /// Supplying both a password and a session VDF is rejected. With
    /// `cached` set the environment is ignored. Without either value the
    /// cached session is used.
    pub fn from_env_values(
        username: &str,
        password: Option<String>,
        vdf_base64: Option<String>,
        cached: bool,
    ) -> Result<Self> {
        let password = password.filter(|p| !p.is_empty());
        let vdf_base64 = vdf_base64.filter(|v| !v.trim().is_empty());

        if password.is_some() && vdf_base64.is_some() {
            return Err(DeployError::ConfigError(format!(
                "{PASSWORD_ENV} and {AUTH_VDF_ENV} are mutually exclusive; set only one"
            )));
        }

        if cached {
            return Ok(Self::cached(username));
        }

        match (password, vdf_base64) {
            (_, Some(vdf)) => Ok(Self::with_session_vdf(
                username,
                InjectableFile::from_base64(&vdf)?,
            )),
            (Some(password), None) => Ok(Self::with_password(username, password)),
            (None, None) => Ok(Self::cached(username)),
        }
    }

    /// [`Auth::from_env_values`] over `STEAM_PASSWORD` and `STEAM_AUTH_VDF`.
    pub fn from_env(username: &str, cached: bool) -> Result<Self> {
        Self::from_env_values(
            username,
            std::env::var(PASSWORD_ENV).ok(),
            std::env::var(AUTH_VDF_ENV).ok(),
            cached,
        )
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn password(&self) -> Option<&str> {
        match &self.credential {
            Credential::Password(password) => Some(password),
            _ => None,
        }
    }

    pub fn session_vdf(&self) -> Option<&InjectableFile> {
        match &self.credential {
            Credential::SessionVdf(vdf) => Some(vdf),
            _ => None,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Password(_) => f.write_str("Password(<redacted>)"),
            Credential::SessionVdf(vdf) => f.debug_tuple("SessionVdf").field(vdf).finish(),
            Credential::Cached => f.write_str("Cached"),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("username", &self.username)
            .field("credential", &self.credential)
            .finish()
    }
}
