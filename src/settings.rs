//! Settings of a run: where the remote service is, and which templates to synchronize

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::paging::PagingOptions;
use crate::references::ReferenceDefaults;
use crate::resource::Credentials;
use crate::template::{validate_templates, EventTemplate, RawTemplate};

pub const USER_VAR: &str = "WORDPRESS_USER";
pub const PASSWORD_VAR: &str = "WORDPRESS_PASSWORD";
pub const TOKEN_VAR: &str = "WORDPRESS_TOKEN";
pub const SERVER_VAR: &str = "WORDPRESS_SERVER";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the events REST API, e.g. `https://example.org/wp-json/tribe/events/v1/`
    pub url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SyncSettings {
    /// Seconds to wait between two dates, to spare the remote service
    #[serde(default = "default_delay")]
    pub delay_secs: u64,
    #[serde(flatten)]
    pub paging: PagingOptions,
}

fn default_delay() -> u64 { 1 }

impl Default for SyncSettings {
    fn default() -> Self {
        Self { delay_secs: default_delay(), paging: PagingOptions::default() }
    }
}

/// The content of a settings file
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub defaults: ReferenceDefaults,
    #[serde(default)]
    pub sync: SyncSettings,
    /// In evaluation order
    #[serde(default, rename = "template")]
    pub templates: Vec<RawTemplate>,
}

impl FromStr for Settings {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| Error::Config(err.to_string()))
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("Unable to read {}: {}", path.display(), err)))?;
        content.parse()
    }

    /// The validated templates
    pub fn templates(&self) -> Result<Vec<EventTemplate>> {
        validate_templates(self.templates.clone())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.sync.delay_secs)
    }

    /// The base URL of the remote service. `lookup` (usually the environment) may override the configured one.
    pub fn server_url<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(SERVER_VAR)
            .filter(|url| url.trim().is_empty() == false)
            .or_else(|| self.server.url.clone())
            .ok_or_else(|| Error::Config(format!("No server URL: set {} or [server] url", SERVER_VAR)))
    }
}

/// Credentials from `lookup` (usually the environment).
///
/// A token takes precedence over a user name and a password.
pub fn credentials_from_lookup<F>(lookup: F) -> Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(TOKEN_VAR) {
        return Ok(Credentials::Bearer(token));
    }

    match (lookup(USER_VAR), lookup(PASSWORD_VAR)) {
        (Some(username), Some(password)) => Ok(Credentials::Basic { username, password }),
        (None, None) => Ok(Credentials::None),
        (Some(_), None) => Err(Error::Config(format!("{} is set, but {} is not", USER_VAR, PASSWORD_VAR))),
        (None, Some(_)) => Err(Error::Config(format!("{} is set, but {} is not", PASSWORD_VAR, USER_VAR))),
    }
}
