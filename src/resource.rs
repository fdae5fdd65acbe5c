use reqwest::RequestBuilder;
use url::Url;

use crate::error::Result;

/// How requests are authenticated against the remote service
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    Bearer(String),
    None,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secrets
        match self {
            Credentials::Basic { username, .. } => write!(f, "Basic({}, ***)", username),
            Credentials::Bearer(_) => write!(f, "Bearer(***)"),
            Credentials::None => write!(f, "None"),
        }
    }
}

/// Just a wrapper around the base URL of the REST API and credentials
#[derive(Clone, Debug)]
pub struct Resource {
    base: Url,
    credentials: Credentials,
}

impl Resource {
    pub fn new(mut base: Url, credentials: Credentials) -> Self {
        // So that `join` appends to the last path segment instead of replacing it
        if base.path().ends_with('/') == false {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base, credentials }
    }

    pub fn base(&self) -> &Url { &self.base }
    pub fn credentials(&self) -> &Credentials { &self.credentials }

    /// Build the URL of an endpoint below the base URL, e.g. `events` or `venues/by-slug/hall`
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Add the authentication headers to a request
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Basic { username, password } => request.basic_auth(username, Some(password)),
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::None => request,
        }
    }
}
