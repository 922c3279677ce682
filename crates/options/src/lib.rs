//! Connection configuration for the hellotable walkthrough.
//!
//! This crate provides the [`Backend`] and [`ConnectOptions`] types used to
//! decide which service to talk to and how to authenticate.

use std::time::Duration;
use thiserror::Error;

/// Default endpoint of the administrative API.
pub const DEFAULT_ADMIN_ENDPOINT: &str = "https://bigtableadmin.googleapis.com";

/// Default endpoint of the data API.
pub const DEFAULT_DATA_ENDPOINT: &str = "https://bigtable.googleapis.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the admin endpoint.
pub const ENV_ADMIN_ENDPOINT: &str = "BIGTABLE_ADMIN_ENDPOINT";

/// Environment variable overriding the data endpoint.
pub const ENV_DATA_ENDPOINT: &str = "BIGTABLE_DATA_ENDPOINT";

/// Environment variable holding an OAuth2 bearer token.
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Which implementation of the client traits to connect with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The managed service over its JSON API
    Rest,
    /// An in-process store that lives as long as the clients
    Memory,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Rest
    }
}

/// Invalid or incomplete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// A required setting was left empty
    #[error("The {0} flag is required.")]
    Missing(&'static str),

    /// An endpoint is not an http(s) URL
    #[error("invalid endpoint {0:?}: expected an http:// or https:// URL")]
    InvalidEndpoint(String),
}

/// Options for connecting to an instance.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use hellotable_options::{Backend, ConnectOptions};
///
/// let opts = ConnectOptions::new("my-project", "my-instance").backend(Backend::Memory);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Cloud project id (required)
    pub project: String,
    /// Instance id inside the project (required)
    pub instance: String,
    /// Implementation to connect with
    pub backend: Backend,
    /// Base URL of the administrative API
    pub admin_endpoint: String,
    /// Base URL of the data API
    pub data_endpoint: String,
    /// OAuth2 bearer token; requests go out unauthenticated without one
    pub access_token: Option<String>,
    /// App profile routing data requests
    pub app_profile_id: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// `User-Agent` header sent with every request
    pub user_agent: String,
}

impl ConnectOptions {
    /// Defaults for the given project and instance.
    pub fn new(project: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            instance: instance.into(),
            ..Self::default()
        }
    }

    /// Start from defaults and apply the endpoint and token environment overrides.
    pub fn from_env(project: impl Into<String>, instance: impl Into<String>) -> Self {
        Self::new(project, instance).with_env_lookup(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(endpoint) = lookup(ENV_ADMIN_ENDPOINT) {
            self.admin_endpoint = endpoint;
        }
        if let Some(endpoint) = lookup(ENV_DATA_ENDPOINT) {
            self.data_endpoint = endpoint;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
        self
    }

    /// Choose the implementation.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Override the admin API base URL.
    pub fn admin_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.admin_endpoint = endpoint.into();
        self
    }

    /// Override the data API base URL.
    pub fn data_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.data_endpoint = endpoint.into();
        self
    }

    /// Authenticate with a bearer token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Route data requests through an app profile.
    pub fn app_profile_id(mut self, profile: impl Into<String>) -> Self {
        self.app_profile_id = Some(profile.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Resource path of the instance, `projects/<p>/instances/<i>`.
    pub fn instance_path(&self) -> String {
        format!("projects/{}/instances/{}", self.project, self.instance)
    }

    /// Resource path of a table inside the instance.
    pub fn table_path(&self, table: &str) -> String {
        format!("{}/tables/{}", self.instance_path(), table)
    }

    /// Check required settings, reporting the first one missing.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.project.trim().is_empty() {
            return Err(OptionsError::Missing("project"));
        }
        if self.instance.trim().is_empty() {
            return Err(OptionsError::Missing("instance"));
        }
        if self.backend == Backend::Rest {
            for endpoint in [&self.admin_endpoint, &self.data_endpoint] {
                if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                    return Err(OptionsError::InvalidEndpoint(endpoint.clone()));
                }
            }
        }
        Ok(())
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            project: String::new(),
            instance: String::new(),
            backend: Backend::default(),
            admin_endpoint: DEFAULT_ADMIN_ENDPOINT.to_string(),
            data_endpoint: DEFAULT_DATA_ENDPOINT.to_string(),
            access_token: None,
            app_profile_id: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("hellotable/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
