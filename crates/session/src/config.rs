//! Client configuration
//!
//! Values are layered: built-in defaults, then an optional file, then
//! `INKPOST_*` environment variables.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use inkpost_http::client::DEFAULT_BASE_URL;
use inkpost_http::{ApiClient, ClientError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Authentication timing constants
pub struct AuthConfig;

impl AuthConfig {
    /// How often the session credential is renewed
    pub const TOKEN_REFRESH_INTERVAL: Duration = Duration::from_secs(14 * 60);

    /// Lifetime of an access credential issued by the API
    pub const ACCESS_TOKEN_LIFETIME: Duration = Duration::from_secs(15 * 60);

    /// Upper bound on a single request, including its response body
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Environment variable prefix for every setting
pub const ENV_PREFIX: &str = "INKPOST";

/// Runtime configuration for the API client and session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the blog API
    pub api_url: String,

    /// Seconds between background credential refreshes
    pub refresh_interval_secs: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            refresh_interval_secs: AuthConfig::TOKEN_REFRESH_INTERVAL.as_secs(),
            request_timeout_secs: AuthConfig::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from defaults, a file and the environment
    ///
    /// Without an explicit path an `inkpost.{toml,json,yaml}` in the working
    /// directory is picked up if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or the result is invalid
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name("inkpost").required(false),
        };

        let builder = Self::defaults()?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        Self::from_builder(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Self::default();

        config::Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("refresh_interval_secs", defaults.refresh_interval_secs)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the API client and scheduler rely on
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| ConfigError::Message(format!("api_url {}: {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Message(format!(
                "api_url must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Message(
                "refresh_interval_secs must be greater than zero".into(),
            ));
        }
        if self.refresh_interval() >= AuthConfig::ACCESS_TOKEN_LIFETIME {
            return Err(ConfigError::Message(format!(
                "refresh_interval_secs must be shorter than the {}s token lifetime",
                AuthConfig::ACCESS_TOKEN_LIFETIME.as_secs()
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the shared API client these settings describe
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn build_client(&self) -> Result<ApiClient, ClientError> {
        let mut builder = ApiClient::builder()
            .base_url(&self.api_url)
            .timeout(self.request_timeout());
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }
}
