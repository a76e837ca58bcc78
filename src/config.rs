//! # Settings
//!
//! Layered configuration for the client and the webhook server.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. Optional TOML file (`iiko.toml` unless a path is given)
//! 3. Environment variables with prefix `IIKO` and `__` as separator
//!
//! ```text
//! IIKO__CLIENT__API_LOGIN=abc123
//! IIKO__CLIENT__BASE_URL=https://api-eu.iiko.services
//! IIKO__WEBHOOK__SECRET=s3cret
//! IIKO__WEBHOOK__BIND=0.0.0.0:8080
//! IIKO__LOG__JSON=true
//! ```

use crate::api::rest::DEFAULT_WEBHOOK_PATH;
use crate::infrastructure::iiko::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, DEFAULT_TOKEN_TTL, IikoClientConfig,
};
use axum::http::HeaderName;
use ::config::{Config, Environment, File, FileFormat, Map};
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "iiko.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "IIKO";

/// Error loading or interpreting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value was read but is not usable.
    #[error("invalid setting {key}: {message}")]
    Invalid {
        /// Dotted key of the setting.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// All settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Outbound API client.
    #[serde(default)]
    pub client: ClientSettings,
    /// Webhook server.
    #[serde(default)]
    pub webhook: WebhookSettings,
    /// Logging.
    #[serde(default)]
    pub log: LogSettings,
}

/// Outbound API client settings.
#[derive(Clone, Deserialize)]
pub struct ClientSettings {
    /// API host.
    #[serde(default = "ClientSettings::base_url_default")]
    pub base_url: String,
    /// Key exchanged for access tokens. Empty disables the client.
    #[serde(default)]
    pub api_login: String,
    /// Request timeout in milliseconds.
    #[serde(default = "ClientSettings::timeout_ms_default")]
    pub timeout_ms: u64,
    /// Access token reuse period in seconds.
    #[serde(default = "ClientSettings::token_ttl_secs_default")]
    pub token_ttl_secs: u64,
}

impl ClientSettings {
    fn base_url_default() -> String {
        DEFAULT_BASE_URL.into()
    }

    fn timeout_ms_default() -> u64 {
        DEFAULT_TIMEOUT_MS
    }

    fn token_ttl_secs_default() -> u64 {
        DEFAULT_TOKEN_TTL.as_secs()
    }

    /// Returns the client configuration, or `None` if no login is set.
    #[must_use]
    pub fn to_client_config(&self) -> Option<IikoClientConfig> {
        if self.api_login.trim().is_empty() {
            return None;
        }

        Some(
            IikoClientConfig::new(self.api_login.clone())
                .with_base_url(self.base_url.clone())
                .with_timeout_ms(self.timeout_ms)
                .with_token_ttl(Duration::from_secs(self.token_ttl_secs)),
        )
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Self::base_url_default(),
            api_login: String::new(),
            timeout_ms: Self::timeout_ms_default(),
            token_ttl_secs: Self::token_ttl_secs_default(),
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url)
            .field("api_login", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// Webhook server settings.
#[derive(Clone, Deserialize)]
pub struct WebhookSettings {
    /// Listen address.
    #[serde(default = "WebhookSettings::bind_default")]
    pub bind: String,
    /// Route the vendor posts to.
    #[serde(default = "WebhookSettings::path_default")]
    pub path: String,
    /// Shared secret configured in the vendor webhook settings. Empty
    /// accepts every request.
    #[serde(default)]
    pub secret: String,
    /// Header carrying the secret.
    #[serde(default = "WebhookSettings::secret_header_default")]
    pub secret_header: String,
}

impl WebhookSettings {
    fn bind_default() -> String {
        "0.0.0.0:8080".into()
    }

    fn path_default() -> String {
        DEFAULT_WEBHOOK_PATH.into()
    }

    fn secret_header_default() -> String {
        "Authorization".into()
    }

    /// Parses the listen address.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` if `bind` is not a socket address.
    pub fn bind_addr(&self) -> SettingsResult<SocketAddr> {
        self.bind.parse().map_err(|e| SettingsError::Invalid {
            key: "webhook.bind",
            message: format!("'{}': {e}", self.bind),
        })
    }

    /// Parses the secret header name.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` if the name is not a valid header.
    pub fn secret_header_name(&self) -> SettingsResult<HeaderName> {
        HeaderName::try_from(self.secret_header.trim()).map_err(|e| SettingsError::Invalid {
            key: "webhook.secret_header",
            message: format!("'{}': {e}", self.secret_header),
        })
    }

    /// Returns the route, checking it is a plain absolute path.
    ///
    /// Captures, wildcards and empty segments are refused so the router can
    /// always mount it.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` if the path does not start with `/`,
    /// contains `:`, `*`, `{` or `}`, or has an empty segment.
    pub fn route(&self) -> SettingsResult<&str> {
        let invalid = |message: &str| SettingsError::Invalid {
            key: "webhook.path",
            message: format!("'{}' {message}", self.path),
        };

        let Some(rest) = self.path.strip_prefix('/') else {
            return Err(invalid("must start with '/'"));
        };
        if self.path.contains([':', '*', '{', '}']) {
            return Err(invalid("must not contain ':', '*', '{' or '}'"));
        }
        if !rest.is_empty() && rest.split('/').any(str::is_empty) {
            return Err(invalid("must not contain empty segments"));
        }

        Ok(&self.path)
    }
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            bind: Self::bind_default(),
            path: Self::path_default(),
            secret: String::new(),
            secret_header: Self::secret_header_default(),
        }
    }
}

impl fmt::Debug for WebhookSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookSettings")
            .field("bind", &self.bind)
            .field("path", &self.path)
            .field("secret", &if self.secret.is_empty() { "<none>" } else { "<redacted>" })
            .field("secret_header", &self.secret_header)
            .finish()
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Filter directives used when `RUST_LOG` is unset.
    #[serde(default = "LogSettings::filter_default")]
    pub filter: String,
    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,
}

impl LogSettings {
    fn filter_default() -> String {
        "info".into()
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: Self::filter_default(),
            json: false,
        }
    }
}

impl Settings {
    /// Loads settings from the file at `path` (or [`DEFAULT_CONFIG_FILE`])
    /// and the environment.
    ///
    /// A missing default file is ignored; a missing explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Load` if a source is unreadable or a value has
    /// the wrong type.
    pub fn load(path: Option<&Path>) -> SettingsResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Loads like [`Settings::load`], reading variables from `vars` instead
    /// of the process environment when given.
    ///
    /// Values stay text until deserialized, so a secret such as `00123` is
    /// kept verbatim while numeric and boolean fields still parse.
    fn load_with_env(path: Option<&Path>, vars: Option<Map<String, String>>) -> SettingsResult<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .source(vars),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Parses settings from TOML text alone.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Load` if the text is not valid TOML or a value
    /// has the wrong type.
    pub fn from_toml(text: &str) -> SettingsResult<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}
