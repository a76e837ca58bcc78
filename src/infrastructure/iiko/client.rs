//! # iiko Client
//!
//! Authenticated entry point for every iiko Cloud API call.
//!
//! The client exchanges the configured `apiLogin` for a bearer token on first
//! use, caches it, and sends it with every request. A token rejected with
//! 401 is dropped and re-acquired once before the error is surfaced.
//!
//! Endpoint wrappers live in [`crate::infrastructure::iiko::api`] as
//! `impl IikoClient` blocks.
//!
//! # Examples
//!
//! ```no_run
//! use iiko_client::infrastructure::iiko::{IikoClient, IikoClientConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = IikoClient::new(IikoClientConfig::new("my-api-login"))?;
//! let token = client.access_token().await?;
//! # Ok(())
//! # }
//! ```

use crate::infrastructure::iiko::error::{IikoError, IikoResult};
use crate::infrastructure::iiko::http_client::HttpClient;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api-ru.iiko.services";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Tokens are valid for an hour; refresh a little earlier.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(55 * 60);

const ACCESS_TOKEN_PATH: &str = "/api/1/access_token";

/// Vendor header carrying the server-side timeout in seconds.
const TIMEOUT_HEADER: HeaderName = HeaderName::from_static("timeout");

/// Configuration for [`IikoClient`].
#[derive(Clone)]
pub struct IikoClientConfig {
    /// API host, without trailing slash.
    pub base_url: String,
    /// Key exchanged for access tokens.
    pub api_login: String,
    /// Default timeout in milliseconds.
    pub timeout_ms: u64,
    /// How long an access token is reused.
    pub token_ttl: Duration,
}

impl IikoClientConfig {
    /// Creates a configuration with default host and timeouts.
    #[must_use]
    pub fn new(api_login: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_login: api_login.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the default timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the token reuse period.
    #[must_use]
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }
}

impl fmt::Debug for IikoClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IikoClientConfig")
            .field("base_url", &self.base_url)
            .field("api_login", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    timeout: Option<Duration>,
    headers: HeaderMap,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the timeout for this call.
    ///
    /// The value is also sent to the server in the `Timeout` header.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a header to this call.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the timeout override, if set.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the extra headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenRequest<'a> {
    api_login: &'a str,
}

/// Response of `/api/1/access_token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    /// Operation ID.
    pub correlation_id: Uuid,
    /// Bearer token.
    pub token: String,
}

#[derive(Clone)]
struct CachedToken {
    value: String,
    acquired_at: Instant,
}

/// Client for the iiko Cloud API.
///
/// Cheap to clone; clones share the HTTP connection pool and token cache.
#[derive(Clone)]
pub struct IikoClient {
    http: HttpClient,
    config: Arc<IikoClientConfig>,
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl IikoClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns `IikoError::Internal` if the login is empty or the HTTP client
    /// cannot be built.
    pub fn new(mut config: IikoClientConfig) -> IikoResult<Self> {
        if config.api_login.trim().is_empty() {
            return Err(IikoError::internal("apiLogin must not be empty"));
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            http: HttpClient::new(config.timeout_ms)?,
            config: Arc::new(config),
            token: Arc::new(Mutex::new(None)),
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns a valid access token, requesting a new one if needed.
    ///
    /// # Errors
    ///
    /// Returns the error of the `/api/1/access_token` call.
    pub async fn access_token(&self) -> IikoResult<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref()
            && token.acquired_at.elapsed() < self.config.token_ttl
        {
            return Ok(token.value.clone());
        }

        let fresh = self.request_token().await?;
        *cached = Some(CachedToken {
            value: fresh.token.clone(),
            acquired_at: Instant::now(),
        });
        Ok(fresh.token)
    }

    /// Drops the cached token so the next call acquires a new one.
    pub async fn invalidate_token(&self) {
        self.token.lock().await.take();
    }

    #[instrument(skip(self), fields(path = ACCESS_TOKEN_PATH))]
    async fn request_token(&self) -> IikoResult<AccessTokenResponse> {
        debug!("requesting access token");
        let body = AccessTokenRequest {
            api_login: &self.config.api_login,
        };
        let response: AccessTokenResponse = self
            .http
            .post(&self.url(ACCESS_TOKEN_PATH), &body, HeaderMap::new(), None)
            .await?;
        debug!(correlation_id = %response.correlation_id, "access token acquired");
        Ok(response)
    }

    /// POSTs an authenticated request and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns token acquisition errors or the error of the call itself.
    #[instrument(skip(self, body, options))]
    pub async fn post<T, B>(&self, path: &str, body: &B, options: &RequestOptions) -> IikoResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path);
        let headers = self.headers(options).await?;

        match self.http.post(&url, body, headers, options.timeout).await {
            Err(IikoError::Authentication { .. }) => {
                warn!("access token rejected, re-authenticating");
                self.invalidate_token().await;
                let headers = self.headers(options).await?;
                self.http.post(&url, body, headers, options.timeout).await
            }
            other => other,
        }
    }

    /// POSTs an authenticated request whose response carries no body.
    ///
    /// # Errors
    ///
    /// Returns token acquisition errors or the error of the call itself.
    #[instrument(skip(self, body, options))]
    pub async fn post_empty<B>(&self, path: &str, body: &B, options: &RequestOptions) -> IikoResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path);
        let headers = self.headers(options).await?;

        match self.http.post_empty(&url, body, headers, options.timeout).await {
            Err(IikoError::Authentication { .. }) => {
                warn!("access token rejected, re-authenticating");
                self.invalidate_token().await;
                let headers = self.headers(options).await?;
                self.http.post_empty(&url, body, headers, options.timeout).await
            }
            other => other,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn headers(&self, options: &RequestOptions) -> IikoResult<HeaderMap> {
        let token = self.access_token().await?;
        let mut headers = options.headers.clone();

        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| IikoError::protocol(format!("Access token is not a valid header: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);

        if let Some(timeout) = options.timeout {
            headers.insert(TIMEOUT_HEADER, HeaderValue::from(timeout.as_secs()));
        }

        Ok(headers)
    }
}

impl fmt::Debug for IikoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IikoClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
