//! # HTTP Client
//!
//! Thin wrapper around [`reqwest::Client`] that posts JSON and maps
//! failures onto [`IikoError`].
//!
//! Non-2xx responses are decoded as the iiko error body
//! (`errorDescription`, `error`, `correlationId`) when possible; otherwise the
//! status code alone decides the error variant.

use crate::infrastructure::iiko::error::{ApiErrorBody, IikoError, IikoResult};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for JSON POST calls.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Default request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified default timeout.
    ///
    /// # Errors
    ///
    /// Returns `IikoError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> IikoResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| IikoError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the default timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// POSTs `body` as JSON and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a transport error, a status-mapped error, or
    /// `IikoError::Protocol` if the response body does not decode.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
        timeout: Option<Duration>,
    ) -> IikoResult<T> {
        let response = self.send(url, body, headers, timeout).await?;
        let response = Self::check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| IikoError::protocol(format!("Failed to parse response: {e}")))
    }

    /// POSTs `body` as JSON and discards whatever the server answers.
    ///
    /// # Errors
    ///
    /// Returns a transport error or a status-mapped error.
    pub async fn post_empty<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
        timeout: Option<Duration>,
    ) -> IikoResult<()> {
        let response = self.send(url, body, headers, timeout).await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
        timeout: Option<Duration>,
    ) -> IikoResult<Response> {
        let mut request = self.client.post(url).json(body).headers(headers);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        request.send().await.map_err(Self::map_reqwest_error)
    }

    /// Passes 2xx responses through and maps everything else to an error.
    async fn check_status(response: Response) -> IikoResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after_ms = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000));
        let body = response.text().await.unwrap_or_default();

        Err(Self::map_status_error(status, &body, retry_after_ms))
    }

    /// Maps a reqwest error to an IikoError.
    fn map_reqwest_error(error: reqwest::Error) -> IikoError {
        if error.is_timeout() {
            IikoError::timeout("Request timed out")
        } else if error.is_connect() {
            IikoError::connection(format!("Connection failed: {error}"))
        } else {
            IikoError::connection(format!("HTTP request failed: {error}"))
        }
    }

    /// Maps an HTTP status code and body to an IikoError.
    fn map_status_error(status: StatusCode, body: &str, retry_after_ms: Option<u64>) -> IikoError {
        let api_body = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .filter(|b| !b.error_description.is_empty() || b.error.is_some());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let detail = api_body.map_or_else(|| body.to_string(), |b| b.error_description);
                IikoError::authentication(format!("Authentication failed: {detail}"))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                IikoError::rate_limited("Rate limit exceeded", retry_after_ms)
            }
            _ if api_body.is_some() => {
                IikoError::api(status.as_u16(), api_body.unwrap_or_default())
            }
            StatusCode::BAD_REQUEST => IikoError::invalid_request(format!("Bad request: {body}")),
            StatusCode::NOT_FOUND => IikoError::not_found(format!("Resource not found: {body}")),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                IikoError::timeout(format!("Server timed out ({status}): {body}"))
            }
            s if s.is_server_error() => {
                IikoError::connection(format!("Server error ({status}): {body}"))
            }
            _ => IikoError::protocol(format!("HTTP error ({status}): {body}")),
        }
    }
}
