//! # iiko API Errors
//!
//! Error types for outbound calls to the iiko Cloud API.
//!
//! # Examples
//!
//! ```
//! use iiko_client::infrastructure::iiko::error::IikoError;
//!
//! let error = IikoError::timeout("request timed out after 15000ms");
//! assert!(error.is_retryable());
//!
//! let error = IikoError::authentication("apiLogin rejected");
//! assert!(!error.is_retryable());
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Error body returned by the iiko API on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Human readable description.
    #[serde(default)]
    pub error_description: String,
    /// Machine readable error code.
    #[serde(default)]
    pub error: Option<String>,
    /// Correlation ID of the failed operation.
    #[serde(default)]
    pub correlation_id: Option<String>,
}

/// Error type for iiko API operations.
#[derive(Debug, Clone, Error)]
pub enum IikoError {
    /// Request timed out.
    #[error("iiko timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection error, including 5xx responses.
    #[error("iiko connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Credentials rejected.
    #[error("iiko authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("iiko rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Retry after duration in milliseconds.
        retry_after_ms: Option<u64>,
    },

    /// Request rejected as malformed.
    #[error("iiko invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Endpoint or resource not found.
    #[error("iiko not found: {message}")]
    NotFound {
        /// Error message.
        message: String,
    },

    /// The API answered with a structured error body.
    #[error("iiko api error ({status}): {description}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `errorDescription` from the body.
        description: String,
        /// `error` code from the body.
        code: Option<String>,
        /// `correlationId` from the body.
        correlation_id: Option<String>,
    },

    /// Response body could not be decoded.
    #[error("iiko protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Client-side failure.
    #[error("iiko internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl IikoError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>, retry_after_ms: Option<u64>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms,
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an API error from a decoded error body.
    #[must_use]
    pub fn api(status: u16, body: ApiErrorBody) -> Self {
        Self::Api {
            status,
            description: body.error_description,
            code: body.error,
            correlation_id: body.correlation_id,
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the call may succeed when repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if the request itself was at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidRequest { .. } | Self::Authentication { .. } | Self::NotFound { .. } => {
                true
            }
            Self::Api { status, .. } => (400..500).contains(status) && *status != 429,
            _ => false,
        }
    }

    /// Returns the HTTP status code carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the vendor correlation ID, if the API supplied one.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::Api { correlation_id, .. } => correlation_id.as_deref(),
            _ => None,
        }
    }

    /// Returns the retry delay in milliseconds, if applicable.
    #[must_use]
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}

/// Result type for iiko API operations.
pub type IikoResult<T> = Result<T, IikoError>;
