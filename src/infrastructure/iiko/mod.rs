//! # iiko Cloud API
//!
//! Outbound client for the iiko Cloud REST API.
//!
//! - [`IikoClient`]: token handling and authenticated JSON POST
//! - [`api`]: request/response types and one method per endpoint
//! - [`IikoError`]: failure taxonomy

pub mod api;
pub mod client;
pub mod error;
pub mod http_client;

pub use client::{
    AccessTokenResponse, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, DEFAULT_TOKEN_TTL, IikoClient,
    IikoClientConfig, RequestOptions,
};
pub use error::{ApiErrorBody, IikoError, IikoResult};
