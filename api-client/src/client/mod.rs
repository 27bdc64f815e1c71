//! HTTP client module.
//!
//! [`ApiClient`] executes [`Endpoint`](crate::Endpoint)s through an
//! [`HttpTransport`](crate::HttpTransport), attaching the configured token,
//! logging each exchange and mapping every failure onto
//! [`ApiClientError`](crate::ApiClientError).
//!
//! ## Examples
//!
//! ```rust,ignore
//! use api_client::{ApiClient, Endpoint, HttpMethod, TracingLogger};
//!
//! let client = ApiClient::builder()
//!     .token("abc123")
//!     .logger(TracingLogger::new("users-api"))
//!     .build()?;
//!
//! let delete = Endpoint::builder()
//!     .base_url("https://api.example.com")
//!     .path("/users/1")
//!     .method(HttpMethod::Delete)
//!     .build();
//!
//! client.request_void(&delete).await?;
//! ```

mod executor;
mod render;

pub use executor::{ApiClient, ApiClientBuilder};
