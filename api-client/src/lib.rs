//! Endpoint-driven async HTTP client.
//!
//! Describe a call once as an [`Endpoint`] (base URL, API version, path,
//! method, headers, query parameters, body), then hand it to an
//! [`ApiClient`] to get back a decoded value, raw bytes or nothing at all.
//!
//! ## Features
//!
//! - **Pluggable transport**: [`HttpTransport`] with a pooled `reqwest`
//!   implementation and per-call upload progress sessions
//! - **Pluggable decoding**: JSON by default, YAML and XML via [`Decoder`]
//! - **Token auth**: `Authorization: Token <token>` on every request
//! - **Flat error taxonomy**: every failure is one [`ApiClientError`] variant
//! - **Logging and tracing**: a lazy [`Logger`] facade plus an `api_request` span
//! - **Multipart uploads**: [`MultipartFormData`] encodes a single-file form
//!
//! ## Example
//!
//! ```rust,ignore
//! use api_client::{ApiClient, Endpoint, HttpMethod};
//!
//! #[derive(serde::Deserialize)]
//! struct User { id: u64, name: String }
//!
//! let client = ApiClient::builder().token("abc123").build()?;
//! let get_user = Endpoint::builder()
//!     .base_url("https://api.example.com")
//!     .api_version("/v1")
//!     .path("/users")
//!     .query_param("id", 1)
//!     .method(HttpMethod::Get)
//!     .build();
//!
//! let user: User = client.request(&get_user).await?;
//! ```

pub mod client;
pub mod decoder;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod logger;
pub mod method;
pub mod multipart;
pub mod progress;
pub mod transport;

// Re-exports for convenience
pub use client::{ApiClient, ApiClientBuilder};
pub use decoder::{Decoder, JsonDecoder, XmlDecoder, YamlDecoder};
pub use endpoint::{Endpoint, EndpointBuilder};
pub use error::{ApiClientError, BoxError, DecodeError, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use logger::{LogLevel, Logger, NoopLogger, TracingLogger};
pub use method::HttpMethod;
pub use multipart::{ImageMimeType, MultipartFormData};
pub use progress::{UploadProgress, UploadProgressDelegate};
pub use transport::{HttpTransport, ReqwestTransport, ReqwestTransportBuilder};
