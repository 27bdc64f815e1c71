//! Error types for the client.
//!
//! - [`ApiClientError`] - the single error every client call returns
//! - [`TransportError`] - what an [`HttpTransport`](crate::HttpTransport) reports
//! - [`DecodeError`] - what a [`Decoder`](crate::Decoder) reports

mod api_client_error;
mod decode_error;
mod transport_error;

pub use api_client_error::ApiClientError;
pub use decode_error::DecodeError;
pub use transport_error::TransportError;

/// Boxed underlying cause carried by transport-level variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
