//! The client's error taxonomy.

use bytes::Bytes;
use thiserror::Error;

use super::{BoxError, DecodeError, TransportError};

/// Every way a client call can fail.
///
/// Each variant is produced at exactly one stage of the request pipeline and
/// returned as-is; the client never retries or recovers. Underlying causes
/// are kept and exposed through [`std::error::Error::source`].
///
/// ## Examples
///
/// ```rust,ignore
/// use api_client::ApiClientError;
///
/// match client.request::<User>(&endpoint).await {
///     Ok(user) => println!("{}", user.name),
///     Err(ApiClientError::StatusCode(404)) => println!("no such user"),
///     Err(err) if err.is_network() => println!("offline: {err}"),
///     Err(err) => return Err(err.into()),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The endpoint does not describe a valid absolute URL.
    #[error("invalid URL")]
    InvalidUrl,

    /// The transport returned no usable status line. Carries the body.
    #[error("invalid response: no usable status line ({} byte body)", .0.len())]
    InvalidResponse(Bytes),

    /// The transport failed for a reason other than connectivity.
    #[error("request failed: {0}")]
    RequestFailed(#[source] BoxError),

    /// The body could not be decoded into the requested type.
    #[error("decoding failed: {0}")]
    DecodingFailed(#[source] DecodeError),

    /// Reserved for call sites that expect one specific status code.
    #[error("unexpected HTTP response code {code}")]
    NotExpectedHttpResponseCode { code: u16 },

    /// Reserved for call sites that require a non-empty request.
    #[error("URL request is empty")]
    UrlRequestIsEmpty,

    /// The server answered outside `200..=299`.
    #[error("HTTP status {0}")]
    StatusCode(u16),

    /// Connectivity, DNS, timeout or protocol failure.
    #[error("network error: {0}")]
    NetworkError(#[source] BoxError),
}

impl ApiClientError {
    /// The HTTP status code behind this error, if there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::StatusCode(code) | Self::NotExpectedHttpResponseCode { code } => Some(*code),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkError(_))
    }

    /// Returns `true` for 4xx statuses.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_some_and(|code| (400..500).contains(&code))
    }

    /// Returns `true` for 5xx statuses.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_some_and(|code| (500..600).contains(&code))
    }
}

impl From<TransportError> for ApiClientError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(cause) => Self::NetworkError(cause),
            TransportError::Failed(cause) => Self::RequestFailed(cause),
        }
    }
}

impl From<DecodeError> for ApiClientError {
    fn from(err: DecodeError) -> Self {
        Self::DecodingFailed(err)
    }
}
