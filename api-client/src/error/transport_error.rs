//! Transport failures.

use thiserror::Error;

use super::BoxError;

/// Failure reported by an [`HttpTransport`](crate::HttpTransport).
///
/// Transports classify their own errors: anything that means "the network
/// or the peer let us down" is [`Network`](Self::Network), everything else
/// (malformed request, body read failure, client misconfiguration) is
/// [`Failed`](Self::Failed).
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS, connect, timeout, redirect or protocol-level failure.
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    /// Any other failure while executing the request.
    #[error("transport failed: {0}")]
    Failed(#[source] BoxError),
}

impl TransportError {
    pub fn network(cause: impl Into<BoxError>) -> Self {
        Self::Network(cause.into())
    }

    pub fn failed(cause: impl Into<BoxError>) -> Self {
        Self::Failed(cause.into())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_redirect() || err.is_request() {
            Self::Network(Box::new(err))
        } else {
            Self::Failed(Box::new(err))
        }
    }
}
