//! The HTTP execution seam.
//!
//! [`ApiClient`](crate::ApiClient) never talks to the network directly; it
//! hands a finished [`HttpRequest`] to an [`HttpTransport`]. The crate ships
//! [`ReqwestTransport`], and tests or embedders can plug in anything else.

mod reqwest_impl;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::progress::UploadProgressDelegate;

pub use reqwest_impl::{ReqwestTransport, ReqwestTransportBuilder};

/// Executes requests and reports upload progress on demand.
///
/// Implementations classify their own failures into
/// [`TransportError::Network`] and [`TransportError::Failed`]. A response is
/// returned as-is whatever its status; judging the status is the caller's job.
///
/// ## Implementing the trait
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use api_client::{HttpRequest, HttpResponse, HttpTransport, TransportError, UploadProgressDelegate};
///
/// struct Canned;
///
/// #[async_trait]
/// impl HttpTransport for Canned {
///     async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
///         Ok(HttpResponse::new(200, "{}"))
///     }
///
///     fn observed(&self, _observer: Arc<dyn UploadProgressDelegate>) -> Box<dyn HttpTransport + '_> {
///         Box::new(Canned)
///     }
/// }
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Opens a session that reports upload progress to `observer`.
    ///
    /// The session is used for exactly one request and then dropped. It may
    /// share connections with `self` but must not change how `self` behaves.
    fn observed(&self, observer: Arc<dyn UploadProgressDelegate>) -> Box<dyn HttpTransport + '_>;
}
