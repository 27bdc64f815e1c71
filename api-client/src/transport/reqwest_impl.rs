//! [`HttpTransport`] backed by `reqwest`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH};

use super::HttpTransport;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::progress::UploadProgressDelegate;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Size of the body slices handed to the connection when progress is observed.
const UPLOAD_CHUNK_SIZE: usize = 16 * 1024;

/// Builder for configuring a [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    default_headers: Vec<(String, String)>,
    pool_max_idle_per_host: usize,
}

impl ReqwestTransportBuilder {
    fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: Vec::new(),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }

    /// Sets the whole-request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request.
    ///
    /// Validated when the transport is built.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Builds the transport.
    ///
    /// ## Errors
    ///
    /// Returns [`TransportError::Failed`] if a default header is not a valid
    /// header name or value, or if the `reqwest` client cannot be constructed.
    pub fn build(self) -> Result<ReqwestTransport, TransportError> {
        let mut headers = HeaderMap::with_capacity(self.default_headers.len());
        for (name, value) in &self.default_headers {
            let name = HeaderName::try_from(name.as_str()).map_err(TransportError::failed)?;
            let value = HeaderValue::try_from(value.as_str()).map_err(TransportError::failed)?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .build()
            .map_err(TransportError::failed)?;

        Ok(ReqwestTransport { client })
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The default transport: a pooled `reqwest::Client`.
///
/// Cloning is cheap and clones share the connection pool. Progress sessions
/// opened with [`observed`](HttpTransport::observed) share it as well.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }

    /// Creates a transport with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the `reqwest` client cannot be constructed.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Wraps an already configured `reqwest::Client`.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(
        &self,
        request: HttpRequest,
        observer: Option<&Arc<dyn UploadProgressDelegate>>,
    ) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let body = body.filter(|body| !body.is_empty());
        let mut builder = self.client.request(method.into(), url);
        for (name, value) in &headers {
            // framing is ours once there is a body
            if body.is_some() && name.eq_ignore_ascii_case(CONTENT_LENGTH.as_str()) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        match (body, observer) {
            (Some(body), Some(observer)) => {
                builder = builder
                    .header(CONTENT_LENGTH, body.len())
                    .body(observed_body(body, Arc::clone(observer)));
            }
            (Some(body), None) => builder = builder.body(body),
            (None, Some(observer)) => observer.did_send(0, 0, 0),
            (None, None) => {}
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.send(request, None).await
    }

    fn observed(&self, observer: Arc<dyn UploadProgressDelegate>) -> Box<dyn HttpTransport + '_> {
        Box::new(ObservedSession {
            transport: self,
            observer,
        })
    }
}

/// A one-request view of a [`ReqwestTransport`] that reports upload progress.
struct ObservedSession<'a> {
    transport: &'a ReqwestTransport,
    observer: Arc<dyn UploadProgressDelegate>,
}

#[async_trait]
impl HttpTransport for ObservedSession<'_> {
    /// Streamed bodies cannot be replayed by `reqwest`, so a `307`/`308` is
    /// followed here by re-sending the buffered request without observation.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .transport
            .send(request.clone(), Some(&self.observer))
            .await?;
        match redirect_target(&request, &response) {
            Some(next) => self.transport.send(next, None).await,
            None => Ok(response),
        }
    }

    fn observed(&self, observer: Arc<dyn UploadProgressDelegate>) -> Box<dyn HttpTransport + '_> {
        self.transport.observed(observer)
    }
}

/// Headers `reqwest` strips when a redirect leaves the original origin.
const CROSS_ORIGIN_STRIPPED: [&str; 5] = [
    "authorization",
    "proxy-authorization",
    "www-authenticate",
    "cookie",
    "cookie2",
];

/// The request to re-issue for a body-preserving redirect, if `response` is one.
fn redirect_target(request: &HttpRequest, response: &HttpResponse) -> Option<HttpRequest> {
    if !matches!(response.status, 307 | 308) {
        return None;
    }
    let location = request.url.join(response.header("location")?).ok()?;

    let mut next = request.clone();
    if location.origin() != request.url.origin() {
        next.headers.retain(|(name, _)| {
            !CROSS_ORIGIN_STRIPPED
                .iter()
                .any(|stripped| name.eq_ignore_ascii_case(stripped))
        });
    }
    next.url = location;
    Some(next)
}

/// Streams `body` in fixed-size slices, reporting each one as it is handed over.
fn observed_body(body: Bytes, observer: Arc<dyn UploadProgressDelegate>) -> reqwest::Body {
    let total = body.len() as u64;
    let chunks: Vec<Bytes> = (0..body.len())
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| body.slice(start..(start + UPLOAD_CHUNK_SIZE).min(body.len())))
        .collect();

    let mut sent = 0u64;
    let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
        let len = chunk.len() as u64;
        sent += len;
        observer.did_send(len, sent, total);
        Ok::<_, std::io::Error>(chunk)
    }));

    reqwest::Body::wrap_stream(stream)
}
