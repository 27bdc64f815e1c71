//! Request execution with logging and tracing instrumentation.
//!
//! This module provides the [`ApiClient`] struct, which turns an [`Endpoint`]
//! into a wire request, authorizes it, runs it through the configured
//! [`HttpTransport`] and validates the response.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{instrument, Span};

use super::render::{BodyPreview, HeaderList};
use crate::decoder::{Decoder, JsonDecoder};
use crate::endpoint::Endpoint;
use crate::error::ApiClientError;
use crate::http::HttpRequest;
use crate::logger::{LogLevel, Logger, NoopLogger};
use crate::progress::UploadProgressDelegate;
use crate::transport::{HttpTransport, ReqwestTransport, ReqwestTransportBuilder};

/// Scheme prefix of the `Authorization` header value.
const TOKEN_PREFIX: &str = "Token ";

const AUTHORIZATION: &str = "Authorization";

/// Builder for configuring an [`ApiClient`].
pub struct ApiClientBuilder {
    token: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    reqwest: ReqwestTransportBuilder,
    logger: Arc<dyn Logger>,
    log_secrets: bool,
}

impl ApiClientBuilder {
    fn new() -> Self {
        Self {
            token: None,
            transport: None,
            reqwest: ReqwestTransport::builder(),
            logger: Arc::new(NoopLogger),
            log_secrets: false,
        }
    }

    /// Sends `Authorization: Token <token>` with every request.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use api_client::ApiClient;
    ///
    /// let client = ApiClient::builder().token("abc123").build().unwrap();
    /// assert!(client.has_token());
    /// ```
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout of the built-in transport. Defaults to 30 seconds.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.reqwest = self.reqwest.timeout(timeout);
        self
    }

    /// Adds a header the built-in transport sends with every request.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.reqwest = self.reqwest.default_header(name, value);
        self
    }

    /// Replaces the built-in `reqwest` transport.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Logs the token verbatim instead of redacting it. Off by default.
    pub fn log_secrets(mut self, enabled: bool) -> Self {
        self.log_secrets = enabled;
        self
    }

    /// Builds the [`ApiClient`].
    ///
    /// ## Errors
    ///
    /// Returns [`ApiClientError::RequestFailed`] if the built-in transport
    /// cannot be constructed, e.g. because a default header is invalid.
    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(self.reqwest.build()?),
        };

        Ok(ApiClient {
            transport,
            logger: self.logger,
            token: self.token.map(Arc::from),
            log_secrets: self.log_secrets,
        })
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ApiClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClientBuilder")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("custom_transport", &self.transport.is_some())
            .field("reqwest", &self.reqwest)
            .field("log_secrets", &self.log_secrets)
            .finish_non_exhaustive()
    }
}

/// Async HTTP client for executing [`Endpoint`]s.
///
/// Holds only immutable state, so it is cheap to clone and safe to share
/// across tasks. Every call builds a fresh request; nothing is cached.
///
/// ## Examples
///
/// ```rust,ignore
/// use api_client::{ApiClient, Endpoint, HttpMethod};
///
/// #[derive(serde::Deserialize)]
/// struct User { id: u64, name: String }
///
/// let client = ApiClient::builder().token("abc123").build()?;
///
/// let endpoint = Endpoint::builder()
///     .base_url("https://api.example.com")
///     .api_version("/v1")
///     .path("/users/1")
///     .method(HttpMethod::Get)
///     .build();
///
/// let user: User = client.request(&endpoint).await?;
/// println!("User: {}", user.name);
/// ```
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    logger: Arc<dyn Logger>,
    token: Option<Arc<str>>,
    log_secrets: bool,
}

impl ApiClient {
    /// Creates a new builder for configuring an API client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    /// Creates a client with the `reqwest` transport, no token and no logging.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, ApiClientError> {
        Self::builder().build()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Executes the endpoint and decodes a 2xx body as JSON.
    ///
    /// ## Errors
    ///
    /// Returns [`ApiClientError::DecodingFailed`] if the body does not decode
    /// into `T`, plus every error of [`request_data`](Self::request_data).
    pub async fn request<T>(&self, endpoint: &Endpoint) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        self.request_with_decoder(endpoint, &JsonDecoder).await
    }

    /// Executes the endpoint and decodes a 2xx body with `decoder`.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// use api_client::YamlDecoder;
    ///
    /// let config: Config = client.request_with_decoder(&endpoint, &YamlDecoder).await?;
    /// ```
    pub async fn request_with_decoder<T, D>(
        &self,
        endpoint: &Endpoint,
        decoder: &D,
    ) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
        D: Decoder,
    {
        let body = self.perform_request(endpoint, None).await?;
        decoder.decode(&body).map_err(|err| {
            self.logger.log(
                LogLevel::Error,
                format_args!(
                    "failed to decode {} response from {}{}: {}",
                    decoder.content_type(),
                    endpoint.api_version(),
                    endpoint.path(),
                    err.describe()
                ),
            );
            ApiClientError::DecodingFailed(err)
        })
    }

    /// Executes the endpoint and discards the body.
    pub async fn request_void(&self, endpoint: &Endpoint) -> Result<(), ApiClientError> {
        self.perform_request(endpoint, None).await.map(drop)
    }

    /// Executes the endpoint and returns the raw 2xx body.
    ///
    /// ## Errors
    ///
    /// - [`ApiClientError::InvalidUrl`] if the endpoint has no valid URL
    /// - [`ApiClientError::NetworkError`] / [`ApiClientError::RequestFailed`]
    ///   if the transport fails
    /// - [`ApiClientError::InvalidResponse`] if there is no usable status line
    /// - [`ApiClientError::StatusCode`] for any status outside `200..=299`
    pub async fn request_data(&self, endpoint: &Endpoint) -> Result<Bytes, ApiClientError> {
        self.perform_request(endpoint, None).await
    }

    /// Executes the endpoint, reporting upload progress to `observer`.
    ///
    /// Returns the raw body, or `None` when the body is empty.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use api_client::UploadProgress;
    ///
    /// let progress = Arc::new(UploadProgress::new(|f| println!("{:.0}%", f * 100.0)));
    /// let body = client.request_with_progress(&upload, Some(progress)).await?;
    /// ```
    pub async fn request_with_progress(
        &self,
        endpoint: &Endpoint,
        observer: Option<Arc<dyn UploadProgressDelegate>>,
    ) -> Result<Option<Bytes>, ApiClientError> {
        let body = self.perform_request(endpoint, observer).await?;
        Ok((!body.is_empty()).then_some(body))
    }

    /// The shared request pipeline.
    #[instrument(
        name = "api_request",
        skip_all,
        fields(
            http.method = %endpoint.method(),
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    async fn perform_request(
        &self,
        endpoint: &Endpoint,
        observer: Option<Arc<dyn UploadProgressDelegate>>,
    ) -> Result<Bytes, ApiClientError> {
        let mut request = self.build_request(endpoint)?;
        Span::current().record("http.url", request.url.as_str());

        self.authorize(&mut request);
        self.logger.log(
            LogLevel::Debug,
            format_args!(
                "request {} {} headers={} body={}",
                request.method,
                request.url,
                HeaderList {
                    headers: &request.headers,
                    reveal_secrets: self.log_secrets,
                },
                BodyPreview(request.body.as_deref().unwrap_or_default())
            ),
        );

        let method = request.method;
        let url = request.url.clone();
        let outcome = match observer {
            Some(observer) => self.transport.observed(observer).execute(request).await,
            None => self.transport.execute(request).await,
        };

        let response = outcome.map_err(|err| {
            Span::current().record("otel.status_code", "ERROR");
            self.logger.log(
                LogLevel::Error,
                format_args!("{method} {url} failed: {err}"),
            );
            ApiClientError::from(err)
        })?;

        if !(100..=599).contains(&response.status) {
            Span::current().record("otel.status_code", "ERROR");
            self.logger.log(
                LogLevel::Error,
                format_args!(
                    "{method} {url} returned no usable status line (got {})",
                    response.status
                ),
            );
            return Err(ApiClientError::InvalidResponse(response.body));
        }

        Span::current().record("http.status_code", response.status);
        self.logger.log(
            LogLevel::Debug,
            format_args!(
                "response {} from {url} headers={} body={}",
                response.status,
                HeaderList {
                    headers: &response.headers,
                    reveal_secrets: self.log_secrets,
                },
                BodyPreview(&response.body)
            ),
        );

        if !response.is_success() {
            let otel_status = if response.status >= 500 {
                "ERROR"
            } else {
                "UNSET"
            };
            Span::current().record("otel.status_code", otel_status);
            self.logger.log(
                LogLevel::Error,
                format_args!("{method} {url} returned status {}", response.status),
            );
            return Err(ApiClientError::StatusCode(response.status));
        }

        Span::current().record("otel.status_code", "OK");
        Ok(response.body)
    }

    fn build_request(&self, endpoint: &Endpoint) -> Result<HttpRequest, ApiClientError> {
        endpoint.url_request().ok_or_else(|| {
            self.logger.log(
                LogLevel::Error,
                format_args!(
                    "cannot build a URL from base {:?}, version {:?}, path {:?}",
                    endpoint.base_url(),
                    endpoint.api_version(),
                    endpoint.path()
                ),
            );
            ApiClientError::InvalidUrl
        })
    }

    /// Attaches the token, replacing any `Authorization` header the endpoint set.
    fn authorize(&self, request: &mut HttpRequest) {
        let Some(token) = self.token.as_deref() else {
            return;
        };

        if request.header(AUTHORIZATION).is_some() {
            self.logger.log(
                LogLevel::Warning,
                format_args!("endpoint Authorization header replaced by client token"),
            );
        }
        request.set_header(AUTHORIZATION, format!("{TOKEN_PREFIX}{token}"));

        let shown = if self.log_secrets { token } else { "<redacted>" };
        self.logger.log(
            LogLevel::Trace,
            format_args!("authorization: {TOKEN_PREFIX}{shown}"),
        );
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("log_secrets", &self.log_secrets)
            .finish_non_exhaustive()
    }
}
