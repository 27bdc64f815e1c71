//! Endpoint descriptors and their conversion into requests.
//!
//! An [`Endpoint`] is an immutable description of one API call. It is built
//! with [`EndpointBuilder`], whose type-state parameters make `base_url` and
//! `method` mandatory at compile time, and turned into an [`HttpRequest`] by
//! [`Endpoint::url_request`].

use std::fmt::Display;

use bytes::Bytes;
use serde::Serialize;
use url::Url;

use crate::http::HttpRequest;
use crate::method::HttpMethod;
use crate::multipart::MultipartFormData;

/// Type-state markers for [`EndpointBuilder`].
pub mod builder_state {
    /// A required field that has not been set yet.
    #[derive(Debug)]
    pub struct Missing;

    /// The base URL, once supplied.
    #[derive(Debug)]
    pub struct BaseUrl(pub(crate) String);
}

use builder_state::{BaseUrl, Missing};

/// Description of a single API call.
///
/// The request URL is the plain concatenation `base_url + api_version + path`
/// followed by the query parameters in insertion order. No separators are
/// inserted, so `base_url` usually ends with `/` or `api_version` starts with
/// one.
///
/// ## Examples
///
/// ```rust
/// use api_client::{Endpoint, HttpMethod};
///
/// let endpoint = Endpoint::builder()
///     .base_url("https://api.example.com/")
///     .api_version("v1")
///     .path("/users")
///     .method(HttpMethod::Get)
///     .query_param("page", 2)
///     .build();
///
/// let request = endpoint.url_request().unwrap();
/// assert_eq!(request.url.as_str(), "https://api.example.com/v1/users?page=2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    method: HttpMethod,
    base_url: String,
    api_version: String,
    path: String,
    headers: Vec<(String, String)>,
    url_parameters: Vec<(String, String)>,
    body: Option<Bytes>,
}

impl Endpoint {
    /// Starts a builder with nothing set.
    pub fn builder() -> EndpointBuilder<Missing, Missing> {
        EndpointBuilder::new()
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Query parameters in insertion order, values already stringified.
    pub fn url_parameters(&self) -> &[(String, String)] {
        &self.url_parameters
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Resolves the full request URL.
    ///
    /// Returns `None` when the concatenated string is not an absolute URL
    /// with a host. Empty query parameters leave the URL without a `?`.
    pub fn url(&self) -> Option<Url> {
        let raw = format!("{}{}{}", self.base_url, self.api_version, self.path);
        let mut url = Url::parse(&raw).ok()?;
        if !url.has_host() {
            return None;
        }

        if !self.url_parameters.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &self.url_parameters {
                query.append_pair(name, value);
            }
        }

        Some(url)
    }

    /// Builds the request this endpoint describes.
    ///
    /// Headers and body are carried over verbatim. Returns `None` if the URL
    /// cannot be constructed; nothing is partially built.
    pub fn url_request(&self) -> Option<HttpRequest> {
        let url = self.url()?;
        Some(HttpRequest {
            method: self.method,
            url,
            headers: self.headers.clone(),
            body: self.body.clone(),
        })
    }
}

/// Builder for [`Endpoint`].
///
/// `B` tracks the base URL and `M` the method; [`build`](EndpointBuilder::build)
/// only exists once both are present. Everything else is optional and may be
/// set in any order.
#[derive(Debug)]
pub struct EndpointBuilder<B, M> {
    base_url: B,
    method: M,
    api_version: String,
    path: String,
    headers: Vec<(String, String)>,
    url_parameters: Vec<(String, String)>,
    body: Option<Bytes>,
}

impl EndpointBuilder<Missing, Missing> {
    pub fn new() -> Self {
        Self {
            base_url: Missing,
            method: Missing,
            api_version: String::new(),
            path: String::new(),
            headers: Vec::new(),
            url_parameters: Vec::new(),
            body: None,
        }
    }
}

impl Default for EndpointBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EndpointBuilder<Missing, M> {
    /// Sets the base URL, e.g. `https://api.example.com/`.
    pub fn base_url(self, base_url: impl Into<String>) -> EndpointBuilder<BaseUrl, M> {
        EndpointBuilder {
            base_url: BaseUrl(base_url.into()),
            method: self.method,
            api_version: self.api_version,
            path: self.path,
            headers: self.headers,
            url_parameters: self.url_parameters,
            body: self.body,
        }
    }
}

impl<B> EndpointBuilder<B, Missing> {
    pub fn method(self, method: HttpMethod) -> EndpointBuilder<B, HttpMethod> {
        EndpointBuilder {
            base_url: self.base_url,
            method,
            api_version: self.api_version,
            path: self.path,
            headers: self.headers,
            url_parameters: self.url_parameters,
            body: self.body,
        }
    }
}

impl<B, M> EndpointBuilder<B, M> {
    /// Sets the version segment placed between base URL and path.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Sets the path relative to `base_url + api_version`.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets a header. A second call with the same name, in any letter case,
    /// overwrites the value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    /// Adds a query parameter, stringified through [`Display`].
    ///
    /// Names and values are `application/x-www-form-urlencoded` when the URL
    /// is built, so a space becomes `+` and `/` becomes `%2F`.
    ///
    /// Re-adding an existing name overwrites its value in place.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Display) -> Self {
        upsert(&mut self.url_parameters, name.into(), value.to_string());
        self
    }

    /// Attaches a raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the JSON body and sets `Content-Type`.
    ///
    /// ## Errors
    ///
    /// Returns the serializer's error if `value` cannot be represented as JSON.
    pub fn json_body<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self.header("Content-Type", "application/json").body(body))
    }

    /// Uses a multipart form as the body and sets the matching `Content-Type`.
    pub fn multipart(self, form: &MultipartFormData) -> Self {
        self.header("Content-Type", form.content_type())
            .body(form.as_http_body())
    }
}

impl EndpointBuilder<BaseUrl, HttpMethod> {
    pub fn build(self) -> Endpoint {
        Endpoint {
            method: self.method,
            base_url: self.base_url.0,
            api_version: self.api_version,
            path: self.path,
            headers: self.headers,
            url_parameters: self.url_parameters,
            body: self.body,
        }
    }
}

fn upsert(pairs: &mut Vec<(String, String)>, name: String, value: String) {
    match pairs.iter_mut().find(|(existing, _)| *existing == name) {
        Some(slot) => slot.1 = value,
        None => pairs.push((name, value)),
    }
}
