//! HTTP verbs an endpoint can use.

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The HTTP method of an [`Endpoint`](crate::Endpoint).
///
/// Renders and parses as the upper-case wire token.
///
/// ## Examples
///
/// ```rust
/// use api_client::HttpMethod;
///
/// let method: HttpMethod = "PATCH".parse().unwrap();
/// assert_eq!(method, HttpMethod::Patch);
/// assert_eq!(method.as_ref(), "PATCH");
/// assert!(method.has_body());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
    Connect,
}

impl HttpMethod {
    /// Returns `true` for verbs that conventionally carry a request body.
    ///
    /// The client never enforces this; an endpoint may attach a body to any verb.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Returns `true` if repeating the call has the same effect as making it once.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, Self::Post | Self::Patch | Self::Connect)
    }

    /// Returns `true` for read-only verbs.
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options | Self::Trace)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
            HttpMethod::Trace => reqwest::Method::TRACE,
            HttpMethod::Connect => reqwest::Method::CONNECT,
        }
    }
}
