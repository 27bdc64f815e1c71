//! Response body decoders.
//!
//! A [`Decoder`] turns the raw bytes of a successful response into a typed
//! value. [`JsonDecoder`] is what [`ApiClient::request`](crate::ApiClient::request)
//! uses; the others are selected with
//! [`ApiClient::request_with_decoder`](crate::ApiClient::request_with_decoder).

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Converts response bytes into `T`.
///
/// ## Examples
///
/// ```rust
/// use api_client::{Decoder, JsonDecoder};
///
/// #[derive(serde::Deserialize)]
/// struct User { id: u64, name: String }
///
/// let user: User = JsonDecoder.decode(br#"{"id":1,"name":"John"}"#).unwrap();
/// assert_eq!(user.id, 1);
/// assert_eq!(user.name, "John");
/// ```
pub trait Decoder: Send + Sync {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError>;

    /// The media type this decoder understands.
    fn content_type(&self) -> &'static str;
}

/// JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError> {
        serde_json::from_slice(body).map_err(DecodeError::Json)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

/// YAML via `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl Decoder for YamlDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError> {
        serde_yaml::from_slice(body).map_err(DecodeError::Yaml)
    }

    fn content_type(&self) -> &'static str {
        "application/yaml"
    }
}

/// XML via `quick-xml`'s serde support.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl Decoder for XmlDecoder {
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError> {
        quick_xml::de::from_reader(body).map_err(DecodeError::Xml)
    }

    fn content_type(&self) -> &'static str {
        "application/xml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    struct User {
        id: u64,
        name: String,
    }

    #[test]
    fn json_round_trip() {
        let original = User {
            id: 1,
            name: "John".to_string(),
        };
        let bytes = serde_json::to_vec(&original).unwrap();
        let decoded: User = JsonDecoder.decode(&bytes).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn json_shape_mismatch_is_reported() {
        let err = JsonDecoder.decode::<User>(br#"{"id":"one"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn yaml_decodes() {
        let user: User = YamlDecoder.decode(b"id: 7\nname: Ada\n").unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.name, "Ada");
    }

    #[test]
    fn xml_decodes() {
        let user: User = XmlDecoder
            .decode(b"<user><id>3</id><name>Grace</name></user>")
            .unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(user.name, "Grace");
    }

    #[test]
    fn malformed_xml_is_reported() {
        let err = XmlDecoder.decode::<User>(b"<user><id>3</user>").unwrap_err();
        assert!(matches!(err, DecodeError::Xml(_)));
    }

    #[test]
    fn content_types() {
        assert_eq!(JsonDecoder.content_type(), "application/json");
        assert_eq!(YamlDecoder.content_type(), "application/yaml");
        assert_eq!(XmlDecoder.content_type(), "application/xml");
    }
}
