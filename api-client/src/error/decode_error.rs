//! Response decoding failures.

use serde_json::error::Category;
use thiserror::Error;

use super::BoxError;

/// Failure reported by a [`Decoder`](crate::Decoder).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML decode error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML decode error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// Raised by decoders outside this crate.
    #[error("decode error: {0}")]
    Custom(#[source] BoxError),
}

impl DecodeError {
    pub fn custom(cause: impl Into<BoxError>) -> Self {
        Self::Custom(cause.into())
    }

    /// A diagnostic aimed at whoever has to fix the payload or the model.
    ///
    /// Says what kind of problem it is and, where the format reports one,
    /// where in the document it happened.
    pub fn describe(&self) -> String {
        match self {
            Self::Json(err) => {
                let (line, column) = (err.line(), err.column());
                match err.classify() {
                    Category::Syntax => {
                        format!("malformed JSON at line {line}, column {column}: {err}")
                    }
                    Category::Eof => format!("JSON ended early at line {line}, column {column}"),
                    Category::Data => format!(
                        "JSON does not match the expected type at line {line}, column {column}: {err}"
                    ),
                    Category::Io => format!("I/O failure while reading JSON: {err}"),
                }
            }
            Self::Yaml(err) => match err.location() {
                Some(at) => format!(
                    "invalid YAML at line {}, column {}: {err}",
                    at.line(),
                    at.column()
                ),
                None => format!("invalid YAML: {err}"),
            },
            Self::Xml(err) => format!("invalid XML: {err}"),
            Self::Custom(err) => err.to_string(),
        }
    }

    /// Returns `true` if the bytes were well-formed but did not fit the target type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::Json(err) if err.classify() == Category::Data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct User {
        id: u64,
        name: String,
    }

    fn json_error(input: &str) -> DecodeError {
        serde_json::from_str::<User>(input).unwrap_err().into()
    }

    #[test]
    fn describes_missing_field() {
        let err = json_error(r#"{"id":1}"#);
        let text = err.describe();
        assert!(text.starts_with("JSON does not match the expected type"));
        assert!(text.contains("missing field `name`"));
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn describes_syntax_error_with_position() {
        let err = json_error("{\n  \"id\": 1,\n  oops\n}");
        let text = err.describe();
        assert!(text.starts_with("malformed JSON at line 3"));
        assert!(!err.is_type_mismatch());
    }

    #[test]
    fn describes_truncated_input() {
        let err = json_error(r#"{"id":1,"na"#);
        assert!(err.describe().starts_with("JSON ended early"));
    }

    #[test]
    fn describes_yaml_with_location() {
        let err: DecodeError = serde_yaml::from_str::<User>("id: [1\n")
            .unwrap_err()
            .into();
        assert!(err.describe().starts_with("invalid YAML"));
    }

    #[test]
    fn custom_errors_keep_their_message() {
        let err = DecodeError::custom("unsupported protobuf revision");
        assert_eq!(err.describe(), "unsupported protobuf revision");
        assert_eq!(err.to_string(), "decode error: unsupported protobuf revision");
    }
}
