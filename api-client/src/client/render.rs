//! Lazy renderers for log messages.
//!
//! These only do work when a logger actually formats the message.

use std::fmt;

/// Longest body prefix written to the log.
const BODY_PREVIEW_LIMIT: usize = 1024;

/// Renders a header list as `name: value` pairs, hiding credentials.
pub(crate) struct HeaderList<'a> {
    pub headers: &'a [(String, String)],
    pub reveal_secrets: bool,
}

impl fmt::Display for HeaderList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, (name, value)) in self.headers.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            if !self.reveal_secrets && is_secret(name) {
                write!(f, "{name}: <redacted>")?;
            } else {
                write!(f, "{name}: {value}")?;
            }
        }
        f.write_str("]")
    }
}

fn is_secret(name: &str) -> bool {
    name.eq_ignore_ascii_case("authorization") || name.eq_ignore_ascii_case("proxy-authorization")
}

/// Renders a body as UTF-8 text, truncated, or as a byte count when binary.
pub(crate) struct BodyPreview<'a>(pub &'a [u8]);

impl fmt::Display for BodyPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.0;
        if body.is_empty() {
            return f.write_str("<empty>");
        }

        let shown = &body[..body.len().min(BODY_PREVIEW_LIMIT)];
        match std::str::from_utf8(shown) {
            Ok(text) if shown.len() == body.len() => f.write_str(text),
            Ok(text) => write!(f, "{text}... ({} bytes total)", body.len()),
            // cut may land inside a multi-byte character
            Err(err) if err.error_len().is_none() && err.valid_up_to() > 0 => {
                let text = std::str::from_utf8(&shown[..err.valid_up_to()]).map_err(|_| fmt::Error)?;
                write!(f, "{text}... ({} bytes total)", body.len())
            }
            Err(_) => write!(f, "<{} bytes of binary data>", body.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), "Token s3cret".to_string()),
        ]
    }

    #[test]
    fn header_list_redacts_authorization() {
        let headers = headers();
        let rendered = HeaderList {
            headers: &headers,
            reveal_secrets: false,
        }
        .to_string();
        assert_eq!(
            rendered,
            "[Accept: application/json, Authorization: <redacted>]"
        );
    }

    #[test]
    fn header_list_can_reveal_secrets() {
        let headers = headers();
        let rendered = HeaderList {
            headers: &headers,
            reveal_secrets: true,
        }
        .to_string();
        assert!(rendered.contains("Token s3cret"));
    }

    #[test]
    fn body_preview_variants() {
        assert_eq!(BodyPreview(b"").to_string(), "<empty>");
        assert_eq!(BodyPreview(br#"{"ok":true}"#).to_string(), r#"{"ok":true}"#);
        assert_eq!(
            BodyPreview(&[0xff, 0xfe, 0x00]).to_string(),
            "<3 bytes of binary data>"
        );

        let long = "a".repeat(BODY_PREVIEW_LIMIT + 10);
        let rendered = BodyPreview(long.as_bytes()).to_string();
        assert!(rendered.ends_with(&format!("... ({} bytes total)", BODY_PREVIEW_LIMIT + 10)));
    }

    #[test]
    fn body_preview_does_not_split_characters() {
        let mut text = "a".repeat(BODY_PREVIEW_LIMIT - 1);
        text.push('é');
        let rendered = BodyPreview(text.as_bytes()).to_string();
        assert!(rendered.starts_with(&"a".repeat(BODY_PREVIEW_LIMIT - 1)));
        assert!(rendered.contains("bytes total"));
    }
}
