//! `multipart/form-data` bodies for single-file uploads.

use bytes::{BufMut, Bytes, BytesMut};
use strum::{AsRefStr, Display, EnumIter, EnumString};

const CRLF: &[u8] = b"\r\n";

/// A single file plus text fields, serialized as `multipart/form-data`.
///
/// Text fields are written in insertion order, followed by the file part
/// under the field name `file`. The boundary is used as given; it is the
/// caller's job to pick one that does not occur in the payload.
///
/// ## Examples
///
/// ```rust
/// use api_client::MultipartFormData;
///
/// let form = MultipartFormData::new("B", "hi", "f.txt", "text/plain")
///     .parameter("name", "John");
///
/// let body = form.as_http_body();
/// assert!(body.starts_with(b"--B\r\n"));
/// assert!(body.ends_with(b"--B--\r\n"));
/// assert_eq!(form.content_type(), "multipart/form-data; boundary=B");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFormData {
    boundary: String,
    file_data: Bytes,
    file_name: String,
    mime_type: String,
    parameters: Vec<(String, String)>,
}

impl MultipartFormData {
    pub fn new(
        boundary: impl Into<String>,
        file_data: impl Into<Bytes>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            boundary: boundary.into(),
            file_data: file_data.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Adds a text field. Re-adding a name replaces its value in place.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.parameters.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.parameters.push((name, value)),
        }
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn file_data(&self) -> &Bytes {
        &self.file_data
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// The `Content-Type` header value announcing this form's boundary.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Serializes the form into the request body.
    pub fn as_http_body(&self) -> Bytes {
        let mut body = BytesMut::with_capacity(self.file_data.len() + 256);

        for (name, value) in &self.parameters {
            self.put_delimiter(&mut body);
            body.put_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            );
            body.put_slice(value.as_bytes());
            body.put_slice(CRLF);
        }

        self.put_delimiter(&mut body);
        body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                self.file_name
            )
            .as_bytes(),
        );
        body.put_slice(format!("Content-Type: {}\r\n\r\n", self.mime_type).as_bytes());
        body.put_slice(&self.file_data);
        body.put_slice(CRLF);

        body.put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        body.freeze()
    }

    fn put_delimiter(&self, body: &mut BytesMut) {
        body.put_slice(b"--");
        body.put_slice(self.boundary.as_bytes());
        body.put_slice(CRLF);
    }
}

/// MIME types for common image uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString)]
pub enum ImageMimeType {
    #[strum(serialize = "image/jpeg")]
    Jpeg,
    #[strum(serialize = "image/png")]
    Png,
    #[strum(serialize = "image/gif")]
    Gif,
    #[strum(serialize = "image/bmp")]
    Bmp,
    #[strum(serialize = "image/tiff")]
    Tiff,
    #[strum(serialize = "image/svg+xml")]
    Svg,
}

impl ImageMimeType {
    /// Guesses the type from a file extension, ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

impl From<ImageMimeType> for String {
    fn from(mime: ImageMimeType) -> Self {
        mime.as_ref().to_string()
    }
}
