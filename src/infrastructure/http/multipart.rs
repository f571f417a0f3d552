//! Manual multipart/form-data codec
//!
//! Host-style HTTP clients in this pipeline accept only a single opaque
//! body buffer plus an explicit Content-Type header, so form bodies are
//! framed by hand here instead of via `reqwest::multipart`.
//!
//! Framing convention: each body delimiter line is `------<token>` (six
//! leading dashes) while the Content-Type header advertises
//! `boundary=----<token>` (four leading dashes). Servers prepend the
//! standard `--` when matching delimiters, so both spellings must be
//! produced exactly as-is.

use uuid::Uuid;

/// Static prefix for boundary tokens
const BOUNDARY_PREFIX: &str = "Boundary";

/// Random characters appended to the prefix
const BOUNDARY_RANDOM_LEN: usize = 16;

/// A freshly generated multipart boundary token.
///
/// Tokens are generated independently per request with no shared state.
/// The token is never checked against the payload bytes; a collision with
/// a `------Boundary<16 alphanumerics>` literal inside arbitrary audio
/// content is an accepted risk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryToken(String);

impl BoundaryToken {
    /// Generate a fresh token: the static prefix plus 16 random
    /// alphanumeric characters
    pub fn generate() -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("{}{}", BOUNDARY_PREFIX, &random[..BOUNDARY_RANDOM_LEN]))
    }

    /// The raw token, without any dash framing
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Value for the outgoing request's Content-Type header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary=----{}", self.0)
    }

    /// Delimiter line used between body parts
    fn delimiter(&self) -> String {
        format!("------{}", self.0)
    }
}

/// A field value: UTF-8 text or an opaque binary blob
#[derive(Debug, Clone)]
enum FieldValue {
    Text(String),
    Bytes(Vec<u8>),
}

/// An ordered mapping of field name to value.
///
/// Insertion order determines part order in the encoded body.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: Vec<(String, FieldValue)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a UTF-8 text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), FieldValue::Text(value.into())));
        self
    }

    /// Append a binary field. Encoded parts carry a synthetic
    /// `filename="blob"` and an octet-stream content type.
    pub fn bytes(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.fields.push((name.into(), FieldValue::Bytes(data)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode the form into a body buffer framed by `boundary`.
    /// The caller sets the request's Content-Type header to
    /// [`BoundaryToken::content_type`].
    pub fn encode(&self, boundary: &BoundaryToken) -> Vec<u8> {
        let delimiter = boundary.delimiter();
        let mut body = Vec::new();

        for (name, value) in &self.fields {
            body.extend_from_slice(delimiter.as_bytes());
            body.extend_from_slice(b"\r\n");
            match value {
                FieldValue::Text(text) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(b"\r\n");
                    body.extend_from_slice(text.as_bytes());
                }
                FieldValue::Bytes(data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"blob\"\r\n",
                            name
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
                    body.extend_from_slice(b"\r\n");
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(delimiter.as_bytes());
        body.extend_from_slice(b"--");
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_prefix_and_random_tail() {
        let boundary = BoundaryToken::generate();
        let token = boundary.token();
        assert!(token.starts_with(BOUNDARY_PREFIX));
        let tail = &token[BOUNDARY_PREFIX.len()..];
        assert_eq!(tail.len(), BOUNDARY_RANDOM_LEN);
        assert!(tail.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_are_independent() {
        let a = BoundaryToken::generate();
        let b = BoundaryToken::generate();
        assert_ne!(a.token(), b.token());
    }

    #[test]
    fn content_type_has_four_dashes_body_has_six() {
        let boundary = BoundaryToken::generate();
        let content_type = boundary.content_type();
        assert!(content_type.starts_with("multipart/form-data; boundary=----Boundary"));
        assert!(!content_type.contains("------"));

        let body = MultipartForm::new().text("a", "b").encode(&boundary);
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with(&format!("------{}", boundary.token())));
    }

    #[test]
    fn encode_single_text_field() {
        let boundary = BoundaryToken::generate();
        let body = MultipartForm::new().text("task", "transcribe").encode(&boundary);
        let text = String::from_utf8(body).unwrap();
        let expected = format!(
            "------{token}\r\nContent-Disposition: form-data; name=\"task\"\r\n\r\ntranscribe\r\n------{token}--",
            token = boundary.token()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn encode_binary_field_has_filename_and_octet_stream() {
        let boundary = BoundaryToken::generate();
        let body = MultipartForm::new()
            .bytes("audio_file", vec![0x00, 0xff, 0x10])
            .encode(&boundary);

        let delimiter = format!("------{}", boundary.token());
        let header_end = body
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header terminator");
        let header = String::from_utf8(body[..header_end].to_vec()).unwrap();
        assert!(header.starts_with(&delimiter));
        assert!(header.contains("Content-Disposition: form-data; name=\"audio_file\"; filename=\"blob\""));
        assert!(header.contains("Content-Type: application/octet-stream"));

        // Raw bytes survive unchanged between the blank line and trailer
        let value = &body[header_end + 4..header_end + 7];
        assert_eq!(value, &[0x00, 0xff, 0x10]);
    }

    #[test]
    fn encode_preserves_insertion_order() {
        let boundary = BoundaryToken::generate();
        let body = MultipartForm::new()
            .text("first", "1")
            .bytes("second", vec![2])
            .text("third", "3")
            .encode(&boundary);
        let text = String::from_utf8_lossy(&body);

        let first = text.find("name=\"first\"").unwrap();
        let second = text.find("name=\"second\"").unwrap();
        let third = text.find("name=\"third\"").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn encode_ends_with_closing_delimiter() {
        let boundary = BoundaryToken::generate();
        let body = MultipartForm::new().text("a", "b").encode(&boundary);
        let text = String::from_utf8(body).unwrap();
        assert!(text.ends_with(&format!("------{}--", boundary.token())));
    }
}
