//! Normalized model responses.

use serde_json::Value;

use crate::EncodedImage;

/// One part of a normalized model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    /// Generated text.
    Text(String),
    /// A generated inline image.
    Image(EncodedImage),
}

/// A model response reduced to an ordered list of parts.
///
/// Gateway clients produce this from whatever shape their provider returns;
/// the verbatim upstream JSON is kept alongside for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    parts: Vec<ResponsePart>,
    raw: Value,
}

impl ModelResponse {
    /// Creates a response from normalized parts and the raw upstream body.
    pub fn new(parts: Vec<ResponsePart>, raw: Value) -> Self {
        Self { parts, raw }
    }

    /// Returns all parts in upstream order.
    #[inline]
    pub fn parts(&self) -> &[ResponsePart] {
        &self.parts
    }

    /// Returns the first text part, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            ResponsePart::Text(text) => Some(text.as_str()),
            ResponsePart::Image(_) => None,
        })
    }

    /// Returns the first image part, if any.
    pub fn first_image(&self) -> Option<&EncodedImage> {
        self.parts.iter().find_map(|part| match part {
            ResponsePart::Image(image) => Some(image),
            ResponsePart::Text(_) => None,
        })
    }

    /// Returns the verbatim upstream body.
    #[inline]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Consumes the response, returning the verbatim upstream body.
    #[inline]
    pub fn into_raw(self) -> Value {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn first_lookups_skip_other_kinds() {
        let image = EncodedImage::new("image/png", b"out".to_vec());
        let response = ModelResponse::new(
            vec![
                ResponsePart::Text("here you go".into()),
                ResponsePart::Image(image.clone()),
                ResponsePart::Text("second".into()),
            ],
            json!({ "ok": true }),
        );

        assert_eq!(response.first_text(), Some("here you go"));
        assert_eq!(response.first_image(), Some(&image));
        assert_eq!(response.raw(), &json!({ "ok": true }));
    }

    #[test]
    fn empty_response_has_no_parts() {
        let raw = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let response = ModelResponse::new(Vec::new(), raw.clone());

        assert!(response.first_text().is_none());
        assert!(response.first_image().is_none());
        assert_eq!(response.into_raw(), raw);
    }
}
