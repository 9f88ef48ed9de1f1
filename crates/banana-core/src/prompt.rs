//! Provider-neutral prompts for a single model call.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::EncodedImage;

/// One ordered part of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Plain instruction text.
    Text(String),
    /// An inline image.
    Image(EncodedImage),
}

/// Output modality requested from the model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ResponseModality {
    /// Text-only output.
    Text,
    /// Image output.
    Image,
}

/// Generation settings sent with every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    /// The single output modality the model may answer with.
    pub modality: ResponseModality,
    /// Sampling temperature.
    pub temperature: f32,
}

impl GenerationConfig {
    /// Deterministic settings for the given modality.
    pub const fn deterministic(modality: ResponseModality) -> Self {
        Self {
            modality,
            temperature: 0.0,
        }
    }
}

/// A single-turn prompt: ordered content parts plus generation settings.
///
/// Prompts are assembled with the consuming `with_*` methods and are only read
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "prompts do nothing unless sent to a gateway"]
pub struct ModelPrompt {
    parts: Vec<ContentPart>,
    generation: GenerationConfig,
}

impl ModelPrompt {
    /// Creates an empty prompt answering with `modality` at temperature 0.
    pub fn new(modality: ResponseModality) -> Self {
        Self {
            parts: Vec::new(),
            generation: GenerationConfig::deterministic(modality),
        }
    }

    /// Appends a text part.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(ContentPart::Text(text.into()));
        self
    }

    /// Appends an inline image part.
    pub fn with_image(mut self, image: EncodedImage) -> Self {
        self.parts.push(ContentPart::Image(image));
        self
    }

    /// Appends several inline image parts, keeping their order.
    pub fn with_images(mut self, images: impl IntoIterator<Item = EncodedImage>) -> Self {
        self.parts.extend(images.into_iter().map(ContentPart::Image));
        self
    }

    /// Returns the ordered content parts.
    #[inline]
    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    /// Returns the generation settings.
    #[inline]
    pub fn generation(&self) -> GenerationConfig {
        self.generation
    }

    /// Returns the requested output modality.
    #[inline]
    pub fn modality(&self) -> ResponseModality {
        self.generation.modality
    }

    /// Returns the first text part, which holds the instruction.
    pub fn instruction(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::Text(text) => Some(text.as_str()),
            ContentPart::Image(_) => None,
        })
    }

    /// Returns the inline images in order.
    pub fn images(&self) -> impl Iterator<Item = &EncodedImage> {
        self.parts.iter().filter_map(|part| match part {
            ContentPart::Image(image) => Some(image),
            ContentPart::Text(_) => None,
        })
    }

    /// Returns the number of inline images.
    pub fn image_count(&self) -> usize {
        self.images().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_keep_insertion_order() {
        let first = EncodedImage::new("image/png", b"one".to_vec());
        let second = EncodedImage::new("image/png", b"two".to_vec());

        let prompt = ModelPrompt::new(ResponseModality::Image)
            .with_text("blend")
            .with_image(first.clone())
            .with_images([second.clone()]);

        assert_eq!(
            prompt.parts(),
            &[
                ContentPart::Text("blend".into()),
                ContentPart::Image(first),
                ContentPart::Image(second),
            ]
        );
        assert_eq!(prompt.instruction(), Some("blend"));
        assert_eq!(prompt.image_count(), 2);
    }

    #[test]
    fn defaults_to_zero_temperature() {
        let prompt = ModelPrompt::new(ResponseModality::Text);
        assert_eq!(prompt.generation().temperature, 0.0);
        assert_eq!(prompt.modality(), ResponseModality::Text);
        assert!(prompt.instruction().is_none());
    }

    #[test]
    fn modality_wire_names() {
        assert_eq!(ResponseModality::Text.as_ref(), "TEXT");
        assert_eq!(ResponseModality::Image.to_string(), "IMAGE");
        assert_eq!(
            serde_json::to_string(&ResponseModality::Image).unwrap(),
            "\"IMAGE\""
        );
    }
}
