//! Model names for the two gateway roles.

use serde::{Deserialize, Serialize};

/// Model used for short text descriptions when nothing else is configured.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Model used for image generation when nothing else is configured.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// The text role and the image-generation role, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRoles {
    /// Cheap text-only model used to describe images.
    pub text_model: String,
    /// Model able to answer with an image.
    pub image_model: String,
}

impl Default for ModelRoles {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_TEXT_MODEL.to_owned(),
            image_model: DEFAULT_IMAGE_MODEL.to_owned(),
        }
    }
}

impl ModelRoles {
    /// Creates roles from explicit model names.
    pub fn new(text_model: impl Into<String>, image_model: impl Into<String>) -> Self {
        Self {
            text_model: text_model.into(),
            image_model: image_model.into(),
        }
    }

    /// Resolves both roles, most specific first.
    ///
    /// Each role takes its own override, then the shared `generic` model,
    /// then the built-in default. Blank values count as unset.
    pub fn resolve(
        text_override: Option<&str>,
        image_override: Option<&str>,
        generic: Option<&str>,
    ) -> Self {
        let pick = |specific: Option<&str>, fallback: &str| {
            specific
                .and_then(non_blank)
                .or_else(|| generic.and_then(non_blank))
                .unwrap_or(fallback)
                .to_owned()
        };

        Self {
            text_model: pick(text_override, DEFAULT_TEXT_MODEL),
            image_model: pick(image_override, DEFAULT_IMAGE_MODEL),
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
