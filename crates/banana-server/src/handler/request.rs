//! Request bodies for `POST /api/gemini`.
//!
//! The body is read as a JSON object first so `mode` can pick the shape, then
//! deserialized into [`PipelineBody`] or [`FinalizeRequest`]. Deserialization
//! errors name the offending field and become 400 responses.

use banana_core::EncodedImage;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::{Error, ErrorKind};
use crate::pipeline::PipelineRequest;

/// Value of `mode` that selects the pipeline.
const PIPELINE_MODE: &str = "pipeline";

/// Body of a pipeline request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineBody {
    /// Scene every object is folded into.
    pub base: EncodedImage,
    /// Objects to blend, in order.
    pub objects: Vec<EncodedImage>,
    /// Free-form guidance from the user; blank means none.
    #[serde(default, deserialize_with = "non_blank_text")]
    pub user_prompt: Option<String>,
}

impl From<PipelineBody> for PipelineRequest {
    fn from(body: PipelineBody) -> Self {
        Self {
            base: body.base,
            objects: body.objects,
            user_intent: body.user_prompt,
        }
    }
}

/// Body of a finalize request: one blend call over an image and an optional guide.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeRequest {
    pub image: EncodedImage,
    #[serde(default, deserialize_with = "non_blank_image")]
    pub guide: Option<EncodedImage>,
    #[serde(default, deserialize_with = "non_blank_text")]
    pub prompt: Option<String>,
}

/// A validated blend request.
#[derive(Debug, Clone)]
pub enum GenerateRequest {
    /// Fold objects into a base image.
    Pipeline(PipelineRequest),
    /// Blend a single image.
    Finalize(FinalizeRequest),
}

impl GenerateRequest {
    /// Parses a raw request body.
    ///
    /// `mode == "pipeline"` selects pipeline mode; anything else, including a
    /// missing `mode`, selects finalize mode.
    pub fn from_slice(body: &[u8]) -> Result<Self, Error<'static>> {
        let body: Map<String, Value> = serde_json::from_slice(body).map_err(|error| {
            let message = if error.is_data() {
                "Request body must be a JSON object"
            } else {
                "Request body must be valid JSON"
            };
            ErrorKind::BadRequest
                .with_message(message)
                .with_context(error.to_string())
        })?;

        let is_pipeline = body.get("mode").and_then(Value::as_str) == Some(PIPELINE_MODE);
        let body = Value::Object(body);

        let request = if is_pipeline {
            serde_json::from_value::<PipelineBody>(body).map(|body| Self::Pipeline(body.into()))
        } else {
            serde_json::from_value::<FinalizeRequest>(body).map(Self::Finalize)
        };

        request.map_err(|error| {
            ErrorKind::BadRequest.with_message(format!("Invalid request body: {error}"))
        })
    }

    /// Returns the request mode as logged.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Pipeline(_) => "pipeline",
            Self::Finalize(_) => "finalize",
        }
    }
}

/// Trims text fields; blank or null becomes `None`.
fn non_blank_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty()))
}

/// Decodes an optional data URL; blank or null becomes `None`.
fn non_blank_image<'de, D>(deserializer: D) -> Result<Option<EncodedImage>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(url) if !url.trim().is_empty() => EncodedImage::from_data_url(&url)
            .map(Some)
            .map_err(D::Error::custom),
        _ => Ok(None),
    }
}
