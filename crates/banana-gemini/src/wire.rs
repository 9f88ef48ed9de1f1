//! `generateContent` request and response bodies.
//!
//! Requests are written in the shape the endpoint documents. Responses are
//! read leniently: inline image parts show up as either `inlineData` or
//! `inline_data`, with `mimeType` or `mime_type`, and both are accepted here so
//! nothing past this module sees provider field names.

use banana_core::{
    ContentPart, EncodedImage, ModelPrompt, ModelResponse, ResponseModality, ResponsePart,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::TRACING_TARGET;

/// Role of the single user turn.
const USER_ROLE: &str = "user";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: RequestGenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: RequestInlineData<'a> },
}

#[derive(Debug, Serialize)]
struct RequestInlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestGenerationConfig {
    response_modalities: Vec<ResponseModality>,
    temperature: f32,
}

impl<'a> GenerateContentRequest<'a> {
    /// Builds a single-turn request from a prompt.
    pub(crate) fn from_prompt(prompt: &'a ModelPrompt) -> Self {
        let parts = prompt
            .parts()
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => RequestPart::Text {
                    text: text.as_str(),
                },
                ContentPart::Image(image) => RequestPart::InlineData {
                    inline_data: RequestInlineData {
                        mime_type: image.mime_type(),
                        data: image.to_base64(),
                    },
                },
            })
            .collect();

        let generation = prompt.generation();

        Self {
            contents: vec![RequestContent {
                role: USER_ROLE,
                parts,
            }],
            generation_config: RequestGenerationConfig {
                response_modalities: vec![generation.modality],
                temperature: generation.temperature,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Default, Deserialize)]
struct WirePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "inlineData", alias = "inline_data")]
    inline_data: Option<WireInlineData>,
}

#[derive(Debug, Deserialize)]
struct WireInlineData {
    #[serde(default, rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

/// Maps a raw `generateContent` body onto [`ModelResponse`].
///
/// Parts are taken from every candidate in order. A body that does not match
/// the expected shape yields a response with no parts; the raw JSON is kept
/// either way.
pub(crate) fn normalize(raw: Value) -> ModelResponse {
    let decoded = match GenerateContentResponse::deserialize(&raw) {
        Ok(decoded) => decoded,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Unexpected response shape, treating as empty"
            );
            GenerateContentResponse::default()
        }
    };

    let parts = decoded
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(into_response_part)
        .collect();

    ModelResponse::new(parts, raw)
}

fn into_response_part(part: WirePart) -> Option<ResponsePart> {
    if let Some(inline) = part.inline_data {
        let data = inline.data.filter(|data| !data.is_empty())?;
        let mime_type = inline.mime_type.unwrap_or_default();

        return match EncodedImage::from_base64(mime_type, &data) {
            Ok(image) => Some(ResponsePart::Image(image)),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Skipping undecodable inline image part"
                );
                None
            }
        };
    }

    part.text.map(ResponsePart::Text)
}
