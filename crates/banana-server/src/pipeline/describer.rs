//! Short text descriptions of images.

use banana_core::{EncodedImage, ModelGateway, ModelPrompt, ResponseModality, Result};
use futures::future::try_join_all;

use super::TRACING_TARGET;
use super::prompts::DESCRIBE_INSTRUCTION;

/// Asks the text model for a short description of an image.
#[derive(Debug, Clone)]
pub struct Describer {
    gateway: ModelGateway,
    model: String,
}

impl Describer {
    /// Creates a describer calling `model` through `gateway`.
    pub fn new(gateway: ModelGateway, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    /// Returns the text model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Describes one image.
    ///
    /// A response without any text part yields an empty description.
    pub async fn describe(&self, image: &EncodedImage) -> Result<String> {
        let prompt = ModelPrompt::new(ResponseModality::Text)
            .with_text(DESCRIBE_INSTRUCTION)
            .with_image(image.clone());

        let response = self.gateway.invoke(&self.model, &prompt).await?;

        let description = match response.first_text() {
            Some(text) => text.trim().to_owned(),
            None => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    model = %self.model,
                    "No text in description response"
                );
                String::new()
            }
        };

        Ok(description)
    }

    /// Describes every image concurrently, keeping positions.
    ///
    /// All calls are started together; the first failure fails the whole set.
    pub async fn describe_all(&self, images: &[&EncodedImage]) -> Result<Vec<String>> {
        try_join_all(images.iter().map(|image| self.describe(image))).await
    }
}
