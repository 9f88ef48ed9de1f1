//! Image-generating blend calls.

use banana_core::{EncodedImage, ModelGateway, ModelPrompt, ResponseModality, Result};

use super::{PipelineOutcome, TRACING_TARGET};

/// Asks the image model to produce one image from text plus inline images.
#[derive(Debug, Clone)]
pub struct Compositor {
    gateway: ModelGateway,
    model: String,
}

impl Compositor {
    /// Creates a compositor calling `model` through `gateway`.
    pub fn new(gateway: ModelGateway, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
        }
    }

    /// Returns the image model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `[instruction?, images...]` and extracts the first image.
    ///
    /// When the response carries no image, the raw upstream body comes back
    /// as [`PipelineOutcome::Diagnostic`].
    pub async fn compose(
        &self,
        instruction: Option<&str>,
        images: impl IntoIterator<Item = EncodedImage>,
    ) -> Result<PipelineOutcome> {
        let mut prompt = ModelPrompt::new(ResponseModality::Image);
        if let Some(instruction) = instruction {
            prompt = prompt.with_text(instruction);
        }
        let prompt = prompt.with_images(images);

        let response = self.gateway.invoke(&self.model, &prompt).await?;

        if let Some(image) = response.first_image() {
            return Ok(PipelineOutcome::Image(image.clone()));
        }

        tracing::warn!(
            target: TRACING_TARGET,
            model = %self.model,
            text = response.first_text().unwrap_or_default(),
            "No image in blend response"
        );

        Ok(PipelineOutcome::Diagnostic(response.into_raw()))
    }
}
