//! Gateway service with observability.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;

use super::{GatewayProvider, TRACING_TARGET};
use crate::{ModelPrompt, ModelResponse, Result};

/// Shared handle to a [`GatewayProvider`].
///
/// Cloning is cheap; every clone talks to the same provider.
#[derive(Clone)]
pub struct ModelGateway {
    provider: Arc<dyn GatewayProvider>,
}

impl fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelGateway")
            .field("provider", &self.provider.provider_name())
            .finish_non_exhaustive()
    }
}

impl ModelGateway {
    /// Creates a new gateway from a provider.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: GatewayProvider + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Returns the name of the wrapped provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Sends `prompt` to `model`.
    pub async fn invoke(&self, model: &str, prompt: &ModelPrompt) -> Result<ModelResponse> {
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET,
            provider = self.provider.provider_name(),
            model = model,
            modality = %prompt.modality(),
            parts = prompt.parts().len(),
            images = prompt.image_count(),
            "Invoking model"
        );

        let result = self.provider.invoke(model, prompt).await;
        let elapsed = Timestamp::now().duration_since(started_at);

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    provider = self.provider.provider_name(),
                    model = model,
                    response_parts = response.parts().len(),
                    has_text = response.first_text().is_some(),
                    has_image = response.first_image().is_some(),
                    elapsed_ms = elapsed.as_millis(),
                    "Model call completed"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    provider = self.provider.provider_name(),
                    model = model,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Model call failed"
                );
            }
        }

        result
    }
}
