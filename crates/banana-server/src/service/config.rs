use banana_core::{ModelGateway, ModelRoles, Result};
use banana_gemini::{GeminiClient, GeminiConfig};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use super::TRACING_TARGET;

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Gemini gateway settings.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(flatten)]
    pub gemini: GeminiConfig,
}

impl ServiceConfig {
    /// Creates a configuration around the given gateway settings.
    pub fn new(gemini: GeminiConfig) -> Self {
        Self { gemini }
    }

    /// Resolves the text and image model names.
    pub fn model_roles(&self) -> ModelRoles {
        self.gemini.resolve_roles()
    }

    /// Builds the gateway, or `None` when no API key is configured.
    ///
    /// Any other configuration problem is an error.
    pub fn connect_gateway(&self) -> Result<Option<ModelGateway>> {
        if !self.gemini.has_api_key() {
            tracing::warn!(
                target: TRACING_TARGET,
                "GEMINI_API_KEY is not set, every blend request will fail"
            );
            return Ok(None);
        }

        let client = GeminiClient::new(self.gemini.clone())?;
        Ok(Some(client.into_gateway()))
    }
}
