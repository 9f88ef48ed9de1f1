//! Reqwest-based Gemini client.

use std::fmt;
use std::sync::Arc;

use banana_core::{GatewayProvider, ModelGateway, ModelPrompt, ModelResponse};
use reqwest::Client;
use url::Url;

use crate::GeminiConfig;
use crate::error::Error;
use crate::wire::{GenerateContentRequest, normalize};

/// Tracing target for Gemini client operations.
pub const TRACING_TARGET: &str = "banana_gemini::client";

/// Inner client that holds the HTTP client and configuration.
struct GeminiClientInner {
    http: Client,
    config: GeminiConfig,
    api_key: String,
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Each [`invoke`] issues exactly one POST to
/// `{base_url}/models/{model}:generateContent?key={api_key}`. Non-success
/// statuses become [`ErrorKind::Gateway`] errors carrying the status and the
/// upstream body.
/// Nothing is retried.
///
/// [`invoke`]: GatewayProvider::invoke
/// [`ErrorKind::Gateway`]: banana_core::ErrorKind::Gateway
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a new client from configuration.
    ///
    /// Fails with a configuration error when no API key is set.
    pub fn new(config: GeminiConfig) -> banana_core::Result<Self> {
        let api_key = config
            .api_key()
            .map(str::to_owned)
            .ok_or_else(|| {
                banana_core::Error::configuration().with_message("GEMINI_API_KEY is not set")
            })?;

        // Base URL must parse before any call is attempted.
        Url::parse(&config.base_url).map_err(Error::from)?;

        let timeout = config.request_timeout();

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            timeout_ms = timeout.as_millis(),
            "Creating Gemini client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("banana-studio/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| {
                banana_core::Error::internal_error()
                    .with_message("Failed to create HTTP client")
                    .with_source(err)
            })?;

        let inner = GeminiClientInner {
            http,
            config,
            api_key,
        };

        tracing::info!(
            target: TRACING_TARGET,
            "Gemini client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.inner.config
    }

    /// Converts this client into a [`ModelGateway`] for dependency injection.
    pub fn into_gateway(self) -> ModelGateway {
        ModelGateway::from_provider(self)
    }

    /// Returns the `generateContent` URL for `model`, including the API key.
    pub fn endpoint(&self, model: &str) -> banana_core::Result<Url> {
        let base = self.inner.config.base_url.trim_end_matches('/');
        let mut url =
            Url::parse(&format!("{base}/models/{model}:generateContent")).map_err(Error::from)?;
        url.query_pairs_mut().append_pair("key", &self.inner.api_key);
        Ok(url)
    }

    async fn send(&self, model: &str, prompt: &ModelPrompt) -> banana_core::Result<ModelResponse> {
        let url = self.endpoint(model)?;
        let body = GenerateContentRequest::from_prompt(prompt);

        let response = self
            .inner
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        let text = response.text().await.map_err(Error::from)?;

        if !status.is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                model = model,
                status = status.as_u16(),
                body_len = text.len(),
                "Model gateway returned an error status"
            );

            let message = if text.trim().is_empty() {
                status.to_string()
            } else {
                format!("{status}: {text}")
            };

            return Err(banana_core::Error::gateway().with_message(message));
        }

        let raw = serde_json::from_str(&text).map_err(Error::from)?;
        Ok(normalize(raw))
    }
}

#[async_trait::async_trait]
impl GatewayProvider for GeminiClient {
    async fn invoke(
        &self,
        model: &str,
        prompt: &ModelPrompt,
    ) -> banana_core::Result<ModelResponse> {
        self.send(model, prompt).await
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
