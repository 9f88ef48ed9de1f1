//! Gemini client configuration.

use std::fmt;
use std::time::Duration;

use banana_core::ModelRoles;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default per-call timeout in seconds.
///
/// Image generation regularly takes tens of seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Configuration for the Gemini client.
///
/// Built once at startup and handed to [`GeminiClient::new`]. Nothing reads
/// the environment after that.
///
/// [`GeminiClient::new`]: crate::GeminiClient::new
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct GeminiConfig {
    /// API key sent as the `key` query parameter.
    ///
    /// Without it the server still starts, but every request fails.
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL of the generative language API.
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-base-url", env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)
    )]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for both roles unless a role-specific override is set.
    #[cfg_attr(feature = "config", arg(long = "gemini-model", env = "GEMINI_MODEL"))]
    #[serde(default)]
    pub model: Option<String>,

    /// Model used to describe images.
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-text-model", env = "GEMINI_TEXT_MODEL")
    )]
    #[serde(default)]
    pub text_model: Option<String>,

    /// Model used to generate blended images.
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-image-model", env = "GEMINI_IMAGE_MODEL")
    )]
    #[serde(default)]
    pub image_model: Option<String>,

    /// Timeout in seconds for a single model call.
    #[cfg_attr(
        feature = "config",
        arg(long = "gemini-timeout", env = "GEMINI_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)
    )]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: None,
            text_model: None,
            image_model: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl GeminiConfig {
    /// Creates a configuration with the given API key and defaults elsewhere.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-call timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    /// Returns the API key if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Returns true if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Returns the per-call timeout, falling back to the default when zero.
    pub fn request_timeout(&self) -> Duration {
        if self.request_timeout_secs == 0 {
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.request_timeout_secs)
        }
    }

    /// Resolves the text and image-generation model names.
    ///
    /// `GEMINI_TEXT_MODEL` / `GEMINI_IMAGE_MODEL` win over `GEMINI_MODEL`,
    /// which wins over the built-in defaults.
    pub fn resolve_roles(&self) -> ModelRoles {
        ModelRoles::resolve(
            self.text_model.as_deref(),
            self.image_model.as_deref(),
            self.model.as_deref(),
        )
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key().map(|_| "****"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
