//! The model gateway seam.
//!
//! A [`GatewayProvider`] turns a [`ModelPrompt`] into a normalized
//! [`ModelResponse`] for a named model. [`ModelGateway`] wraps any provider
//! behind an `Arc` and adds structured logging for every call.
//!
//! # Example
//!
//! ```rust,ignore
//! use banana_core::{ModelGateway, ModelPrompt, ResponseModality};
//!
//! let gateway = ModelGateway::from_provider(my_provider);
//! let prompt = ModelPrompt::new(ResponseModality::Text).with_text("Describe this image.");
//! let response = gateway.invoke("gemini-2.5-flash", &prompt).await?;
//! ```

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;
mod service;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::{MockCall, MockProvider};
pub use service::ModelGateway;

use crate::{ModelPrompt, ModelResponse, Result};

/// Tracing target for gateway operations.
pub const TRACING_TARGET: &str = "banana_core::gateway";

/// A generative model backend addressed by model name.
///
/// Implementations issue exactly one upstream request per call and never
/// retry; every failure is returned to the caller.
#[async_trait::async_trait]
pub trait GatewayProvider: Send + Sync {
    /// Sends `prompt` to `model` and returns the normalized response.
    async fn invoke(&self, model: &str, prompt: &ModelPrompt) -> Result<ModelResponse>;

    /// Short provider name used in logs.
    fn provider_name(&self) -> &'static str;
}
