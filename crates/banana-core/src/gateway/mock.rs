//! Scripted gateway provider for tests.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! banana-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use banana_core::{MockProvider, ModelResponse, ResponsePart};
//!
//! let mock = MockProvider::new(|_model, _prompt| {
//!     Ok(ModelResponse::new(vec![ResponsePart::Text("a cat".into())], json!({})))
//! });
//! let gateway = mock.clone().into_gateway();
//! // ... drive code with `gateway`, then inspect `mock.calls()`.
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::json;

use super::{GatewayProvider, ModelGateway};
use crate::{ContentPart, ModelPrompt, ModelResponse, ResponseModality, ResponsePart, Result};

type Responder = dyn Fn(&str, &ModelPrompt) -> Result<ModelResponse> + Send + Sync;

/// A single call observed by [`MockProvider`].
#[derive(Debug, Clone)]
pub struct MockCall {
    /// Model the call was addressed to.
    pub model: String,
    /// Prompt exactly as received.
    pub prompt: ModelPrompt,
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<MockCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Gateway provider answering from a closure and recording every call.
///
/// Clones share the same call log.
#[derive(Clone)]
pub struct MockProvider {
    responder: Arc<Responder>,
    latency: Option<Duration>,
    state: Arc<MockState>,
}

impl fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockProvider")
            .field("latency", &self.latency)
            .field("calls", &self.call_count())
            .finish_non_exhaustive()
    }
}

impl Default for MockProvider {
    /// Describes every image as `"mock description"` and echoes the first
    /// prompt image back for image calls.
    fn default() -> Self {
        Self::new(|_, prompt| {
            let parts = match prompt.modality() {
                ResponseModality::Text => vec![ResponsePart::Text("mock description".into())],
                ResponseModality::Image => prompt
                    .images()
                    .next()
                    .cloned()
                    .map(ResponsePart::Image)
                    .into_iter()
                    .collect(),
            };

            Ok(ModelResponse::new(parts, json!({ "mock": true })))
        })
    }
}

impl MockProvider {
    /// Creates a provider answering every call with `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &ModelPrompt) -> Result<ModelResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            latency: None,
            state: Arc::new(MockState::default()),
        }
    }

    /// Delays every answer, which makes overlapping calls observable.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns every recorded call in arrival order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the recorded calls addressed to `model`.
    pub fn calls_for(&self, model: &str) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.model == model)
            .collect()
    }

    /// Returns how many calls were received.
    pub fn call_count(&self) -> usize {
        self.state
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns the highest number of calls that were in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    /// Wraps a clone of this provider in a [`ModelGateway`].
    pub fn into_gateway(self) -> ModelGateway {
        ModelGateway::from_provider(self)
    }

    /// Returns the text parts of a recorded prompt, concatenated.
    pub fn prompt_text(prompt: &ModelPrompt) -> String {
        prompt
            .parts()
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait::async_trait]
impl GatewayProvider for MockProvider {
    async fn invoke(&self, model: &str, prompt: &ModelPrompt) -> Result<ModelResponse> {
        self.state
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockCall {
                model: model.to_owned(),
                prompt: prompt.clone(),
            });

        let current = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let result = (self.responder)(model, prompt);
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
