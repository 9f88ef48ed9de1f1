//! Iterative blend pipeline.
//!
//! Objects are folded into the base image [`CHUNK_SIZE`] at a time. Every
//! step describes the current base and its chunk concurrently, then sends
//! the descriptions, the user intent and all images of the step to the
//! image model. The image that comes back is the base for the next step.
//!
//! Steps run strictly in order. A failed call aborts the run, and a blend
//! response without an image ends it early with the raw upstream body.

mod compositor;
mod describer;
mod prompts;

use std::collections::VecDeque;

use banana_core::{EncodedImage, Error, ModelGateway, ModelRoles, Result};
use serde_json::Value;
use uuid::Uuid;

pub use self::compositor::Compositor;
pub use self::describer::Describer;
pub use self::prompts::{DESCRIBE_INSTRUCTION, NO_INTENT_PLACEHOLDER, compose_instruction};

/// Tracing target for pipeline operations.
pub const TRACING_TARGET: &str = "banana_server::pipeline";

/// Number of objects blended per step.
pub const CHUNK_SIZE: usize = 2;

/// Result of a pipeline run or a finalize call.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The produced image.
    Image(EncodedImage),
    /// The raw upstream body of a blend response that carried no image.
    Diagnostic(Value),
}

/// Input of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Starting base image.
    pub base: EncodedImage,
    /// Object images, blended in this order.
    pub objects: Vec<EncodedImage>,
    /// Free-text steering for every blend step.
    pub user_intent: Option<String>,
}

/// Progress of a run: the latest base and the objects still to blend.
#[derive(Debug)]
struct PipelineState {
    current_base: EncodedImage,
    remaining: VecDeque<EncodedImage>,
}

impl PipelineState {
    fn new(base: EncodedImage, objects: Vec<EncodedImage>) -> Self {
        Self {
            current_base: base,
            remaining: objects.into(),
        }
    }

    /// Removes the next chunk of objects, if any remain.
    fn take_chunk(&mut self) -> Option<Vec<EncodedImage>> {
        if self.remaining.is_empty() {
            return None;
        }

        let len = self.remaining.len().min(CHUNK_SIZE);
        Some(self.remaining.drain(..len).collect())
    }
}

/// Runs blend requests against a [`ModelGateway`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    describer: Describer,
    compositor: Compositor,
}

impl Pipeline {
    /// Creates a pipeline using the text and image models from `roles`.
    pub fn new(gateway: ModelGateway, roles: &ModelRoles) -> Self {
        Self {
            describer: Describer::new(gateway.clone(), &roles.text_model),
            compositor: Compositor::new(gateway, &roles.image_model),
        }
    }

    /// Folds every object into the base, two at a time.
    ///
    /// With no objects the base comes back unchanged and no call is made.
    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineOutcome> {
        let PipelineRequest {
            base,
            objects,
            user_intent,
        } = request;

        let run_id = Uuid::new_v4();
        let total_steps = objects.len().div_ceil(CHUNK_SIZE);

        tracing::info!(
            target: TRACING_TARGET,
            %run_id,
            objects = objects.len(),
            steps = total_steps,
            has_intent = user_intent.is_some(),
            "Starting blend pipeline"
        );

        let mut state = PipelineState::new(base, objects);
        let mut step = 0;

        while let Some(chunk) = state.take_chunk() {
            step += 1;

            tracing::debug!(
                target: TRACING_TARGET,
                %run_id,
                step,
                chunk_len = chunk.len(),
                "Describing step images"
            );

            let mut described = Vec::with_capacity(chunk.len() + 1);
            described.push(&state.current_base);
            described.extend(chunk.iter());

            let descriptions = self.describer.describe_all(&described).await?;
            let Some((base_description, object_descriptions)) = descriptions.split_first() else {
                return Err(Error::internal_error().with_message("description set is empty"));
            };

            let instruction = compose_instruction(
                base_description,
                object_descriptions,
                user_intent.as_deref(),
            );

            let images = std::iter::once(state.current_base.clone()).chain(chunk);
            match self.compositor.compose(Some(instruction.as_str()), images).await? {
                PipelineOutcome::Image(next_base) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        %run_id,
                        step,
                        bytes = next_base.len(),
                        "Blend step produced a new base"
                    );
                    state.current_base = next_base;
                }
                diagnostic @ PipelineOutcome::Diagnostic(_) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        %run_id,
                        step,
                        remaining = state.remaining.len(),
                        "Blend step returned no image, stopping"
                    );
                    return Ok(diagnostic);
                }
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            %run_id,
            steps = step,
            "Blend pipeline completed"
        );

        Ok(PipelineOutcome::Image(state.current_base))
    }

    /// Runs a single blend call with parts `[prompt?, image, guide?]`.
    pub async fn finalize(
        &self,
        image: EncodedImage,
        guide: Option<EncodedImage>,
        prompt: Option<&str>,
    ) -> Result<PipelineOutcome> {
        tracing::info!(
            target: TRACING_TARGET,
            has_guide = guide.is_some(),
            has_prompt = prompt.is_some(),
            "Finalizing image"
        );

        let images = std::iter::once(image).chain(guide);
        self.compositor.compose(prompt, images).await
    }

    /// Returns the text model name.
    pub fn text_model(&self) -> &str {
        self.describer.model()
    }

    /// Returns the image model name.
    pub fn image_model(&self) -> &str {
        self.compositor.model()
    }
}
