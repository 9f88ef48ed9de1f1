//! Blend endpoint used by the editor.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;

use super::request::GenerateRequest;
use super::{ErrorKind, Result};
use crate::pipeline::{Pipeline, PipelineOutcome};
use crate::service::ServiceState;

/// Tracing target for blend operations.
const TRACING_TARGET: &str = "banana_server::handler::gemini";

/// Runs a pipeline or finalize request.
///
/// Answers `text/plain` with the resulting data URL, or `application/json`
/// with the raw model response when no image came back.
#[tracing::instrument(skip_all, fields(mode = tracing::field::Empty, body_len = body.len()))]
async fn generate(State(pipeline): State<Option<Pipeline>>, body: Bytes) -> Result<Response> {
    let Some(pipeline) = pipeline else {
        tracing::error!(
            target: TRACING_TARGET,
            "Rejecting request, gateway is not configured"
        );
        return Err(ErrorKind::Configuration.with_message("GEMINI_API_KEY is not set"));
    };

    let request = GenerateRequest::from_slice(&body)?;
    tracing::Span::current().record("mode", request.mode());

    let outcome = match request {
        GenerateRequest::Pipeline(request) => {
            tracing::info!(
                target: TRACING_TARGET,
                objects = request.objects.len(),
                "Blend pipeline requested"
            );
            pipeline.run(request).await?
        }
        GenerateRequest::Finalize(request) => {
            tracing::info!(
                target: TRACING_TARGET,
                has_guide = request.guide.is_some(),
                "Finalize requested"
            );
            pipeline
                .finalize(request.image, request.guide, request.prompt.as_deref())
                .await?
        }
    };

    Ok(outcome_response(outcome))
}

fn outcome_response(outcome: PipelineOutcome) -> Response {
    match outcome {
        PipelineOutcome::Image(image) => {
            tracing::info!(
                target: TRACING_TARGET,
                mime_type = image.mime_type(),
                bytes = image.len(),
                "Returning blended image"
            );
            (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                image.to_data_url(),
            )
                .into_response()
        }
        PipelineOutcome::Diagnostic(raw) => {
            tracing::warn!(
                target: TRACING_TARGET,
                "Returning raw model response without image"
            );
            axum::Json(raw).into_response()
        }
    }
}

async fn method_not_allowed() -> Response {
    ErrorKind::MethodNotAllowed
        .with_message("Use POST")
        .into_response()
}

/// Returns a [`Router`] with the blend endpoint.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/api/gemini", post(generate).fallback(method_not_allowed))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::StatusCode;
    use banana_core::{
        EncodedImage, Error as CoreError, MockProvider, ModelResponse, ModelRoles,
        ResponseModality, ResponsePart,
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::{create_test_server_with_router, create_test_server_with_state};

    const BASE: &str = "data:image/png;base64,YmFzZQ==";
    const OBJECT: &str = "data:image/png;base64,b2JqZWN0";

    fn blended() -> EncodedImage {
        EncodedImage::new("image/png", b"blended".to_vec())
    }

    /// Describes every image and blends into a fixed image.
    fn mock() -> MockProvider {
        MockProvider::new(|_, prompt| {
            let part = match prompt.modality() {
                ResponseModality::Text => ResponsePart::Text("a thing".to_owned()),
                ResponseModality::Image => ResponsePart::Image(blended()),
            };
            Ok(ModelResponse::new(vec![part], json!({})))
        })
    }

    fn state_with(mock: &MockProvider) -> ServiceState {
        ServiceState::with_gateway(mock.clone().into_gateway(), ModelRoles::default())
    }

    #[tokio::test]
    async fn finalize_returns_data_url() -> anyhow::Result<()> {
        let mock = mock();
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        let response = server
            .post("/api/gemini")
            .json(&json!({ "image": BASE, "prompt": "sharpen" }))
            .await;

        response.assert_status_ok();
        assert!(
            response
                .header(header::CONTENT_TYPE)
                .to_str()?
                .starts_with("text/plain")
        );
        assert_eq!(response.text(), blended().to_data_url());
        assert_eq!(mock.call_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn pipeline_returns_data_url() -> anyhow::Result<()> {
        let mock = mock();
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        let response = server
            .post("/api/gemini")
            .json(&json!({
                "mode": "pipeline",
                "base": BASE,
                "objects": [OBJECT, OBJECT, OBJECT],
                "userPrompt": "warmer lighting",
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), blended().to_data_url());
        assert_eq!(mock.calls_for(&ModelRoles::default().image_model).len(), 2);
        assert_eq!(mock.calls_for(&ModelRoles::default().text_model).len(), 5);
        Ok(())
    }

    #[tokio::test]
    async fn pipeline_without_objects_echoes_base() -> anyhow::Result<()> {
        let mock = mock();
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        let response = server
            .post("/api/gemini")
            .json(&json!({ "mode": "pipeline", "base": BASE, "objects": [] }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), BASE);
        assert_eq!(mock.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_image_is_bad_request() -> anyhow::Result<()> {
        let mock = mock();
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        let response = server
            .post("/api/gemini")
            .json(&json!({ "prompt": "sharpen" }))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["name"], "bad_request");
        assert!(body["message"].as_str().is_some_and(|m| m.contains("image")));
        assert_eq!(mock.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn objects_must_be_an_array() -> anyhow::Result<()> {
        let mock = mock();
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        let response = server
            .post("/api/gemini")
            .json(&json!({ "mode": "pipeline", "base": BASE, "objects": OBJECT }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(mock.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_objects_is_named_in_message() -> anyhow::Result<()> {
        let mock = mock();
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        let response = server
            .post("/api/gemini")
            .json(&json!({ "mode": "pipeline", "base": BASE }))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert!(body["message"].as_str().is_some_and(|m| m.contains("objects")));
        assert_eq!(mock.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn blank_guide_and_prompt_are_ignored() -> anyhow::Result<()> {
        let mock = mock();
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        let response = server
            .post("/api/gemini")
            .json(&json!({ "image": BASE, "guide": "", "prompt": "  " }))
            .await;

        response.assert_status_ok();
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt.images().count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() -> anyhow::Result<()> {
        let mock = mock();
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        let response = server
            .post("/api/gemini")
            .text("{ not json")
            .await;

        response.assert_status_bad_request();
        assert_eq!(mock.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_key_fails_every_request() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        for body in [
            json!({ "image": BASE }),
            json!({ "mode": "pipeline", "base": BASE, "objects": [OBJECT] }),
            json!({}),
        ] {
            let response = server.post("/api/gemini").json(&body).await;
            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(response.json::<Value>()["name"], "configuration_error");
        }
        Ok(())
    }

    #[tokio::test]
    async fn other_methods_are_rejected() -> anyhow::Result<()> {
        let mock = mock();
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        server
            .get("/api/gemini")
            .await
            .assert_status(StatusCode::METHOD_NOT_ALLOWED);
        server
            .put("/api/gemini")
            .json(&json!({ "image": BASE }))
            .await
            .assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(mock.call_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_image_in_response_returns_raw_json() -> anyhow::Result<()> {
        let raw = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        let expected = raw.clone();
        let mock = MockProvider::new(move |_, _| Ok(ModelResponse::new(Vec::new(), raw.clone())));
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        let response = server
            .post("/api/gemini")
            .json(&json!({ "image": BASE }))
            .await;

        response.assert_status_ok();
        assert!(
            response
                .header(header::CONTENT_TYPE)
                .to_str()?
                .starts_with("application/json")
        );
        assert_eq!(response.json::<Value>(), expected);
        Ok(())
    }

    #[tokio::test]
    async fn gateway_failure_surfaces_upstream_text() -> anyhow::Result<()> {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let mock = MockProvider::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(CoreError::gateway().with_message("RESOURCE_EXHAUSTED: quota exceeded"))
        });
        let server = create_test_server_with_state(routes(), state_with(&mock))?;

        let response = server
            .post("/api/gemini")
            .json(&json!({ "image": BASE }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.json::<Value>();
        assert_eq!(body["name"], "gateway_error");
        assert!(
            body["message"]
                .as_str()
                .is_some_and(|m| m.contains("quota exceeded"))
        );
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        Ok(())
    }
}
