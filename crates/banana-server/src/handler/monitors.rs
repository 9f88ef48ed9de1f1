//! Health check handler.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use jiff::Timestamp;

use super::response::{HealthStatus, ServiceStatus};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "banana_server::handler::monitors";

/// Reports liveness and the resolved model roles.
///
/// Always answers 200; a missing gateway shows up as `degraded`.
async fn health_status(State(state): State<ServiceState>) -> Json<HealthStatus> {
    let gateway_configured = state.is_configured();
    let status = if gateway_configured {
        ServiceStatus::Healthy
    } else {
        ServiceStatus::Degraded
    };

    tracing::debug!(
        target: TRACING_TARGET,
        gateway_configured,
        "Health status check requested"
    );

    let roles = state.model_roles();
    Json(HealthStatus {
        checked_at: Timestamp::now(),
        status,
        gateway_configured,
        text_model: roles.text_model.clone(),
        image_model: roles.image_model.clone(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use banana_core::{MockProvider, ModelRoles};

    use super::*;
    use crate::handler::test::{create_test_server_with_router, create_test_server_with_state};

    #[tokio::test]
    async fn unconfigured_server_is_degraded() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|_| routes())?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let status = response.json::<HealthStatus>();
        assert_eq!(status.status, ServiceStatus::Degraded);
        assert!(!status.gateway_configured);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        Ok(())
    }

    #[tokio::test]
    async fn configured_server_reports_roles() -> anyhow::Result<()> {
        let roles = ModelRoles::new("text-model", "image-model");
        let state =
            ServiceState::with_gateway(MockProvider::default().into_gateway(), roles.clone());
        let server = create_test_server_with_state(routes(), state)?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let status = response.json::<HealthStatus>();
        assert_eq!(status.status, ServiceStatus::Healthy);
        assert!(status.gateway_configured);
        assert_eq!(status.text_model, roles.text_model);
        assert_eq!(status.image_model, roles.image_model);

        let elapsed = Timestamp::now().duration_since(status.checked_at);
        assert!(elapsed.as_secs() < 60, "timestamp should be recent");
        Ok(())
    }
}
