//! Application state and dependency injection.

mod config;

use banana_core::{ModelGateway, ModelRoles, Result};

pub use crate::service::config::ServiceConfig;
use crate::pipeline::Pipeline;

/// Tracing target for service setup.
const TRACING_TARGET: &str = "banana_server::service";

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pipeline: Option<Pipeline>,
    model_roles: ModelRoles,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// A missing API key leaves the state unconfigured instead of failing.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let model_roles = config.model_roles();
        let gateway = config.connect_gateway()?;

        tracing::info!(
            target: TRACING_TARGET,
            gateway_configured = gateway.is_some(),
            text_model = %model_roles.text_model,
            image_model = %model_roles.image_model,
            "Service state initialized"
        );

        Ok(Self {
            pipeline: gateway.map(|gateway| Pipeline::new(gateway, &model_roles)),
            model_roles,
        })
    }

    /// Creates a configured state around an existing gateway.
    pub fn with_gateway(gateway: ModelGateway, model_roles: ModelRoles) -> Self {
        Self {
            pipeline: Some(Pipeline::new(gateway, &model_roles)),
            model_roles,
        }
    }

    /// Returns whether blend requests can reach a gateway.
    pub fn is_configured(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Returns the resolved model roles.
    pub fn model_roles(&self) -> &ModelRoles {
        &self.model_roles
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pipeline: Option<Pipeline>);
