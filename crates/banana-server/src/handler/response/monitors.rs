//! Monitor response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Overall server status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// Ready to serve blend requests.
    Healthy,
    /// Running, but every blend request will fail until configured.
    Degraded,
}

/// Health check response.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Timestamp when this status was generated.
    pub checked_at: Timestamp,
    /// Overall server status.
    pub status: ServiceStatus,
    /// Whether a gateway client could be built at startup.
    pub gateway_configured: bool,
    /// Model used to describe images.
    pub text_model: String,
    /// Model used to blend images.
    pub image_model: String,
    /// Application version.
    pub version: String,
}
