//! Middleware configuration for the HTTP server.
//!
//! All middleware configs are re-exported from `banana-server` and support
//! both CLI arguments and environment variables.
//!
//! # Example
//!
//! ```bash
//! banana --cors-origins "https://studio.example" --request-timeout 600
//! ```

use anyhow::{Result as AnyhowResult, anyhow};
use banana_server::middleware::{RecoveryConfig, SecurityConfig};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Upper bound for the whole-request timeout, in seconds.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 900;

/// Middleware configuration combining security and recovery settings.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS origins, preflight caching and the request body limit.
    #[clap(flatten)]
    pub security: SecurityConfig,

    /// Recovery middleware configuration.
    ///
    /// Controls the whole-request timeout.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Validates the request timeout and body limit.
    pub fn validate(&self) -> AnyhowResult<()> {
        let timeout = self.recovery.request_timeout;
        if timeout == 0 || timeout > MAX_REQUEST_TIMEOUT_SECS {
            return Err(anyhow!(
                "Request timeout {timeout} seconds is invalid. Must be between 1 and {MAX_REQUEST_TIMEOUT_SECS} seconds."
            ));
        }

        if self.security.max_body_size == 0 {
            return Err(anyhow!("Maximum body size must be greater than zero."));
        }

        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.security.cors.allowed_origins,
            max_age_secs = self.security.cors.max_age_seconds,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            max_body_size = self.security.max_body_size,
            request_timeout_secs = self.recovery.request_timeout,
            "Request limits"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MiddlewareConfig::default().validate().is_ok());
    }

    #[test]
    fn request_timeout_bounds() {
        let mut config = MiddlewareConfig::default();

        config.recovery = RecoveryConfig::with_timeout_secs(0);
        assert!(config.validate().is_err());

        config.recovery = RecoveryConfig::with_timeout_secs(901);
        assert!(config.validate().is_err());

        config.recovery = RecoveryConfig::with_timeout_secs(900);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        let mut config = MiddlewareConfig::default();
        config.security.max_body_size = 0;
        assert!(config.validate().is_err());
    }
}
