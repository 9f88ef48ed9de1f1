//! Middleware for `axum::Router` and HTTP request processing.
//!
//! Each concern is an extension trait on [`Router`], applied innermost to
//! outermost:
//!
//! ```rust,no_run
//! use axum::Router;
//! use banana_server::middleware::{
//!     RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//!     SecurityConfig, SecurityHeadersConfig,
//! };
//!
//! let app: Router = Router::new()
//!     .with_security(&SecurityConfig::default(), &SecurityHeadersConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```
//!
//! [`Router`]: axum::Router

mod observability;
mod recovery;
mod security;

pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, DEFAULT_MAX_BODY_SIZE, FrameOptions, ReferrerPolicy, RouterSecurityExt,
    SecurityConfig, SecurityHeadersConfig,
};
