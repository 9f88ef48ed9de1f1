#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;
mod wire;

pub use crate::client::{GeminiClient, TRACING_TARGET};
pub use crate::config::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, GeminiConfig};
pub use crate::error::{Error, Result};
