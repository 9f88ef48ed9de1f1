#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
pub mod gateway;
mod image;
pub mod prompt;
pub mod response;
mod roles;

pub use error::{BoxedError, Error, ErrorKind, Result};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use gateway::{MockCall, MockProvider};
pub use gateway::{GatewayProvider, ModelGateway};
pub use image::{DEFAULT_MIME_TYPE, EncodedImage};
pub use prompt::{ContentPart, GenerationConfig, ModelPrompt, ResponseModality};
pub use response::{ModelResponse, ResponsePart};
pub use roles::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, ModelRoles};
