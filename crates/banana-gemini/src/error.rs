//! Internal error types for banana-gemini.

use thiserror::Error;

/// Result type alias for banana-gemini operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for banana-gemini operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Response body was not JSON.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The endpoint URL could not be built.
    #[error("Invalid endpoint: {0}")]
    Url(#[from] url::ParseError),
}

impl From<Error> for banana_core::Error {
    fn from(err: Error) -> Self {
        match err {
            // The request URL carries the API key, so it never reaches a message.
            Error::Reqwest(e) => {
                let e = e.without_url();
                if e.is_timeout() {
                    banana_core::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    banana_core::Error::network_error()
                        .with_message("Connection to the model gateway failed")
                        .with_source(e)
                } else {
                    banana_core::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => banana_core::Error::serialization()
                .with_message(format!("Model gateway returned malformed JSON: {e}"))
                .with_source(e),
            Error::Url(e) => banana_core::Error::configuration()
                .with_message(format!("Invalid model gateway URL: {e}"))
                .with_source(e),
        }
    }
}
