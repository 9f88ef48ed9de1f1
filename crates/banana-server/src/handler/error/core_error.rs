//! Conversion from [`banana_core::Error`] into HTTP errors.

use banana_core::ErrorKind as CoreErrorKind;

use super::http_error::{Error as HttpError, ErrorKind};

/// Tracing target for core error conversions.
const TRACING_TARGET: &str = "banana_server::handler::error";

impl From<banana_core::Error> for HttpError<'static> {
    fn from(error: banana_core::Error) -> Self {
        match error.kind {
            CoreErrorKind::InvalidInput => {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Invalid input");
            }
            CoreErrorKind::Configuration => {
                tracing::error!(target: TRACING_TARGET, error = %error, "Invalid gateway configuration");
            }
            CoreErrorKind::Gateway => {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Gateway call failed");
            }
            _ => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = ?error.kind,
                    "Pipeline operation failed"
                );
            }
        }

        let message = error.message().unwrap_or_default().to_owned();

        match error.kind {
            CoreErrorKind::InvalidInput => ErrorKind::BadRequest.with_message(message),
            CoreErrorKind::Configuration => ErrorKind::Configuration.with_message(message),
            CoreErrorKind::Gateway => ErrorKind::GatewayError.with_message(message),
            CoreErrorKind::Timeout => ErrorKind::InternalServerError
                .with_message("Model request timed out")
                .with_context(message),
            CoreErrorKind::NetworkError => ErrorKind::InternalServerError
                .with_message("Model request failed")
                .with_context(message),
            CoreErrorKind::Serialization => ErrorKind::InternalServerError
                .with_message("Model response could not be read")
                .with_context(message),
            CoreErrorKind::InternalError => {
                ErrorKind::InternalServerError.with_context(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn invalid_input_is_bad_request() {
        let error: HttpError = banana_core::Error::invalid_input()
            .with_message("invalid base64 payload")
            .into();

        assert_eq!(error.kind().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), Some("invalid base64 payload"));
    }

    #[test]
    fn gateway_error_keeps_upstream_text() {
        let error: HttpError = banana_core::Error::gateway()
            .with_message(r#"{"error":{"code":429,"message":"quota exceeded"}}"#)
            .into();

        assert_eq!(error.kind(), ErrorKind::GatewayError);
        assert!(error.message().is_some_and(|m| m.contains("quota exceeded")));
    }

    #[test]
    fn missing_key_is_configuration_error() {
        let error: HttpError = banana_core::Error::configuration()
            .with_message("GEMINI_API_KEY is not set")
            .into();

        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert_eq!(
            error.kind().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn transport_failures_hide_details() {
        let error: HttpError = banana_core::Error::network_error()
            .with_message("connection reset")
            .into();

        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.message(), Some("Model request failed"));
        assert_eq!(error.context(), Some("connection reset"));
    }
}
