use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON body of every error response.
///
/// Only `name`, `message` and `suggestion` reach the client; the status
/// code and internal context stay on the server side.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse<'a> {
    /// The error name/type identifier
    pub name: Cow<'a, str>,
    /// User-friendly error message safe for client display
    pub message: Cow<'a, str>,
    /// Helpful suggestion for resolving the error (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Cow<'a, str>>,

    /// Internal context for debugging (optional, not exposed to client)
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "Invalid request data.",
        StatusCode::BAD_REQUEST,
    );
    pub const METHOD_NOT_ALLOWED: Self = Self::new(
        "method_not_allowed",
        "Method not allowed.",
        StatusCode::METHOD_NOT_ALLOWED,
    );
    pub const NOT_FOUND: Self =
        Self::new("not_found", "Resource not found.", StatusCode::NOT_FOUND);
    pub const PAYLOAD_TOO_LARGE: Self = Self::new(
        "payload_too_large",
        "Payload too large.",
        StatusCode::PAYLOAD_TOO_LARGE,
    );

    // 5xx Server Errors
    pub const CONFIGURATION_ERROR: Self = Self {
        name: Cow::Borrowed("configuration_error"),
        message: Cow::Borrowed("Server is not configured."),
        suggestion: Some(Cow::Borrowed(
            "Set GEMINI_API_KEY and restart the server.",
        )),
        context: None,
        status: StatusCode::INTERNAL_SERVER_ERROR,
    };
    pub const GATEWAY_ERROR: Self = Self::new(
        "gateway_error",
        "Model request failed.",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "Internal server error.",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            suggestion: None,
            context: None,
            status,
        }
    }

    /// Appends the new message to the existing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        let new_message = message.into();
        if new_message.trim().is_empty() {
            return self;
        }

        let base = self.message.trim_end_matches('.');
        self.message = Cow::Owned(format!("{}. {}", base, new_message));
        self
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }

    /// Attaches a suggestion to the error response.
    /// If a suggestion already exists, it merges them with a separator.
    pub fn with_suggestion(mut self, suggestion: impl Into<Cow<'a, str>>) -> Self {
        let new_suggestion = suggestion.into();
        self.suggestion = Some(match self.suggestion {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_suggestion)),
            None => new_suggestion,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        tracing::warn!(
            status = %self.status,
            name = %self.name,
            message = %self.message,
            context = ?self.context,
            "HTTP error response"
        );
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_merging_message() {
        let response = ErrorResponse::BAD_REQUEST
            .with_message("Missing field `base`")
            .with_message("Expected a data URL string");

        assert_eq!(
            &response.message,
            "Invalid request data. Missing field `base`. Expected a data URL string"
        );
    }

    #[test]
    fn blank_message_is_ignored() {
        let response = ErrorResponse::GATEWAY_ERROR.with_message("  ");
        assert_eq!(&response.message, "Model request failed.");
    }

    #[test]
    fn error_response_merging_context() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("connection reset")
            .with_context("step 2");

        assert_eq!(
            response.context.as_deref(),
            Some("connection reset; step 2")
        );
    }

    #[test]
    fn error_response_serialization() -> anyhow::Result<()> {
        let response = ErrorResponse::CONFIGURATION_ERROR
            .with_message("GEMINI_API_KEY is not set")
            .with_context("startup");

        let json = serde_json::to_value(&response)?;

        assert_eq!(json["name"], "configuration_error");
        assert_eq!(
            json["message"],
            "Server is not configured. GEMINI_API_KEY is not set"
        );
        assert!(json["suggestion"].is_string());
        assert!(json.get("context").is_none());
        assert!(json.get("status").is_none());
        Ok(())
    }

    #[test]
    fn error_response_merging_suggestion() {
        let response = ErrorResponse::BAD_REQUEST
            .with_suggestion("Send a JSON object")
            .with_suggestion("Set `mode` to `pipeline`");

        assert_eq!(
            response.suggestion.as_deref(),
            Some("Send a JSON object; Set `mode` to `pipeline`")
        );
    }
}
