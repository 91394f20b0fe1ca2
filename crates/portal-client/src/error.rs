//! Client errors and error-banner message extraction.

use serde_json::Value;
use unionportal_common::PortalError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-success status; `message` is what the user should see.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ClientError> for PortalError {
    fn from(err: ClientError) -> Self {
        PortalError::api(err.to_string())
    }
}

/// Message to display for a failed response.
///
/// Looks at `message`, then `error` (string or `{message}`), then `detail`,
/// then the first entry of `errors` (`{msg}` or a string). Anything else,
/// including a body that is not JSON, yields `Request failed with status N`.
pub fn error_message_from_body(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| extract_message(&value))
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

fn extract_message(body: &Value) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(message) = body.get("message").and_then(non_empty) {
        return Some(message);
    }

    if let Some(error) = body.get("error") {
        if let Some(message) = non_empty(error) {
            return Some(message);
        }
        if let Some(message) = error.get("message").and_then(non_empty) {
            return Some(message);
        }
    }

    if let Some(detail) = body.get("detail").and_then(non_empty) {
        return Some(detail);
    }

    let first = body.get("errors")?.as_array()?.first()?;
    non_empty(first).or_else(|| first.get("msg").and_then(non_empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field() {
        assert_eq!(
            error_message_from_body(400, r#"{"message":"Email already registered"}"#),
            "Email already registered"
        );
    }

    #[test]
    fn test_error_string_and_object() {
        assert_eq!(
            error_message_from_body(401, r#"{"error":"Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(
            error_message_from_body(422, r#"{"error":{"message":"Code expired","code":"E42"}}"#),
            "Code expired"
        );
    }

    #[test]
    fn test_detail_field() {
        assert_eq!(
            error_message_from_body(404, r#"{"detail":"Not found"}"#),
            "Not found"
        );
    }

    #[test]
    fn test_errors_array() {
        assert_eq!(
            error_message_from_body(
                422,
                r#"{"errors":[{"msg":"Password too short","param":"password"},{"msg":"x"}]}"#
            ),
            "Password too short"
        );
        assert_eq!(
            error_message_from_body(422, r#"{"errors":["Phone is required"]}"#),
            "Phone is required"
        );
    }

    #[test]
    fn test_precedence_and_blank_values() {
        assert_eq!(
            error_message_from_body(400, r#"{"message":"  ","error":"Bad code","detail":"d"}"#),
            "Bad code"
        );
    }

    #[test]
    fn test_fallback_message() {
        assert_eq!(
            error_message_from_body(500, "<html>Internal Server Error</html>"),
            "Request failed with status 500"
        );
        assert_eq!(
            error_message_from_body(503, r#"{"errors":[]}"#),
            "Request failed with status 503"
        );
        assert_eq!(error_message_from_body(502, ""), "Request failed with status 502");
    }

    #[test]
    fn test_into_portal_error() {
        let err: PortalError = ClientError::Http {
            status: 401,
            message: "Invalid credentials".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "API error: Invalid credentials");
    }
}
