use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

/// Failures returned by the collaborator clients and the request boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("identity provider rejected {endpoint} ({status}): {message}")]
    IdentityProvider {
        endpoint: String,
        status: StatusCode,
        message: String,
        body: Value,
    },
    #[error("platform returned {status}: {message}")]
    Platform {
        status: StatusCode,
        message: String,
        body: Value,
    },
    #[error("graphql error: {}", first_message(.0))]
    Graphql(Vec<Value>),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Stable identifier used in the response envelope
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::IdentityProvider { .. } => "identity_provider",
            Self::Platform { .. } => "platform",
            Self::Graphql(_) => "graphql",
            Self::Transport(_) => "transport",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::IdentityProvider { status, .. } | Self::Platform { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}

fn first_message(errors: &[Value]) -> &str {
    errors
        .first()
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
}

/// Pick a human readable message out of a remote error payload.
///
/// Identity providers answer `{"error": ..., "error_description": ...}`, GraphQL servers
/// answer `{"errors": [{"message": ...}]}`, anything else falls back to the raw body.
pub(crate) fn remote_message(body: &Value) -> String {
    if let Some(description) = body.get("error_description").and_then(Value::as_str) {
        return description.to_string();
    }

    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return error.to_string();
    }

    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return message.to_string();
    }

    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        return first_message(errors).to_string();
    }

    match body {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// One entry of the envelope's `errors` array.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&Error> for ErrorDetail {
    fn from(error: &Error) -> Self {
        let details = match error {
            Error::IdentityProvider { body, .. } | Error::Platform { body, .. } => {
                (!body.is_null()).then(|| body.clone())
            }
            Error::Graphql(errors) => Some(Value::Array(errors.clone())),
            _ => None,
        };

        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            status: error.status().map(|status| status.as_u16()),
            details,
        }
    }
}

impl From<Error> for ErrorDetail {
    fn from(error: Error) -> Self {
        Self::from(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn remote_message_prefers_error_description() {
        let body = json!({"error": "invalid_grant", "error_description": "Wrong email or verification code."});
        assert_eq!(remote_message(&body), "Wrong email or verification code.");
    }

    #[test]
    fn remote_message_falls_back_to_error() {
        let body = json!({"error": "bad.connection"});
        assert_eq!(remote_message(&body), "bad.connection");
    }

    #[test]
    fn remote_message_reads_graphql_errors() {
        let body = json!({"errors": [{"message": "Permission denied"}]});
        assert_eq!(remote_message(&body), "Permission denied");
    }

    #[test]
    fn remote_message_raw_body() {
        assert_eq!(remote_message(&json!("Bad Gateway")), "Bad Gateway");
        assert_eq!(remote_message(&Value::Null), "");
    }

    #[test]
    fn detail_carries_provider_body_verbatim() {
        let body = json!({"error": "invalid_grant", "error_description": "Wrong email or verification code."});
        let error = Error::IdentityProvider {
            endpoint: "/oauth/token".to_string(),
            status: StatusCode::FORBIDDEN,
            message: remote_message(&body),
            body: body.clone(),
        };

        let detail = ErrorDetail::from(&error);
        assert_eq!(detail.code, "identity_provider");
        assert_eq!(detail.status, Some(403));
        assert_eq!(detail.details, Some(body));
        assert!(detail.message.contains("Wrong email or verification code."));
    }

    #[test]
    fn detail_for_graphql_errors() {
        let errors = vec![json!({"message": "Unique constraint violated", "code": "ValidationError"})];
        let detail = ErrorDetail::from(Error::Graphql(errors.clone()));
        assert_eq!(detail.code, "graphql");
        assert_eq!(detail.status, None);
        assert_eq!(detail.message, "graphql error: Unique constraint violated");
        assert_eq!(detail.details, Some(Value::Array(errors)));
    }

    #[test]
    fn detail_skips_empty_fields_on_the_wire() -> Result<(), serde_json::Error> {
        let detail = ErrorDetail::from(Error::InvalidRequest("missing field `email`".to_string()));
        let value = serde_json::to_value(&detail)?;
        assert_eq!(
            value,
            json!({"code": "invalid_request", "message": "invalid request: missing field `email`"})
        );
        Ok(())
    }
}
