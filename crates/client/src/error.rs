use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::harness_core::error::{
    build_http_status_transport_error, http_status_fallback_message, ApiError, TransportError,
};

/// Structured error body emitted by OpenAI-compatible servers:
/// `{"error": {"message", "type", "code", "param"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireErrorBody {
    pub error: WireError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireError {
    pub message: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub code: Option<JsonValue>,
    #[serde(default)]
    pub param: Option<JsonValue>,
}

/// Map a transport failure to the client taxonomy, pulling the human message
/// out of a structured error body when the server sent one.
pub fn map_transport_error_to_api_error(te: TransportError) -> ApiError {
    match te {
        TransportError::HttpStatus {
            status,
            body,
            retry_after_ms,
            headers,
            ..
        } => {
            let source = Some(Box::new(build_http_status_transport_error(
                status,
                body.clone(),
                retry_after_ms,
                headers,
            )));
            match status {
                401 => ApiError::Unauthorized { source },
                429 => ApiError::RateLimited {
                    retry_after_ms,
                    source,
                },
                _ => {
                    let message = serde_json::from_str::<WireErrorBody>(&body)
                        .map(|parsed| parsed.error.message)
                        .unwrap_or_else(|_| http_status_fallback_message(status));
                    ApiError::Upstream {
                        status,
                        message,
                        source,
                    }
                }
            }
        }
        other => ApiError::Transport(other),
    }
}
