use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Client-level error taxonomy shared by every endpoint call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized {
        #[source]
        source: Option<Box<TransportError>>,
    },
    #[error("rate limited")]
    RateLimited {
        /// Milliseconds suggested by Retry-After if present
        retry_after_ms: Option<u64>,
        #[source]
        source: Option<Box<TransportError>>,
    },
    #[error("upstream error (status {status}): {message}")]
    Upstream {
        status: u16,
        message: String,
        #[source]
        source: Option<Box<TransportError>>,
    },
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl ApiError {
    /// HTTP status carried by this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Upstream { status, .. } => Some(*status),
            ApiError::Transport(te) => te.status(),
            _ => None,
        }
    }

    /// True when the error reflects a 4xx response from the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http status {status}: {sanitized}")]
    HttpStatus {
        status: u16,
        /// upstream body (treated as sensitive; only log sanitized)
        body: String,
        /// Retry-After header (ms) if available
        retry_after_ms: Option<u64>,
        /// Sanitized message for display
        sanitized: String,
        /// Upstream response headers (lowercased keys where possible)
        headers: Vec<(String, String)>,
    },
    #[error("network: {0}")]
    Network(String),
    #[error("connect timeout after {0:?}")]
    ConnectTimeout(Duration),
    #[error("idle read timeout after {0:?}")]
    IdleReadTimeout(Duration),
    #[error("body read error: {0}")]
    BodyRead(String),
    #[error("other: {0}")]
    Other(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            TransportError::HttpStatus { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}

pub fn http_status_fallback_message(status: u16) -> String {
    format!("http status {status}")
}

pub fn build_http_status_transport_error(
    status: u16,
    body: String,
    retry_after_ms: Option<u64>,
    headers: Vec<(String, String)>,
) -> TransportError {
    TransportError::HttpStatus {
        status,
        body,
        retry_after_ms,
        sanitized: http_status_fallback_message(status),
        headers,
    }
}

/// Render an upstream body for display without leaking binary noise: JSON
/// bodies are minified, anything else is reduced to its size.
pub fn display_body_for_error(body: &str) -> String {
    let trimmed = body.trim();
    let looks_like_json = trimmed.starts_with('{') || trimmed.starts_with('[');
    if looks_like_json {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(v) => v.to_string(),
            Err(_) => format!("{} bytes", body.len()),
        }
    } else {
        format!("{} bytes", body.len())
    }
}
