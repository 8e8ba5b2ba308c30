use crate::core::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Overall request timeout (optional; if None, rely on connect + idle)
    pub request_timeout: Option<Duration>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Per-chunk idle read timeout
    pub idle_read_timeout: Duration,
    /// Whether to strip object fields with null values from JSON bodies before sending
    pub strip_null_fields: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            connect_timeout: Duration::from_secs(10),
            idle_read_timeout: Duration::from_secs(45),
            strip_null_fields: true,
        }
    }
}

/// Boxed byte stream returned by streaming requests.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Response for a successful streaming HTTP request.
    /// Contains the response headers and the byte stream body.
    type StreamResponse: Send;

    /// Extract the underlying byte stream from the transport-specific response wrapper.
    fn into_stream(resp: Self::StreamResponse) -> (ByteStream, Vec<(String, String)>);

    async fn post_json_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<Self::StreamResponse, TransportError>;

    /// Perform a JSON POST request and return the parsed JSON body along with response headers.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError>;

    /// Perform a GET request and return the parsed JSON body along with response headers.
    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError>;

    /// Perform a JSON POST request whose response body is raw bytes (audio and
    /// similar binary payloads) along with response headers.
    async fn post_json_bytes(
        &self,
        _url: &str,
        _headers: &[(String, String)],
        _body: &Value,
        _cfg: &TransportConfig,
    ) -> Result<(Bytes, Vec<(String, String)>), TransportError> {
        Err(TransportError::Other(
            "binary responses are not supported by this transport".into(),
        ))
    }
}
