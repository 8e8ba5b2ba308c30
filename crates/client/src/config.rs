use crate::harness_core::error::ApiError;
use crate::harness_core::transport::TransportConfig;
use url::Url;

/// Explicit client configuration; the constructor owns validation so that a
/// malformed base URL is rejected before any request is attempted.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    /// Opaque bearer credential, sent on every request, never validated here.
    pub api_key: String,
    /// Additional headers merged over the defaults (lowercased keys win last).
    pub extra_headers: Vec<(String, String)>,
    /// Query parameters appended to every request URL (api-version style).
    pub query_params: Vec<(String, String)>,
    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            extra_headers: Vec::new(),
            query_params: Vec::new(),
            transport: TransportConfig::default(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidArgument {
                message: "client requires a non-empty base_url".into(),
            });
        }
        Url::parse(trimmed).map_err(|err| ApiError::InvalidArgument {
            message: format!("invalid base_url '{trimmed}': {err}"),
        })?;
        Ok(())
    }
}
