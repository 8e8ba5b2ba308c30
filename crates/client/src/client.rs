use std::collections::BTreeMap;

use crate::api_client::config::ClientConfig;
use crate::harness_core::error::ApiError;
use crate::harness_core::transport::{HttpTransport, TransportConfig};
use crate::reqwest_transport::ReqwestTransport;

/// Shared, read-only client handed to every probe. Generic over the
/// transport so the whole endpoint surface can be exercised in-memory.
pub struct OpenAICompatibleClient<T: HttpTransport = ReqwestTransport> {
    cfg: ClientConfig,
    headers: Vec<(String, String)>,
    http: T,
}

impl OpenAICompatibleClient<ReqwestTransport> {
    /// Construct a client over the production transport.
    ///
    /// This is the only fatal failure point of a harness run: a malformed
    /// base URL or an unusable TLS/client build aborts before any probe.
    pub fn new(cfg: ClientConfig) -> Result<Self, ApiError> {
        cfg.validate()?;
        let http = ReqwestTransport::try_new(&cfg.transport).map_err(ApiError::Transport)?;
        Ok(Self::assemble(cfg, http))
    }
}

impl<T: HttpTransport> OpenAICompatibleClient<T> {
    /// Construct a client over a caller-supplied transport (tests).
    pub fn with_transport(cfg: ClientConfig, http: T) -> Result<Self, ApiError> {
        cfg.validate()?;
        Ok(Self::assemble(cfg, http))
    }

    fn assemble(cfg: ClientConfig, http: T) -> Self {
        let headers = build_default_headers(&cfg);
        Self { cfg, headers, http }
    }

    pub fn base_url(&self) -> &str {
        &self.cfg.base_url
    }

    pub(crate) fn request_url(&self, path: &str) -> String {
        let base = self.cfg.base_url.trim_end_matches('/');
        let mut url = format!("{base}{path}");
        if !self.cfg.query_params.is_empty() {
            let qp = self
                .cfg
                .query_params
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&qp);
        }
        url
    }

    pub(crate) fn request_headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub(crate) fn http(&self) -> &T {
        &self.http
    }

    pub(crate) fn transport_cfg(&self) -> &TransportConfig {
        &self.cfg.transport
    }
}

fn build_default_headers(cfg: &ClientConfig) -> Vec<(String, String)> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    headers.insert("content-type".into(), "application/json".into());
    headers.insert("accept".into(), "application/json".into());
    headers.insert("authorization".into(), bearer_value(&cfg.api_key));
    headers.insert(
        "user-agent".into(),
        format!("oai-conformance-rs/{}", env!("CARGO_PKG_VERSION")),
    );
    for (k, v) in &cfg.extra_headers {
        let kl = k.to_ascii_lowercase();
        if kl == "authorization" {
            continue;
        }
        headers.insert(kl, v.clone());
    }
    headers.into_iter().collect()
}

fn bearer_value(api_key: &str) -> String {
    if api_key.to_lowercase().starts_with("bearer ") {
        api_key.to_string()
    } else {
        format!("Bearer {api_key}")
    }
}
