use crate::harness_core::error::{display_body_for_error, TransportError};
use crate::harness_core::json::without_null_fields;
use crate::harness_core::transport::{ByteStream, HttpTransport, TransportConfig};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::debug;

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    fn configure_builder(
        mut builder: reqwest::ClientBuilder,
        cfg: &TransportConfig,
    ) -> reqwest::ClientBuilder {
        builder = builder
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .pool_idle_timeout(Duration::from_secs(90));
        if let Some(req_timeout) = cfg.request_timeout {
            builder = builder.timeout(req_timeout);
        }
        builder.connect_timeout(cfg.connect_timeout)
    }

    fn try_new_with_builder(
        cfg: &TransportConfig,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, TransportError> {
        let builder = Self::configure_builder(builder, cfg);
        let client = builder.build().map_err(|err| {
            TransportError::Other(format!(
                "reqwest client build failed: {}",
                format_reqwest_error_chain(&err)
            ))
        })?;
        Ok(Self { client })
    }

    pub fn try_new(cfg: &TransportConfig) -> Result<Self, TransportError> {
        Self::try_new_with_builder(cfg, Client::builder())
    }

    pub fn new(cfg: &TransportConfig) -> Self {
        match Self::try_new_with_builder(cfg, Client::builder()) {
            Ok(transport) => transport,
            Err(err) => {
                debug!(
                    target: "oai_conformance::transport::reqwest",
                    error = %err,
                    "falling back to reqwest::Client::new after transport init failure"
                );
                Self {
                    client: Client::new(),
                }
            }
        }
    }

    fn apply_headers(mut req: RequestBuilder, headers: &[(String, String)]) -> RequestBuilder {
        for (k, v) in headers {
            // Skip Content-Type; .json() already sets it where it applies
            if !k.eq_ignore_ascii_case("content-type") {
                req = req.header(k, v);
            }
        }
        req
    }

    /// Send a prepared request and normalize every failure path: connection
    /// errors, timeouts, and non-2xx statuses (the latter with body,
    /// Retry-After and response headers captured).
    async fn send_checked(
        &self,
        req: RequestBuilder,
        method: &str,
        url: &str,
        cfg: &TransportConfig,
    ) -> Result<Response, TransportError> {
        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                let detail = format_reqwest_error_chain(&e);
                debug!(target: "oai_conformance::transport::reqwest", %method, %url, %detail, "reqwest send failed");
                return Err(if e.is_connect() {
                    TransportError::Network(format!("connect: {detail}"))
                } else if e.is_timeout() {
                    TransportError::ConnectTimeout(cfg.connect_timeout)
                } else {
                    TransportError::Network(detail)
                });
            }
        };

        let status = resp.status();
        debug!(
            target: "oai_conformance::transport::reqwest",
            %method,
            %url,
            status = status.as_u16(),
            "request completed"
        );
        if !status.is_success() {
            let retry_after_ms = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|h| h.to_str().ok())
                .and_then(parse_retry_after_ms);
            let res_headers = header_pairs(resp.headers());
            let body_text = resp.text().await.unwrap_or_default();
            let sanitized = display_body_for_error(&body_text);
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: body_text,
                retry_after_ms,
                sanitized,
                headers: res_headers,
            });
        }
        Ok(resp)
    }

    fn clean_body(body: &Value, cfg: &TransportConfig) -> Value {
        if cfg.strip_null_fields {
            without_null_fields(body)
        } else {
            body.clone()
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    type StreamResponse = (ByteStream, Vec<(String, String)>);

    fn into_stream(resp: Self::StreamResponse) -> (ByteStream, Vec<(String, String)>) {
        resp
    }

    async fn post_json_stream(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<Self::StreamResponse, TransportError> {
        let cleaned_body = Self::clean_body(body, cfg);
        let req = Self::apply_headers(self.client.post(url).json(&cleaned_body), headers);
        let resp = self.send_checked(req, "POST", url, cfg).await?;

        let res_headers = header_pairs(resp.headers());
        let mut inner = resp.bytes_stream();

        // Enforce the per-chunk idle timeout while relaying body bytes.
        let idle = cfg.idle_read_timeout;
        let s = async_stream::try_stream! {
            loop {
                let next = tokio::time::timeout(idle, inner.next()).await;
                match next {
                    Err(_) => Err(TransportError::IdleReadTimeout(idle))?,
                    Ok(None) => break,
                    Ok(Some(Err(e))) => {
                        if e.is_timeout() { Err(TransportError::IdleReadTimeout(idle))?; }
                        else { Err(TransportError::BodyRead(e.to_string()))?; }
                    }
                    Ok(Some(Ok(bytes))) => { yield bytes; }
                }
            }
        };
        Ok((Box::pin(s), res_headers))
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        let cleaned_body = Self::clean_body(body, cfg);
        let req = Self::apply_headers(self.client.post(url).json(&cleaned_body), headers);
        let resp = self.send_checked(req, "POST", url, cfg).await?;

        let res_headers = header_pairs(resp.headers());
        let text = resp
            .text()
            .await
            .map_err(|e| TransportError::BodyRead(e.to_string()))?;
        let json: Value = serde_json::from_str(&text)
            .map_err(|_| TransportError::BodyRead("invalid json".into()))?;
        Ok((json, res_headers))
    }

    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        let req = Self::apply_headers(self.client.get(url), headers);
        let resp = self.send_checked(req, "GET", url, cfg).await?;

        let res_headers = header_pairs(resp.headers());
        let text = resp
            .text()
            .await
            .map_err(|e| TransportError::BodyRead(e.to_string()))?;
        let json: Value = serde_json::from_str(&text)
            .map_err(|_| TransportError::BodyRead("invalid json".into()))?;
        Ok((json, res_headers))
    }

    async fn post_json_bytes(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        cfg: &TransportConfig,
    ) -> Result<(Bytes, Vec<(String, String)>), TransportError> {
        let cleaned_body = Self::clean_body(body, cfg);
        let req = Self::apply_headers(self.client.post(url).json(&cleaned_body), headers);
        let resp = self.send_checked(req, "POST", url, cfg).await?;

        let res_headers = header_pairs(resp.headers());
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TransportError::BodyRead(e.to_string()))?;
        Ok((bytes, res_headers))
    }
}

fn header_pairs(headers: &reqwest::header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
        .collect()
}

fn parse_retry_after_ms(s: &str) -> Option<u64> {
    // RFC 7231: either delta-seconds or HTTP date; support simple delta only
    if let Ok(secs) = s.trim().parse::<u64>() {
        return Some(secs * 1000);
    }
    None
}

fn format_reqwest_error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(src) = current {
        out.push_str(": ");
        out.push_str(&src.to_string());
        current = src.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_returns_transport_error_when_client_build_fails() {
        let cfg = TransportConfig::default();
        let err = match ReqwestTransport::try_new_with_builder(
            &cfg,
            Client::builder().user_agent("bad\nagent"),
        ) {
            Ok(_) => panic!("invalid user-agent should fail reqwest client build"),
            Err(err) => err,
        };
        match err {
            TransportError::Other(message) => {
                assert!(
                    message.contains("reqwest client build failed"),
                    "unexpected message: {message}"
                );
            }
            other => panic!("unexpected transport error variant: {other:?}"),
        }
    }

    #[test]
    fn retry_after_accepts_delta_seconds_only() {
        assert_eq!(parse_retry_after_ms("2"), Some(2000));
        assert_eq!(parse_retry_after_ms(" 10 "), Some(10_000));
        assert_eq!(parse_retry_after_ms("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }
}
