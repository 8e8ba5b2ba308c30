use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::api_client::OpenAICompatibleClient;
use crate::harness_core::error::ApiError;
use crate::harness_core::transport::HttpTransport;

/// Outcome of one probe. Produced exactly once per declared probe per run,
/// normally by the probe itself and on any raised failure by the runner's
/// boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub name: String,
    pub passed: bool,
    /// Diagnostic message or truncated response excerpt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn pass(name: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail,
            error: None,
        }
    }

    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: None,
            error: Some(error.into()),
        }
    }
}

/// Failures a probe can raise; both are absorbed by the runner.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Structurally valid response violating an expected property.
    #[error("assertion failed: {0}")]
    Assertion(String),
    /// Transport or protocol failure underneath the endpoint call.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Fail the probe with an assertion detail unless `cond` holds.
pub fn ensure(cond: bool, detail: impl FnOnce() -> String) -> Result<(), ProbeError> {
    if cond {
        Ok(())
    } else {
        Err(ProbeError::Assertion(detail()))
    }
}

/// One self-contained conformance check against a single API capability.
///
/// Probes receive the shared client by injection, never mutate harness
/// state, and report through their return value only; scratch artifacts a
/// probe writes for manual inspection must not influence the outcome.
#[async_trait]
pub trait Probe<T: HttpTransport>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, client: &OpenAICompatibleClient<T>) -> Result<ProbeResult, ProbeError>;
}
