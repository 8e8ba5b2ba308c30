use async_trait::async_trait;

use crate::api_client::OpenAICompatibleClient;
use crate::harness::config::HarnessConfig;
use crate::harness::probe::{Probe, ProbeError, ProbeResult};
use crate::harness_core::transport::HttpTransport;

const NAME: &str = "Error Handling";

/// Inverted-policy probe: a chat request with an empty message list MUST be
/// rejected. Any client-level error counts as rejection; a successful
/// response is the failure. The HTTP status, when one exists, lands in the
/// result detail so stricter classification stays auditable.
pub struct ErrorHandlingProbe {
    model: String,
}

impl ErrorHandlingProbe {
    pub fn new(cfg: &HarnessConfig) -> Self {
        Self {
            model: cfg.chat_model.clone(),
        }
    }
}

#[async_trait]
impl<T: HttpTransport> Probe<T> for ErrorHandlingProbe {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn run(&self, client: &OpenAICompatibleClient<T>) -> Result<ProbeResult, ProbeError> {
        match client.chat_completion(&self.model, &[]).await {
            Ok(_) => Err(ProbeError::Assertion(
                "empty-messages request was accepted; expected a rejection".into(),
            )),
            Err(err) => {
                let detail = match err.status() {
                    Some(status) => format!("rejected with http status {status}"),
                    None => format!("rejected with client-side error: {err}"),
                };
                Ok(ProbeResult::pass(NAME, Some(detail)))
            }
        }
    }
}
