use async_trait::async_trait;

use crate::api_client::OpenAICompatibleClient;
use crate::harness::config::HarnessConfig;
use crate::harness::probe::{ensure, Probe, ProbeError, ProbeResult};
use crate::harness_core::transport::HttpTransport;

const NAME: &str = "Models List";

/// `GET /models` must advertise a non-empty set containing both the
/// configured chat-capable and embedding-capable ids.
pub struct ModelsListProbe {
    chat_model: String,
    embedding_model: String,
}

impl ModelsListProbe {
    pub fn new(cfg: &HarnessConfig) -> Self {
        Self {
            chat_model: cfg.chat_model.clone(),
            embedding_model: cfg.embedding_model.clone(),
        }
    }
}

#[async_trait]
impl<T: HttpTransport> Probe<T> for ModelsListProbe {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn run(&self, client: &OpenAICompatibleClient<T>) -> Result<ProbeResult, ProbeError> {
        let page = client.list_models().await?;
        ensure(!page.data.is_empty(), || "model list is empty".into())?;
        ensure(page.contains(&self.chat_model), || {
            format!("chat model '{}' not advertised", self.chat_model)
        })?;
        ensure(page.contains(&self.embedding_model), || {
            format!("embedding model '{}' not advertised", self.embedding_model)
        })?;
        Ok(ProbeResult::pass(
            NAME,
            Some(format!("{} models advertised", page.data.len())),
        ))
    }
}
