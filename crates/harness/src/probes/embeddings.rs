use async_trait::async_trait;

use crate::api_client::{EmbeddingInput, OpenAICompatibleClient};
use crate::harness::config::HarnessConfig;
use crate::harness::probe::{ensure, Probe, ProbeError, ProbeResult};
use crate::harness_core::transport::HttpTransport;

const SINGLE_NAME: &str = "Embeddings";
const BATCH_NAME: &str = "Embeddings Batch";

const BATCH_INPUTS: [&str; 3] = ["Hello", "World", "Test"];

/// Single-input embedding: the returned vector must be non-empty.
pub struct EmbeddingsSingleProbe {
    model: String,
}

impl EmbeddingsSingleProbe {
    pub fn new(cfg: &HarnessConfig) -> Self {
        Self {
            model: cfg.embedding_model.clone(),
        }
    }
}

#[async_trait]
impl<T: HttpTransport> Probe<T> for EmbeddingsSingleProbe {
    fn name(&self) -> &'static str {
        SINGLE_NAME
    }

    async fn run(&self, client: &OpenAICompatibleClient<T>) -> Result<ProbeResult, ProbeError> {
        let response = client
            .embeddings(&self.model, EmbeddingInput::from("Hello world"))
            .await?;
        let first = response
            .data
            .first()
            .ok_or_else(|| ProbeError::Assertion("no embedding returned".into()))?;
        ensure(!first.embedding.is_empty(), || "empty embedding vector".into())?;
        Ok(ProbeResult::pass(
            SINGLE_NAME,
            Some(format!("{} dimensions", first.embedding.len())),
        ))
    }
}

/// Batch embedding: N inputs must come back as exactly N vectors, in input
/// order.
pub struct EmbeddingsBatchProbe {
    model: String,
}

impl EmbeddingsBatchProbe {
    pub fn new(cfg: &HarnessConfig) -> Self {
        Self {
            model: cfg.embedding_model.clone(),
        }
    }
}

#[async_trait]
impl<T: HttpTransport> Probe<T> for EmbeddingsBatchProbe {
    fn name(&self) -> &'static str {
        BATCH_NAME
    }

    async fn run(&self, client: &OpenAICompatibleClient<T>) -> Result<ProbeResult, ProbeError> {
        let inputs: Vec<String> = BATCH_INPUTS.iter().map(|s| s.to_string()).collect();
        let expected = inputs.len();
        let response = client
            .embeddings(&self.model, EmbeddingInput::from(inputs))
            .await?;
        ensure(response.data.len() == expected, || {
            format!("expected {expected} embeddings, got {}", response.data.len())
        })?;
        // Servers that report indices must report them in input order.
        for (position, item) in response.data.iter().enumerate() {
            if let Some(index) = item.index {
                ensure(index as usize == position, || {
                    format!("embedding at position {position} reports index {index}")
                })?;
            }
        }
        Ok(ProbeResult::pass(
            BATCH_NAME,
            Some(format!("{expected} embeddings returned")),
        ))
    }
}
