use async_trait::async_trait;
use futures_util::StreamExt;

use crate::api_client::{ChatMessage, OpenAICompatibleClient};
use crate::harness::config::HarnessConfig;
use crate::harness::probe::{ensure, Probe, ProbeError, ProbeResult};
use crate::harness::probes::excerpt;
use crate::harness_core::transport::HttpTransport;

const COMPLETION_NAME: &str = "Chat Completion";
const STREAMING_NAME: &str = "Chat Streaming";

/// Non-streaming chat turn: the answer must come back in the assistant role
/// with non-empty content.
pub struct ChatCompletionProbe {
    model: String,
}

impl ChatCompletionProbe {
    pub fn new(cfg: &HarnessConfig) -> Self {
        Self {
            model: cfg.chat_model.clone(),
        }
    }
}

#[async_trait]
impl<T: HttpTransport> Probe<T> for ChatCompletionProbe {
    fn name(&self) -> &'static str {
        COMPLETION_NAME
    }

    async fn run(&self, client: &OpenAICompatibleClient<T>) -> Result<ProbeResult, ProbeError> {
        let response = client
            .chat_completion(&self.model, &[ChatMessage::user("Hello!")])
            .await?;
        let choice = response
            .choices
            .first()
            .ok_or_else(|| ProbeError::Assertion("response carried no choices".into()))?;
        ensure(choice.message.role == "assistant", || {
            format!("expected assistant role, got '{}'", choice.message.role)
        })?;
        let content = choice.message.content.as_deref().unwrap_or("");
        ensure(!content.is_empty(), || "assistant content is empty".into())?;
        Ok(ProbeResult::pass(COMPLETION_NAME, Some(excerpt(content))))
    }
}

/// Streaming chat turn: the chunk sequence must yield at least one chunk and
/// the concatenated delta fragments must be non-empty.
pub struct ChatStreamingProbe {
    model: String,
}

impl ChatStreamingProbe {
    pub fn new(cfg: &HarnessConfig) -> Self {
        Self {
            model: cfg.chat_model.clone(),
        }
    }
}

#[async_trait]
impl<T: HttpTransport> Probe<T> for ChatStreamingProbe {
    fn name(&self) -> &'static str {
        STREAMING_NAME
    }

    async fn run(&self, client: &OpenAICompatibleClient<T>) -> Result<ProbeResult, ProbeError> {
        let mut stream = client
            .chat_completion_stream(&self.model, &[ChatMessage::user("Say hello")])
            .await?;

        let mut chunk_count = 0usize;
        let mut collected = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            chunk_count += 1;
            if let Some(fragment) = chunk.content {
                collected.push_str(&fragment);
            }
        }

        ensure(chunk_count >= 1, || "stream yielded no chunks".into())?;
        ensure(!collected.is_empty(), || {
            "no content received across the stream".into()
        })?;
        Ok(ProbeResult::pass(
            STREAMING_NAME,
            Some(format!("{chunk_count} chunks, text: {}", excerpt(&collected))),
        ))
    }
}
