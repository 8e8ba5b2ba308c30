use async_stream::try_stream;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::pin::Pin;

use crate::api_client::chat::ChatMessage;
use crate::api_client::client::OpenAICompatibleClient;
use crate::api_client::error::map_transport_error_to_api_error;
use crate::harness_core::error::ApiError;
use crate::harness_core::transport::HttpTransport;
use crate::harness_sse::SseDecoder;

/// One streamed chat chunk: the content fragment of `choices[0].delta`, if
/// any, plus the finish reason once the server reports one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatChunk {
    pub content: Option<String>,
    pub finish_reason: Option<String>,
}

/// Lazy, finite, non-restartable chunk sequence; pulled to completion by the
/// streaming probe.
pub type ChatChunkStream = Pin<Box<dyn Stream<Item = Result<ChatChunk, ApiError>> + Send>>;

impl<T: HttpTransport> OpenAICompatibleClient<T> {
    pub async fn chat_completion_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatChunkStream, ApiError> {
        let body = json!({
            "model": model,
            "messages": messages,
            "stream": true,
        });
        let url = self.request_url("/chat/completions");
        let resp = self
            .http()
            .post_json_stream(&url, self.request_headers(), &body, self.transport_cfg())
            .await
            .map_err(map_transport_error_to_api_error)?;
        let (bytes_stream, _res_headers) = T::into_stream(resp);
        let mapped = bytes_stream.map(|res| res.map_err(map_transport_error_to_api_error));
        Ok(build_chunk_stream(mapped))
    }
}

#[derive(Debug, Default, Deserialize)]
struct WireChunk {
    #[serde(default)]
    choices: Vec<WireChunkChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct WireChunkChoice {
    #[serde(default)]
    delta: WireDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireDelta {
    #[serde(default)]
    content: Option<String>,
}

fn chunk_from_wire(mut wire: WireChunk) -> ChatChunk {
    let choice = if wire.choices.is_empty() {
        WireChunkChoice::default()
    } else {
        wire.choices.swap_remove(0)
    };
    ChatChunk {
        content: choice.delta.content,
        finish_reason: choice.finish_reason,
    }
}

/// Decode an SSE byte stream into chat chunks. The sequence ends at the
/// `data: [DONE]` sentinel or, failing that, at end of body; a flush pass
/// recovers a final event from servers that close without the trailing
/// blank line.
pub(crate) fn build_chunk_stream<S>(bytes_stream: S) -> ChatChunkStream
where
    S: Stream<Item = Result<Bytes, ApiError>> + Send + 'static,
{
    Box::pin(try_stream! {
        let mut decoder = SseDecoder::new();
        futures_util::pin_mut!(bytes_stream);
        while let Some(chunk_res) = bytes_stream.next().await {
            let bytes = chunk_res?;
            for ev in decoder.push(&bytes) {
                if ev.data.as_ref() == b"[DONE]" {
                    return;
                }
                let wire: WireChunk =
                    serde_json::from_slice(&ev.data).map_err(ApiError::Serde)?;
                yield chunk_from_wire(wire);
            }
        }
        for ev in decoder.finish() {
            if ev.data.as_ref() == b"[DONE]" {
                return;
            }
            let wire: WireChunk = serde_json::from_slice(&ev.data).map_err(ApiError::Serde)?;
            yield chunk_from_wire(wire);
        }
    })
}
