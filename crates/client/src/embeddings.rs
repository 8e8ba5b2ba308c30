use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api_client::client::OpenAICompatibleClient;
use crate::api_client::error::map_transport_error_to_api_error;
use crate::harness_core::error::ApiError;
use crate::harness_core::transport::HttpTransport;

/// `input` accepts a single string or a batch; the wire shape mirrors that.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingInput {
    pub fn len(&self) -> usize {
        match self {
            EmbeddingInput::Single(_) => 1,
            EmbeddingInput::Batch(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for EmbeddingInput {
    fn from(value: &str) -> Self {
        EmbeddingInput::Single(value.to_string())
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(values: Vec<String>) -> Self {
        EmbeddingInput::Batch(values)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingResponse {
    pub data: Vec<Embedding>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Deserialize)]
pub struct Embedding {
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub index: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

impl<T: HttpTransport> OpenAICompatibleClient<T> {
    pub async fn embeddings(
        &self,
        model: &str,
        input: EmbeddingInput,
    ) -> Result<EmbeddingResponse, ApiError> {
        let body = json!({
            "model": model,
            "input": input,
            "encoding_format": "float",
        });
        let url = self.request_url("/embeddings");
        let (json, _res_headers) = self
            .http()
            .post_json(&url, self.request_headers(), &body, self.transport_cfg())
            .await
            .map_err(map_transport_error_to_api_error)?;
        serde_json::from_value(json).map_err(ApiError::Serde)
    }
}
