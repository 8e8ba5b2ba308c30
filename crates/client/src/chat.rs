use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api_client::client::OpenAICompatibleClient;
use crate::api_client::error::map_transport_error_to_api_error;
use crate::harness_core::error::ApiError;
use crate::harness_core::transport::HttpTransport;

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }
}

/// Non-streaming `POST /chat/completions` response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub role: String,
    /// Null for tool-call turns on some servers, hence optional.
    #[serde(default)]
    pub content: Option<String>,
}

impl<T: HttpTransport> OpenAICompatibleClient<T> {
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatCompletion, ApiError> {
        let body = json!({
            "model": model,
            "messages": messages,
        });
        let url = self.request_url("/chat/completions");
        let (json, _res_headers) = self
            .http()
            .post_json(&url, self.request_headers(), &body, self.transport_cfg())
            .await
            .map_err(map_transport_error_to_api_error)?;
        serde_json::from_value(json).map_err(ApiError::Serde)
    }
}
