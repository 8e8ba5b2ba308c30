use serde::Deserialize;

use crate::api_client::client::OpenAICompatibleClient;
use crate::api_client::error::map_transport_error_to_api_error;
use crate::harness_core::error::ApiError;
use crate::harness_core::transport::HttpTransport;

/// `GET /models` envelope: `{"object": "list", "data": [...]}`.
#[derive(Debug, Deserialize)]
pub struct ModelsPage {
    pub data: Vec<Model>,
}

#[derive(Debug, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub owned_by: Option<String>,
}

impl ModelsPage {
    pub fn contains(&self, id: &str) -> bool {
        self.data.iter().any(|m| m.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.data.iter().map(|m| m.id.as_str()).collect()
    }
}

impl<T: HttpTransport> OpenAICompatibleClient<T> {
    pub async fn list_models(&self) -> Result<ModelsPage, ApiError> {
        let url = self.request_url("/models");
        let (json, _res_headers) = self
            .http()
            .get_json(&url, self.request_headers(), self.transport_cfg())
            .await
            .map_err(map_transport_error_to_api_error)?;
        serde_json::from_value(json).map_err(ApiError::Serde)
    }
}
