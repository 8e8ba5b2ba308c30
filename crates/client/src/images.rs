use serde::Deserialize;
use serde_json::json;

use crate::api_client::client::OpenAICompatibleClient;
use crate::api_client::error::map_transport_error_to_api_error;
use crate::harness_core::error::ApiError;
use crate::harness_core::transport::HttpTransport;

#[derive(Debug, Deserialize)]
pub struct ImagesResponse {
    pub data: Vec<GeneratedImage>,
}

/// Servers answer with either a hosted `url` or an inline `b64_json` payload.
#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

impl GeneratedImage {
    pub fn has_reference(&self) -> bool {
        self.url.is_some() || self.b64_json.is_some()
    }

    /// Decode the inline payload, when that is what the server returned.
    pub fn decode_b64(&self) -> Result<Option<Vec<u8>>, ApiError> {
        use base64::engine::general_purpose::STANDARD as B64;
        use base64::Engine;
        match &self.b64_json {
            None => Ok(None),
            Some(b64) => B64
                .decode(b64.as_bytes())
                .map(Some)
                .map_err(|_| ApiError::InvalidArgument {
                    message: "image payload is not valid base64".into(),
                }),
        }
    }
}

impl<T: HttpTransport> OpenAICompatibleClient<T> {
    pub async fn generate_images(
        &self,
        model: &str,
        prompt: &str,
        n: u32,
        size: &str,
    ) -> Result<ImagesResponse, ApiError> {
        let body = json!({
            "model": model,
            "prompt": prompt,
            "n": n,
            "size": size,
        });
        let url = self.request_url("/images/generations");
        let (json, _res_headers) = self
            .http()
            .post_json(&url, self.request_headers(), &body, self.transport_cfg())
            .await
            .map_err(map_transport_error_to_api_error)?;
        serde_json::from_value(json).map_err(ApiError::Serde)
    }
}
