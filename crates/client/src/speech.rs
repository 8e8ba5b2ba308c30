use bytes::Bytes;
use serde_json::json;

use crate::api_client::client::OpenAICompatibleClient;
use crate::api_client::error::map_transport_error_to_api_error;
use crate::harness_core::error::ApiError;
use crate::harness_core::transport::HttpTransport;

impl<T: HttpTransport> OpenAICompatibleClient<T> {
    /// `POST /audio/speech`; unlike the JSON endpoints the success body is
    /// the raw audio payload.
    pub async fn speech(&self, model: &str, voice: &str, input: &str) -> Result<Bytes, ApiError> {
        let body = json!({
            "model": model,
            "voice": voice,
            "input": input,
        });
        let url = self.request_url("/audio/speech");
        let (bytes, _res_headers) = self
            .http()
            .post_json_bytes(&url, self.request_headers(), &body, self.transport_cfg())
            .await
            .map_err(map_transport_error_to_api_error)?;
        Ok(bytes)
    }
}
