use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use oai_conformance_rs::client::{ClientConfig, OpenAICompatibleClient};
use oai_conformance_rs::core::error::{ApiError, TransportError};
use oai_conformance_rs::core::transport::{ByteStream, HttpTransport, TransportConfig};

#[derive(Clone)]
struct TestTransport {
    response_json: Arc<Mutex<Value>>,
    response_bytes: Arc<Mutex<Bytes>>,
    last_url: Arc<Mutex<Option<String>>>,
    last_body: Arc<Mutex<Option<Value>>>,
}

impl TestTransport {
    fn new(response_json: Value) -> Self {
        Self {
            response_json: Arc::new(Mutex::new(response_json)),
            response_bytes: Arc::new(Mutex::new(Bytes::new())),
            last_url: Arc::new(Mutex::new(None)),
            last_body: Arc::new(Mutex::new(None)),
        }
    }

    fn with_bytes(self, bytes: &'static [u8]) -> Self {
        *self.response_bytes.lock().unwrap() = Bytes::from_static(bytes);
        self
    }

    fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }

    fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for TestTransport {
    type StreamResponse = (ByteStream, Vec<(String, String)>);

    fn into_stream(resp: Self::StreamResponse) -> (ByteStream, Vec<(String, String)>) {
        resp
    }

    async fn post_json_stream(
        &self,
        _url: &str,
        _headers: &[(String, String)],
        _body: &Value,
        _cfg: &TransportConfig,
    ) -> Result<Self::StreamResponse, TransportError> {
        Err(TransportError::Other("not used".into()))
    }

    async fn post_json(
        &self,
        url: &str,
        _headers: &[(String, String)],
        body: &Value,
        _cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        *self.last_url.lock().unwrap() = Some(url.to_string());
        *self.last_body.lock().unwrap() = Some(body.clone());
        Ok((self.response_json.lock().unwrap().clone(), Vec::new()))
    }

    async fn get_json(
        &self,
        url: &str,
        _headers: &[(String, String)],
        _cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        *self.last_url.lock().unwrap() = Some(url.to_string());
        Ok((self.response_json.lock().unwrap().clone(), Vec::new()))
    }

    async fn post_json_bytes(
        &self,
        url: &str,
        _headers: &[(String, String)],
        body: &Value,
        _cfg: &TransportConfig,
    ) -> Result<(Bytes, Vec<(String, String)>), TransportError> {
        *self.last_url.lock().unwrap() = Some(url.to_string());
        *self.last_body.lock().unwrap() = Some(body.clone());
        Ok((self.response_bytes.lock().unwrap().clone(), Vec::new()))
    }
}

fn build_client(transport: TestTransport) -> OpenAICompatibleClient<TestTransport> {
    let cfg = ClientConfig::new("http://localhost:18099/v1", "mock-api-key");
    OpenAICompatibleClient::with_transport(cfg, transport).expect("client")
}

#[tokio::test]
async fn list_models_hits_the_models_path_and_parses_ids() {
    let transport = TestTransport::new(json!({
        "object": "list",
        "data": [
            {"id": "gpt-4", "object": "model", "created": 0, "owned_by": "mock"},
            {"id": "text-embedding-ada-002", "object": "model", "created": 0, "owned_by": "mock"}
        ]
    }));
    let client = build_client(transport.clone());

    let page = client.list_models().await.expect("models");
    assert_eq!(
        transport.last_url().as_deref(),
        Some("http://localhost:18099/v1/models")
    );
    assert_eq!(page.ids(), vec!["gpt-4", "text-embedding-ada-002"]);
    assert!(page.contains("gpt-4"));
    assert!(!page.contains("dall-e-3"));
}

#[tokio::test]
async fn speech_posts_voice_and_input_and_returns_raw_bytes() {
    let transport = TestTransport::new(Value::Null).with_bytes(b"ID3\x03audio");
    let client = build_client(transport.clone());

    let audio = client
        .speech("tts-1", "alloy", "Hello, this is a test.")
        .await
        .expect("speech");

    assert_eq!(audio.as_ref(), b"ID3\x03audio");
    assert_eq!(
        transport.last_url().as_deref(),
        Some("http://localhost:18099/v1/audio/speech")
    );
    assert_eq!(
        transport.last_body().unwrap(),
        json!({"model": "tts-1", "voice": "alloy", "input": "Hello, this is a test."})
    );
}

#[tokio::test]
async fn image_generation_accepts_url_references() {
    let transport = TestTransport::new(json!({
        "created": 0,
        "data": [{"url": "https://images.example/cat.png"}]
    }));
    let client = build_client(transport.clone());

    let response = client
        .generate_images("dall-e-3", "A cute cat sitting on a table", 1, "1024x1024")
        .await
        .expect("images");

    assert!(response.data[0].has_reference());
    assert_eq!(
        response.data[0].url.as_deref(),
        Some("https://images.example/cat.png")
    );
    assert_eq!(
        transport.last_body().unwrap(),
        json!({
            "model": "dall-e-3",
            "prompt": "A cute cat sitting on a table",
            "n": 1,
            "size": "1024x1024"
        })
    );
}

#[tokio::test]
async fn image_generation_accepts_inline_base64_payloads() {
    let transport = TestTransport::new(json!({
        "created": 0,
        "data": [{"b64_json": "aGVsbG8=", "revised_prompt": ""}]
    }));
    let client = build_client(transport);

    let response = client
        .generate_images("dall-e-3", "A cute cat sitting on a table", 1, "1024x1024")
        .await
        .expect("images");

    let image = &response.data[0];
    assert!(image.has_reference());
    assert!(image.url.is_none());
    let bytes = image.decode_b64().expect("valid base64").expect("payload");
    assert_eq!(bytes, b"hello");
}

#[tokio::test]
async fn invalid_base64_payload_is_an_error() {
    let transport = TestTransport::new(json!({
        "created": 0,
        "data": [{"b64_json": "%%% not base64 %%%"}]
    }));
    let client = build_client(transport);

    let response = client
        .generate_images("dall-e-3", "A cute cat sitting on a table", 1, "1024x1024")
        .await
        .expect("images");

    match response.data[0].decode_b64() {
        Err(ApiError::InvalidArgument { .. }) => {}
        other => panic!("expected invalid argument, got {other:?}"),
    }
}
