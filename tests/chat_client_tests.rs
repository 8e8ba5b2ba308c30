use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use oai_conformance_rs::client::{ChatMessage, ClientConfig, OpenAICompatibleClient};
use oai_conformance_rs::core::error::{build_http_status_transport_error, ApiError, TransportError};
use oai_conformance_rs::core::transport::{ByteStream, HttpTransport, TransportConfig};

#[derive(Clone, Default)]
struct TestTransport {
    response_json: Arc<Mutex<Value>>,
    http_error: Arc<Mutex<Option<(u16, String)>>>,
    stream_frames: Arc<Mutex<Vec<Bytes>>>,
    last_url: Arc<Mutex<Option<String>>>,
    last_body: Arc<Mutex<Option<Value>>>,
    last_headers: Arc<Mutex<Option<Vec<(String, String)>>>>,
}

impl TestTransport {
    fn new(response_json: Value) -> Self {
        let t = Self::default();
        *t.response_json.lock().unwrap() = response_json;
        t
    }

    fn with_http_error(status: u16, body: &str) -> Self {
        let t = Self::default();
        *t.http_error.lock().unwrap() = Some((status, body.to_string()));
        t
    }

    fn with_stream_frames(frames: &[&str]) -> Self {
        let t = Self::default();
        *t.stream_frames.lock().unwrap() =
            frames.iter().map(|f| Bytes::from(f.to_string())).collect();
        t
    }

    fn record(&self, url: &str, headers: &[(String, String)], body: Option<&Value>) {
        *self.last_url.lock().unwrap() = Some(url.to_string());
        *self.last_headers.lock().unwrap() = Some(headers.to_vec());
        *self.last_body.lock().unwrap() = body.cloned();
    }

    fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }

    fn last_header(&self, name: &str) -> Option<String> {
        self.last_headers
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|headers| {
                headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v.clone())
            })
    }

    fn take_error(&self) -> Option<TransportError> {
        self.http_error
            .lock()
            .unwrap()
            .as_ref()
            .map(|(status, body)| {
                build_http_status_transport_error(*status, body.clone(), None, Vec::new())
            })
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
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        _cfg: &TransportConfig,
    ) -> Result<Self::StreamResponse, TransportError> {
        self.record(url, headers, Some(body));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        let frames = std::mem::take(&mut *self.stream_frames.lock().unwrap());
        let s = stream::iter(frames.into_iter().map(Ok));
        Ok((Box::pin(s), Vec::new()))
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        _cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        self.record(url, headers, Some(body));
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        Ok((self.response_json.lock().unwrap().clone(), Vec::new()))
    }

    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        _cfg: &TransportConfig,
    ) -> Result<(Value, Vec<(String, String)>), TransportError> {
        self.record(url, headers, None);
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        Ok((self.response_json.lock().unwrap().clone(), Vec::new()))
    }
}

fn build_client(transport: TestTransport) -> OpenAICompatibleClient<TestTransport> {
    let cfg = ClientConfig::new("http://localhost:18099", "mock-api-key");
    OpenAICompatibleClient::with_transport(cfg, transport).expect("client")
}

#[tokio::test]
async fn chat_completion_parses_role_and_content() {
    let transport = TestTransport::new(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Hello there!"},
            "finish_reason": "stop"
        }]
    }));
    let client = build_client(transport.clone());

    let response = client
        .chat_completion("gpt-4", &[ChatMessage::user("Hello!")])
        .await
        .expect("chat response");

    let choice = &response.choices[0];
    assert_eq!(choice.message.role, "assistant");
    assert_eq!(choice.message.content.as_deref(), Some("Hello there!"));
    assert_eq!(choice.finish_reason.as_deref(), Some("stop"));

    assert_eq!(
        transport.last_body().unwrap(),
        json!({
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "Hello!"}]
        })
    );
    assert_eq!(
        transport.last_header("authorization").as_deref(),
        Some("Bearer mock-api-key")
    );
}

#[tokio::test]
async fn chat_stream_concatenates_deltas_until_done() {
    let transport = TestTransport::with_stream_frames(&[
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        // one SSE event torn across two transport chunks
        "data: {\"choices\":[{\"delta\":",
        "{\"content\":\"lo wor\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"ld!\"},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
    ]);
    let client = build_client(transport.clone());

    let mut stream = client
        .chat_completion_stream("gpt-4", &[ChatMessage::user("Say hello")])
        .await
        .expect("stream");

    let mut chunks = 0usize;
    let mut collected = String::new();
    let mut finish_reason = None;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.expect("chunk");
        chunks += 1;
        if let Some(fragment) = chunk.content {
            collected.push_str(&fragment);
        }
        if chunk.finish_reason.is_some() {
            finish_reason = chunk.finish_reason;
        }
    }

    assert_eq!(chunks, 3);
    assert_eq!(collected, "Hello world!");
    assert_eq!(finish_reason.as_deref(), Some("stop"));
    assert_eq!(transport.last_body().unwrap()["stream"], json!(true));
}

#[tokio::test]
async fn chat_stream_flushes_final_event_without_trailing_blank_line() {
    let transport = TestTransport::with_stream_frames(&[
        "data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}",
    ]);
    let client = build_client(transport);

    let mut stream = client
        .chat_completion_stream("gpt-4", &[ChatMessage::user("Say hello")])
        .await
        .expect("stream");

    let chunk = stream
        .next()
        .await
        .expect("one chunk")
        .expect("chunk parses");
    assert_eq!(chunk.content.as_deref(), Some("hi"));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn chat_stream_surfaces_invalid_chunks_as_errors() {
    let transport = TestTransport::with_stream_frames(&["data: {not json}\n\n"]);
    let client = build_client(transport);

    let mut stream = client
        .chat_completion_stream("gpt-4", &[ChatMessage::user("Say hello")])
        .await
        .expect("stream");

    match stream.next().await {
        Some(Err(ApiError::Serde(_))) => {}
        other => panic!("expected serde error, got {other:?}"),
    }
}

#[tokio::test]
async fn structured_error_body_maps_to_upstream_message() {
    let transport = TestTransport::with_http_error(
        400,
        r#"{"error":{"message":"messages must not be empty","type":"invalid_request_error","code":"invalid_request_error"}}"#,
    );
    let client = build_client(transport);

    let err = client
        .chat_completion("gpt-4", &[])
        .await
        .expect_err("must fail");
    match &err {
        ApiError::Upstream {
            status, message, ..
        } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "messages must not be empty");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_client_error());
}
