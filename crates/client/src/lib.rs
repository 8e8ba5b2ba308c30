//! Client surface for OpenAI-compatible inference APIs.
//!
//! One [`OpenAICompatibleClient`] is bound to a base URL and bearer
//! credential and exposes exactly the endpoint operations the conformance
//! probes exercise: model listing, chat completion (plain and streaming),
//! embeddings, text-to-speech and image generation.

pub mod chat;
mod client;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod images;
pub mod models;
pub mod speech;
mod stream;

pub use self::chat::{ChatCompletion, ChatMessage};
pub use self::client::OpenAICompatibleClient;
pub use self::config::ClientConfig;
pub use self::embeddings::{EmbeddingInput, EmbeddingResponse};
pub use self::error::map_transport_error_to_api_error;
pub use self::images::ImagesResponse;
pub use self::models::ModelsPage;
pub use self::stream::{ChatChunk, ChatChunkStream};
