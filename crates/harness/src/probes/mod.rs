//! The endpoint probe set, declared in the order it executes and reports.

pub mod chat;
pub mod embeddings;
pub mod errors;
pub mod media;
pub mod models;

use crate::harness::config::HarnessConfig;
use crate::harness::probe::Probe;
use crate::harness_core::transport::HttpTransport;

/// Build the declared probe list. Declaration order here is execution order
/// is report order.
pub fn default_probes<T: HttpTransport + 'static>(cfg: &HarnessConfig) -> Vec<Box<dyn Probe<T>>> {
    vec![
        Box::new(models::ModelsListProbe::new(cfg)),
        Box::new(chat::ChatCompletionProbe::new(cfg)),
        Box::new(chat::ChatStreamingProbe::new(cfg)),
        Box::new(embeddings::EmbeddingsSingleProbe::new(cfg)),
        Box::new(embeddings::EmbeddingsBatchProbe::new(cfg)),
        Box::new(media::TextToSpeechProbe::new(cfg)),
        Box::new(media::ImageGenerationProbe::new(cfg)),
        Box::new(errors::ErrorHandlingProbe::new(cfg)),
    ]
}

/// Short response excerpt for result details.
pub(crate) fn excerpt(text: &str) -> String {
    const MAX: usize = 60;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(MAX).collect();
        cut.push_str("...");
        cut
    }
}
