use std::env;
use std::path::PathBuf;

use crate::api_client::ClientConfig;

/// Harness-level configuration: where the server-under-test lives and which
/// model ids the probes should exercise. Everything has a fixed default and
/// an environment override, so the binary runs with no required arguments.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    pub base_url: String,
    pub api_key: String,
    /// Chat-capable model id expected in the advertised model list.
    pub chat_model: String,
    /// Embedding-capable model id expected in the advertised model list.
    pub embedding_model: String,
    pub speech_model: String,
    pub speech_voice: String,
    pub image_model: String,
    pub image_size: String,
    /// Where the speech probe drops its audio sample for manual inspection.
    pub scratch_dir: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:18099".into(),
            api_key: "mock-api-key".into(),
            chat_model: "gpt-4".into(),
            embedding_model: "text-embedding-ada-002".into(),
            speech_model: "tts-1".into(),
            speech_voice: "alloy".into(),
            image_model: "dall-e-3".into(),
            image_size: "1024x1024".into(),
            scratch_dir: env::temp_dir(),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

impl HarnessConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_or("OAI_CONFORMANCE_BASE_URL", defaults.base_url),
            api_key: env_or("OAI_CONFORMANCE_API_KEY", defaults.api_key),
            chat_model: env_or("OAI_CONFORMANCE_CHAT_MODEL", defaults.chat_model),
            embedding_model: env_or("OAI_CONFORMANCE_EMBEDDING_MODEL", defaults.embedding_model),
            speech_model: env_or("OAI_CONFORMANCE_SPEECH_MODEL", defaults.speech_model),
            speech_voice: env_or("OAI_CONFORMANCE_SPEECH_VOICE", defaults.speech_voice),
            image_model: env_or("OAI_CONFORMANCE_IMAGE_MODEL", defaults.image_model),
            image_size: env_or("OAI_CONFORMANCE_IMAGE_SIZE", defaults.image_size),
            scratch_dir: env::var("OAI_CONFORMANCE_SCRATCH_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone(), self.api_key.clone())
    }
}
