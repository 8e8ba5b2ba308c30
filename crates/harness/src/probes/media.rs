use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::api_client::OpenAICompatibleClient;
use crate::harness::config::HarnessConfig;
use crate::harness::probe::{ensure, Probe, ProbeError, ProbeResult};
use crate::harness::probes::excerpt;
use crate::harness_core::transport::HttpTransport;

const SPEECH_NAME: &str = "Text-to-Speech";
const IMAGE_NAME: &str = "Image Generation";

const SPEECH_INPUT: &str = "Hello, this is a test.";
const IMAGE_PROMPT: &str = "A cute cat sitting on a table";

/// `POST /audio/speech` must return a non-empty binary payload. The payload
/// is dropped into the scratch directory for manual listening; a failed
/// write never fails the probe.
pub struct TextToSpeechProbe {
    model: String,
    voice: String,
    scratch_dir: PathBuf,
}

impl TextToSpeechProbe {
    pub fn new(cfg: &HarnessConfig) -> Self {
        Self {
            model: cfg.speech_model.clone(),
            voice: cfg.speech_voice.clone(),
            scratch_dir: cfg.scratch_dir.clone(),
        }
    }
}

#[async_trait]
impl<T: HttpTransport> Probe<T> for TextToSpeechProbe {
    fn name(&self) -> &'static str {
        SPEECH_NAME
    }

    async fn run(&self, client: &OpenAICompatibleClient<T>) -> Result<ProbeResult, ProbeError> {
        let audio = client
            .speech(&self.model, &self.voice, SPEECH_INPUT)
            .await?;
        ensure(!audio.is_empty(), || "no audio data received".into())?;

        let path = self.scratch_dir.join("oai-conformance-speech.mp3");
        match tokio::fs::write(&path, &audio).await {
            Ok(()) => info!(path = %path.display(), "speech sample written"),
            Err(err) => warn!(path = %path.display(), %err, "could not write speech sample"),
        }

        Ok(ProbeResult::pass(
            SPEECH_NAME,
            Some(format!("{} bytes of audio", audio.len())),
        ))
    }
}

/// `POST /images/generations` with n=1 must return an image reference:
/// either a hosted URL or an inline base64 payload.
pub struct ImageGenerationProbe {
    model: String,
    size: String,
}

impl ImageGenerationProbe {
    pub fn new(cfg: &HarnessConfig) -> Self {
        Self {
            model: cfg.image_model.clone(),
            size: cfg.image_size.clone(),
        }
    }
}

#[async_trait]
impl<T: HttpTransport> Probe<T> for ImageGenerationProbe {
    fn name(&self) -> &'static str {
        IMAGE_NAME
    }

    async fn run(&self, client: &OpenAICompatibleClient<T>) -> Result<ProbeResult, ProbeError> {
        let response = client
            .generate_images(&self.model, IMAGE_PROMPT, 1, &self.size)
            .await?;
        let image = response
            .data
            .first()
            .ok_or_else(|| ProbeError::Assertion("no image returned".into()))?;
        ensure(image.has_reference(), || {
            "image carries neither url nor b64_json".into()
        })?;

        let detail = match &image.url {
            Some(url) => format!("url: {}", excerpt(url)),
            None => {
                let bytes = image
                    .decode_b64()?
                    .ok_or_else(|| ProbeError::Assertion("image payload missing".into()))?;
                format!("inline image, {} bytes", bytes.len())
            }
        };
        Ok(ProbeResult::pass(IMAGE_NAME, Some(detail)))
    }
}
