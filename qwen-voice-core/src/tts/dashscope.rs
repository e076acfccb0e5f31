//! DashScope (Qwen3-TTS) text-to-speech implementation

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::provider::SpeechSynthesizer;
use super::types::{resolve_audio_url, SynthesisPayload, SynthesisRequest};
use crate::error::{Result, VoiceReplyError};
use crate::settings::ClientConfig;

const GENERATION_PATH: &str = "/services/aigc/multimodal-generation/generation";

pub struct DashScope {
    config: ClientConfig,
    client: Client,
}

impl DashScope {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VoiceReplyError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    pub fn generation_url(&self) -> String {
        format!("{}{GENERATION_PATH}", self.config.base_url)
    }
}

#[async_trait]
impl SpeechSynthesizer for DashScope {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String> {
        let url = self.generation_url();
        let payload = SynthesisPayload::from_request(request);

        debug!(
            url = %url,
            model = %request.model,
            voice = %request.voice,
            language_type = payload.input.language_type,
            instructed = payload.input.instructions.is_some(),
            "Submitting synthesis request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                VoiceReplyError::synthesis(format!("request to {url} failed: {e}"), "<none>")
            })?;

        let status = response.status();
        let body_text = response.text().await.map_err(|e| {
            VoiceReplyError::synthesis(format!("failed to read response body: {e}"), "<none>")
        })?;

        if !status.is_success() {
            return Err(VoiceReplyError::synthesis(
                format!("DashScope API error {status}"),
                body_text,
            ));
        }

        let body: Value = serde_json::from_str(&body_text).map_err(|e| {
            VoiceReplyError::synthesis(format!("response is not JSON: {e}"), body_text.as_str())
        })?;

        let audio_url = resolve_audio_url(&body).ok_or_else(|| {
            VoiceReplyError::synthesis("no audio URL in response", body.to_string())
        })?;

        info!(request_id = ?body.get("request_id"), "Synthesis returned an audio URL");
        Ok(audio_url)
    }
}
