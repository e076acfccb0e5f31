use async_trait::async_trait;

use super::types::SynthesisRequest;
use crate::error::Result;

/// Trait for text-to-speech backends that answer with a downloadable clip
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Submit the request once and return the URL the audio can be fetched from
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String>;
}
