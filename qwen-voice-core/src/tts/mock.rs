use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::provider::SpeechSynthesizer;
use super::types::SynthesisRequest;
use crate::error::{Result, VoiceReplyError};

/// Mock behavior for the mock synthesizer
#[derive(Debug, Clone)]
pub enum MockSynthesis {
    /// Answer with this download URL
    Url(String),
    /// Fail as if the response carried no audio URL
    NoAudio,
}

/// Mock synthesizer for testing
#[derive(Clone)]
pub struct MockSynthesizer {
    behavior: MockSynthesis,
    call_count: Arc<Mutex<usize>>,
    captured_requests: Arc<Mutex<Vec<SynthesisRequest>>>,
}

impl MockSynthesizer {
    pub fn new(behavior: MockSynthesis) -> Self {
        Self {
            behavior,
            call_count: Arc::new(Mutex::new(0)),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn returning(url: impl Into<String>) -> Self {
        Self::new(MockSynthesis::Url(url.into()))
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn captured_requests(&self) -> Vec<SynthesisRequest> {
        self.captured_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String> {
        *self.call_count.lock().unwrap() += 1;
        self.captured_requests.lock().unwrap().push(request.clone());

        match &self.behavior {
            MockSynthesis::Url(url) => Ok(url.clone()),
            MockSynthesis::NoAudio => Err(VoiceReplyError::synthesis(
                "no audio URL in response",
                r#"{"output":{}}"#,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice_tag::VoiceTag;

    #[tokio::test]
    async fn test_mock_synthesizer_counts_and_captures() {
        let synthesizer = MockSynthesizer::returning("https://example.com/audio.wav");
        let request = SynthesisRequest::new("hi", "model", "voice", VoiceTag::En);

        let url = synthesizer.synthesize(&request).await.unwrap();

        assert_eq!(url, "https://example.com/audio.wav");
        assert_eq!(synthesizer.get_call_count(), 1);
        assert_eq!(synthesizer.captured_requests(), vec![request]);
    }

    #[tokio::test]
    async fn test_mock_synthesizer_no_audio() {
        let synthesizer = MockSynthesizer::new(MockSynthesis::NoAudio);
        let request = SynthesisRequest::new("hi", "model", "voice", VoiceTag::En);

        let result = synthesizer.synthesize(&request).await;

        assert!(matches!(result, Err(VoiceReplyError::Synthesis { .. })));
    }
}
