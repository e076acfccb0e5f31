use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::voice_tag::VoiceTag;

/// Models whose identifier contains this marker accept free-text speaking
/// instructions.
const INSTRUCT_MARKER: &str = "instruct";

/// One synthesis job, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub model: String,
    pub voice: String,
    pub voice_tag: VoiceTag,
}

impl SynthesisRequest {
    pub fn new(
        text: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
        voice_tag: VoiceTag,
    ) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            voice: voice.into(),
            voice_tag,
        }
    }

    pub fn accepts_instructions(&self) -> bool {
        self.model.contains(INSTRUCT_MARKER)
    }

    /// Speaking instruction for instruct-capable models, `None` otherwise.
    pub fn instruction(&self) -> Option<&'static str> {
        self.accepts_instructions()
            .then_some(self.voice_tag.default_instruction())
    }
}

/// Body of a non-streaming multimodal-generation call.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisPayload<'a> {
    pub model: &'a str,
    pub input: SynthesisInput<'a>,
    pub parameters: SynthesisParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisInput<'a> {
    pub text: &'a str,
    pub voice: &'a str,
    pub language_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize_instructions: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisParameters {
    pub stream: bool,
}

impl<'a> SynthesisPayload<'a> {
    pub fn from_request(request: &'a SynthesisRequest) -> Self {
        let instructions = request.instruction();
        Self {
            model: &request.model,
            input: SynthesisInput {
                text: &request.text,
                voice: &request.voice,
                language_type: request.voice_tag.language_type(),
                instructions,
                optimize_instructions: instructions.map(|_| true),
            },
            parameters: SynthesisParameters { stream: false },
        }
    }
}

/// Anything that may carry the download URL of a synthesized clip.
pub trait AudioUrlSource {
    fn audio_url(&self) -> Option<&str>;
}

/// Typed view of a generation response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisResponse {
    pub request_id: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub output: Option<SynthesisOutput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisOutput {
    pub audio: Option<AudioInfo>,
    pub audio_url: Option<String>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioInfo {
    pub id: Option<String>,
    pub url: Option<String>,
}

fn non_empty(url: Option<&str>) -> Option<&str> {
    url.filter(|url| !url.trim().is_empty())
}

impl AudioUrlSource for SynthesisResponse {
    fn audio_url(&self) -> Option<&str> {
        let output = self.output.as_ref()?;
        non_empty(output.audio.as_ref().and_then(|audio| audio.url.as_deref()))
            .or_else(|| non_empty(output.audio_url.as_deref()))
    }
}

impl AudioUrlSource for Value {
    fn audio_url(&self) -> Option<&str> {
        let output = self.get("output")?;
        non_empty(output.pointer("/audio/url").and_then(Value::as_str))
            .or_else(|| non_empty(output.get("audio_url").and_then(Value::as_str)))
    }
}

/// Pull the audio URL out of a decoded response body, trying the typed shape
/// first and the raw JSON tree second.
pub fn resolve_audio_url(body: &Value) -> Option<String> {
    let typed = serde_json::from_value::<SynthesisResponse>(body.clone()).ok();
    let mut sources: Vec<&dyn AudioUrlSource> = Vec::with_capacity(2);
    if let Some(typed) = typed.as_ref() {
        sources.push(typed);
    }
    sources.push(body);

    sources
        .into_iter()
        .find_map(|source| source.audio_url())
        .map(str::to_string)
}
