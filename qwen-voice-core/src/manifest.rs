use std::path::Path;

use serde::Serialize;

use crate::tts::types::SynthesisRequest;
use crate::voice_tag::VoiceTag;

/// Summary of one synthesis run, printed instead of the bare path when
/// requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub audio_path: String,
    pub tts_input_text: String,
    pub voice_tag: VoiceTag,
    pub model: String,
    pub voice: String,
}

impl Manifest {
    pub fn new(audio_path: &Path, request: &SynthesisRequest) -> Self {
        Self {
            audio_path: audio_path.display().to_string(),
            tts_input_text: request.text.clone(),
            voice_tag: request.voice_tag,
            model: request.model.clone(),
            voice: request.voice.clone(),
        }
    }

    /// Single-line JSON; serde_json leaves non-ASCII characters unescaped.
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The one line written to stdout after a successful run.
pub fn output_line(
    audio_path: &Path,
    request: &SynthesisRequest,
    emit_manifest: bool,
) -> serde_json::Result<String> {
    if emit_manifest {
        Manifest::new(audio_path, request).to_line()
    } else {
        Ok(audio_path.display().to_string())
    }
}
