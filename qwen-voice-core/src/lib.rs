pub mod audio;
pub mod download;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod settings;
pub mod transcode;
pub mod tts;
pub mod voice_tag;

pub use error::{Result, VoiceReplyError};
pub use manifest::{output_line, Manifest};
pub use pipeline::{voice_reply, VoiceReply};
pub use settings::{ClientConfig, Invocation, InvocationOptions};
pub use tts::provider::SpeechSynthesizer;
pub use tts::types::SynthesisRequest;
pub use voice_tag::VoiceTag;
