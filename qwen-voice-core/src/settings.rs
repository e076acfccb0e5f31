use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{Result, VoiceReplyError};
use crate::tts::types::SynthesisRequest;
use crate::voice_tag::VoiceTag;

pub const DEFAULT_MODEL: &str = "qwen3-tts-vc-2026-01-22";
pub const DEFAULT_VOICE: &str = "qwen-tts-vc-yachiyo-voice-20260224022238839-5679";
pub const DEFAULT_BASE_URL: &str = "https://dashscope-intl.aliyuncs.com/api/v1";
pub const DEFAULT_FFMPEG: &str = "ffmpeg";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const API_KEY_ENV: &str = "DASHSCOPE_API_KEY";

/// Explicit configuration for the DashScope HTTP client.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keeps the credential out of debug logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Raw command-line input before validation.
#[derive(Debug, Clone)]
pub struct InvocationOptions {
    pub text: String,
    pub voice_tag: String,
    pub voice: String,
    pub model: String,
    pub out: Option<PathBuf>,
    pub emit_manifest: bool,
    pub base_url: String,
    pub ffmpeg: PathBuf,
    pub timeout: Duration,
}

impl InvocationOptions {
    pub fn new(text: impl Into<String>, voice_tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_tag: voice_tag.into(),
            voice: DEFAULT_VOICE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            out: None,
            emit_manifest: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// A validated invocation: everything the pipeline needs, resolved before
/// any network or process activity.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub request: SynthesisRequest,
    pub client: ClientConfig,
    pub output: PathBuf,
    pub emit_manifest: bool,
    pub ffmpeg: PathBuf,
}

impl Invocation {
    /// Validate `options`, reading the credential through `lookup`
    /// (`std::env::var` in the binary).
    pub fn resolve<F>(options: InvocationOptions, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let voice_tag = VoiceTag::parse(&options.voice_tag)?;

        // Whitespace-only counts as missing; anything else is forwarded as given.
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                VoiceReplyError::config(format!("{API_KEY_ENV} environment variable is required"))
            })?;

        if options.text.trim().is_empty() {
            return Err(VoiceReplyError::config("text to synthesize must not be empty"));
        }

        let output = options
            .out
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| {
                default_output_path(&std::env::temp_dir(), std::process::id(), Utc::now())
            });

        let client = ClientConfig::new(api_key)
            .with_base_url(&options.base_url)
            .with_timeout(options.timeout);

        Ok(Self {
            request: SynthesisRequest::new(options.text, options.model, options.voice, voice_tag),
            client,
            output,
            emit_manifest: options.emit_manifest,
            ffmpeg: options.ffmpeg,
        })
    }
}

/// Output path used when `--out` is not given.
pub fn default_output_path(temp_dir: &Path, pid: u32, now: DateTime<Utc>) -> PathBuf {
    temp_dir.join(format!("yachiyo-voice-{pid}-{}.ogg", now.timestamp()))
}
