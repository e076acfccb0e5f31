use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::audio::ensure_parent_dir;
use crate::download::{download_with_retry, AudioFetcher, HttpFetcher, RetryPolicy};
use crate::error::{Result, VoiceReplyError};
use crate::manifest::output_line;
use crate::settings::{Invocation, InvocationOptions};
use crate::transcode::OggOpusTranscoder;
use crate::tts::dashscope::DashScope;
use crate::tts::provider::SpeechSynthesizer;
use crate::tts::types::SynthesisRequest;

pub const SCRATCH_PREFIX: &str = "yachiyo-tts-";
pub const RAW_AUDIO_FILE: &str = "tts_raw.bin";
const SCRATCH_CLIP_FILE: &str = "voice.ogg";

/// Synthesize → download → transcode → promote, one stage after another.
pub struct VoiceReply {
    synthesizer: Box<dyn SpeechSynthesizer>,
    fetcher: Box<dyn AudioFetcher>,
    transcoder: OggOpusTranscoder,
    retry_policy: RetryPolicy,
}

impl VoiceReply {
    pub fn new(
        synthesizer: Box<dyn SpeechSynthesizer>,
        fetcher: Box<dyn AudioFetcher>,
        transcoder: OggOpusTranscoder,
    ) -> Self {
        Self {
            synthesizer,
            fetcher,
            transcoder,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Production wiring: DashScope over HTTP, reqwest downloads, ffmpeg.
    pub fn from_invocation(invocation: &Invocation) -> Result<Self> {
        let synthesizer = DashScope::new(invocation.client.clone())?;
        let fetcher = HttpFetcher::new(invocation.client.timeout)
            .map_err(|e| VoiceReplyError::config(format!("{e:#}")))?;
        Ok(Self::new(
            Box::new(synthesizer),
            Box::new(fetcher),
            OggOpusTranscoder::new(&invocation.ffmpeg),
        ))
    }

    /// Run every stage for `request` and place the finished clip at
    /// `destination`. Intermediate files live in a scratch directory that is
    /// removed when this returns, whatever the outcome.
    pub async fn run(&self, request: &SynthesisRequest, destination: &Path) -> Result<PathBuf> {
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir()
            .map_err(|e| VoiceReplyError::io(std::env::temp_dir(), e))?;
        let raw_audio = scratch.path().join(RAW_AUDIO_FILE);
        let clip = scratch.path().join(SCRATCH_CLIP_FILE);
        debug!(scratch = %scratch.path().display(), "Created scratch directory");

        info!(
            model = %request.model,
            voice = %request.voice,
            voice_tag = %request.voice_tag,
            chars = request.text.chars().count(),
            "Synthesizing voice reply"
        );
        let audio_url = self.synthesizer.synthesize(request).await?;

        let downloaded = download_with_retry(
            self.fetcher.as_ref(),
            &audio_url,
            &raw_audio,
            &self.retry_policy,
        )
        .await?;
        debug!(bytes = downloaded, "Raw audio ready");

        self.transcoder.transcode(&raw_audio, &clip).await?;
        promote(&clip, destination).await?;

        info!(path = %destination.display(), "Voice reply ready");
        Ok(destination.to_path_buf())
    }
}

async fn promote(clip: &Path, destination: &Path) -> Result<()> {
    ensure_parent_dir(destination)
        .await
        .map_err(|e| VoiceReplyError::io(destination, e))?;

    if let Err(rename_error) = tokio::fs::rename(clip, destination).await {
        debug!(error = %rename_error, "Rename failed, copying clip instead");
        copy_into_place(clip, destination).await?;
    }
    Ok(())
}

/// Copies `clip` next to `destination` and renames it over, so an interrupted
/// copy never shows up under the final name.
async fn copy_into_place(clip: &Path, destination: &Path) -> Result<()> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(|e| VoiceReplyError::io(parent, e))?;

    tokio::fs::copy(clip, staged.path())
        .await
        .map_err(|e| VoiceReplyError::io(destination, e))?;
    staged
        .persist(destination)
        .map_err(|e| VoiceReplyError::io(destination, e.error))?;
    Ok(())
}

/// Whole-program flow: validate the options, build the pipeline, run it and
/// render the stdout line. Nothing is built before validation succeeds.
pub async fn voice_reply<L, B>(options: InvocationOptions, lookup: L, build: B) -> Result<String>
where
    L: Fn(&str) -> Option<String>,
    B: FnOnce(&Invocation) -> Result<VoiceReply>,
{
    let invocation = Invocation::resolve(options, lookup)?;
    let pipeline = build(&invocation)?;
    let audio_path = pipeline
        .run(&invocation.request, &invocation.output)
        .await?;
    Ok(output_line(
        &audio_path,
        &invocation.request,
        invocation.emit_manifest,
    )?)
}
