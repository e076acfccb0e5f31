use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::audio::{ensure_parent_dir, file_size, MIN_AUDIO_BYTES};
use crate::error::{Result, VoiceReplyError};

/// Mono, 48 kHz, 32 kbps VBR Opus in an Ogg container.
const OPUS_ARGS: [&str; 10] = [
    "-c:a", "libopus", "-b:a", "32k", "-vbr", "on", "-ac", "1", "-ar", "48000",
];

/// Runs an ffmpeg-compatible program exactly once per clip. Success means a
/// zero exit status and an output file of at least `min_bytes`.
#[derive(Debug, Clone)]
pub struct OggOpusTranscoder {
    program: PathBuf,
    min_bytes: u64,
}

impl OggOpusTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            min_bytes: MIN_AUDIO_BYTES,
        }
    }

    pub fn args(&self, source: &Path, destination: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), source.into()];
        args.extend(OPUS_ARGS.iter().map(OsString::from));
        args.push(destination.into());
        args
    }

    /// Transcode `source` into `destination` and return the output size.
    pub async fn transcode(&self, source: &Path, destination: &Path) -> Result<u64> {
        ensure_parent_dir(destination)
            .await
            .map_err(|e| VoiceReplyError::io(destination, e))?;

        let args = self.args(source, destination);
        debug!(program = %self.program.display(), ?args, "Running transcoder");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                VoiceReplyError::Transcode(format!(
                    "failed to run {}: {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VoiceReplyError::Transcode(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let size = file_size(destination).await;
        if size < self.min_bytes {
            return Err(VoiceReplyError::Transcode(format!(
                "Transcoded audio too small ({size} bytes)"
            )));
        }

        info!(size, destination = %destination.display(), "Transcoded to Ogg/Opus");
        Ok(size)
    }
}
