use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use qwen_voice_core::settings::{
    DEFAULT_BASE_URL, DEFAULT_FFMPEG, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, DEFAULT_VOICE,
};
use qwen_voice_core::{voice_reply, InvocationOptions, VoiceReply};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qwen-voice-reply")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Qwen3-TTS voice synthesis - outputs an ogg file path")]
struct Args {
    /// Text to synthesize
    text: String,

    /// Language tag: en | jp | zh
    #[arg(long, value_name = "TAG")]
    voice_tag: String,

    #[arg(long, default_value = DEFAULT_VOICE)]
    voice: String,

    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Output ogg path (auto-generated in the temp directory if omitted)
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Output a JSON manifest instead of the plain path
    #[arg(long)]
    emit_manifest: bool,

    /// DashScope API base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// ffmpeg executable used for the Ogg/Opus transcode
    #[arg(long, value_name = "PATH", default_value = DEFAULT_FFMPEG)]
    ffmpeg: PathBuf,

    /// HTTP timeout for the synthesis call and each download attempt
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl Args {
    fn into_options(self) -> InvocationOptions {
        InvocationOptions {
            text: self.text,
            voice_tag: self.voice_tag,
            voice: self.voice,
            model: self.model,
            out: self.out,
            emit_manifest: self.emit_manifest,
            base_url: self.base_url,
            ffmpeg: self.ffmpeg,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn main() -> Result<()> {
    setup_tracing()?;
    let args = Args::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let line = runtime.block_on(async_main(args))?;
    println!("{line}");
    Ok(())
}

async fn async_main(args: Args) -> Result<String> {
    info!(
        "CLI startup: voice_tag={}, model={}, voice={}, emit_manifest={}, out={:?}",
        args.voice_tag, args.model, args.voice, args.emit_manifest, args.out
    );

    let line = voice_reply(
        args.into_options(),
        |name| std::env::var(name).ok(),
        VoiceReply::from_invocation,
    )
    .await?;
    Ok(line)
}

/// Logs go to stderr; stdout carries only the result line.
fn setup_tracing() -> Result<()> {
    use tracing_subscriber::fmt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args =
            Args::try_parse_from(["qwen-voice-reply", "こんにちは", "--voice-tag", "jp"]).unwrap();
        let options = args.into_options();

        assert_eq!(options.text, "こんにちは");
        assert_eq!(options.voice_tag, "jp");
        assert_eq!(options.model, DEFAULT_MODEL);
        assert_eq!(options.voice, DEFAULT_VOICE);
        assert_eq!(options.out, None);
        assert!(!options.emit_manifest);
        assert_eq!(options.base_url, DEFAULT_BASE_URL);
        assert_eq!(options.ffmpeg, PathBuf::from(DEFAULT_FFMPEG));
        assert_eq!(options.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "qwen-voice-reply",
            "hello",
            "--voice-tag",
            "en",
            "--voice",
            "Cherry",
            "--model",
            "qwen3-tts-instruct-flash",
            "--out",
            "/tmp/reply.ogg",
            "--emit-manifest",
            "--ffmpeg",
            "/opt/ffmpeg/bin/ffmpeg",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        let options = args.into_options();

        assert_eq!(options.voice, "Cherry");
        assert_eq!(options.model, "qwen3-tts-instruct-flash");
        assert_eq!(options.out, Some(PathBuf::from("/tmp/reply.ogg")));
        assert!(options.emit_manifest);
        assert_eq!(options.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(options.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_voice_tag_is_required() {
        assert!(Args::try_parse_from(["qwen-voice-reply", "hello"]).is_err());
    }

    #[test]
    fn test_text_is_required() {
        assert!(Args::try_parse_from(["qwen-voice-reply", "--voice-tag", "jp"]).is_err());
    }
}
