use std::path::PathBuf;

use thiserror::Error;

/// Every way a voice reply can fail. All of them are terminal for the run.
#[derive(Error, Debug)]
pub enum VoiceReplyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Synthesis failed: {message}; response: {response}")]
    Synthesis { message: String, response: String },

    #[error("Audio download failed after {attempts} attempts: {last_error:#}")]
    Download {
        attempts: u32,
        last_error: anyhow::Error,
    },

    #[error("Transcode failed: {0}")]
    Transcode(String),

    #[error("Failed to render manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VoiceReplyError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn synthesis(message: impl Into<String>, response: impl Into<String>) -> Self {
        Self::Synthesis {
            message: message.into(),
            response: response.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = VoiceReplyError> = std::result::Result<T, E>;
