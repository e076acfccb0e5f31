use std::path::Path;
use std::time::Duration;

use anyhow::anyhow;
use tokio::time::sleep;
use tracing::{info, warn};

use super::fetcher::AudioFetcher;
use crate::audio::{ensure_parent_dir, file_size, MIN_AUDIO_BYTES};
use crate::error::{Result, VoiceReplyError};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(800);

/// Linear backoff: the wait after the n-th failed attempt is `n * backoff_step`.
/// An attempt only counts as successful once the file holds at least
/// `min_bytes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
    pub min_bytes: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_step: DEFAULT_BACKOFF_STEP,
            min_bytes: MIN_AUDIO_BYTES,
        }
    }
}

impl RetryPolicy {
    /// Wait inserted after the failed `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// Download `url` into `destination`, retrying per `policy`. Returns the
/// size of the accepted file.
pub async fn download_with_retry(
    fetcher: &dyn AudioFetcher,
    url: &str,
    destination: &Path,
    policy: &RetryPolicy,
) -> Result<u64> {
    let mut last_error = anyhow!("no download attempt was made");

    for attempt in 1..=policy.max_attempts {
        match try_download(fetcher, url, destination, policy.min_bytes).await {
            Ok(size) => {
                info!(attempt, size, "Audio downloaded");
                return Ok(size);
            }
            Err(error) => {
                if attempt < policy.max_attempts {
                    let backoff = policy.backoff(attempt);
                    warn!(
                        attempt,
                        max_attempts = policy.max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %format!("{error:#}"),
                        "Audio download failed, retrying after backoff"
                    );
                    sleep(backoff).await;
                } else {
                    warn!(
                        attempt,
                        error = %format!("{error:#}"),
                        "Audio download failed, no attempts left"
                    );
                }
                last_error = error;
            }
        }
    }

    Err(VoiceReplyError::Download {
        attempts: policy.max_attempts,
        last_error,
    })
}

async fn try_download(
    fetcher: &dyn AudioFetcher,
    url: &str,
    destination: &Path,
    min_bytes: u64,
) -> anyhow::Result<u64> {
    ensure_parent_dir(destination).await?;
    fetcher.fetch(url, destination).await?;

    let size = file_size(destination).await;
    if size < min_bytes {
        anyhow::bail!("Downloaded audio too small ({size} bytes)");
    }
    Ok(size)
}
