use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::Instant;

use super::fetcher::AudioFetcher;

/// One scripted fetch outcome
#[derive(Debug, Clone)]
pub enum FetchStep {
    /// Write this many bytes to the destination and report success
    Write(usize),
    /// Report a transfer error without touching the destination
    Fail(String),
}

/// Mock fetcher for testing. Steps are consumed in order; once the script
/// runs out every call fails.
#[derive(Clone)]
pub struct MockFetcher {
    steps: Arc<Mutex<VecDeque<FetchStep>>>,
    call_times: Arc<Mutex<Vec<Instant>>>,
    destinations: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFetcher {
    pub fn new(steps: Vec<FetchStep>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            call_times: Arc::new(Mutex::new(Vec::new())),
            destinations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_call_count(&self) -> usize {
        self.call_times.lock().unwrap().len()
    }

    /// Clock readings taken at the start of each call
    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }

    pub fn destinations(&self) -> Vec<PathBuf> {
        self.destinations.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioFetcher for MockFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        self.call_times.lock().unwrap().push(Instant::now());
        self.destinations
            .lock()
            .unwrap()
            .push(destination.to_path_buf());

        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(FetchStep::Write(len)) => {
                std::fs::write(destination, vec![0u8; len])?;
                Ok(())
            }
            Some(FetchStep::Fail(message)) => Err(anyhow::anyhow!(message)),
            None => anyhow::bail!("no scripted response for {url}"),
        }
    }
}
