pub mod fetcher;
pub mod mock;
pub mod retry;

pub use fetcher::{AudioFetcher, HttpFetcher};
pub use retry::{download_with_retry, RetryPolicy};
