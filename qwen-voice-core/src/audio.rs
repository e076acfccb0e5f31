use std::path::Path;

/// Anything smaller than this is treated as a broken clip, after download
/// and after transcode alike.
pub const MIN_AUDIO_BYTES: u64 = 1024;

/// Size of the file at `path`, or 0 when it does not exist.
pub async fn file_size(path: &Path) -> u64 {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.len())
        .unwrap_or(0)
}

/// Create the parent directory of `path` if it has one.
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
