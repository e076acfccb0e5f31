#![allow(dead_code)]

use std::path::{Path, PathBuf};

use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes an executable stand-in for ffmpeg into `dir`. It writes
/// `output_bytes` zero bytes to its last argument (skipped when 0), prints
/// `stderr` to standard error and exits with `exit_code`.
///
/// Tests that run such scripts are `#[serial]`: executing a freshly written
/// file while another thread forks can fail with ETXTBSY.
#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path, output_bytes: usize, stderr: &str, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ffmpeg.sh");
    let write_output = if output_bytes > 0 {
        format!("head -c {output_bytes} /dev/zero > \"$out\"\n")
    } else {
        String::new()
    };
    let script = format!(
        "#!/bin/sh\nfor arg in \"$@\"; do out=\"$arg\"; done\n{write_output}printf '%s\\n' '{stderr}' >&2\nexit {exit_code}\n"
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Download payload: `len` bytes of audio-looking filler.
pub fn audio(len: usize) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(vec![7u8; len], "audio/wav")
}

/// Mount `response` for a single matching request, ahead of any later mounts.
pub async fn mount_once(server: &MockServer, url_path: &str, response: ResponseTemplate) {
    Mock::given(path(url_path))
        .respond_with(response)
        .up_to_n_times(1)
        .mount(server)
        .await;
}
