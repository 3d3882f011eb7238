//! Artifact probing via ffprobe.

use std::path::Path;

use tokio::process::Command;

use framevault_core::{defaults, Error, Result};

use crate::command::run_capture;

/// Container duration of the artifact in seconds.
pub async fn probe_duration(video_path: &Path) -> Result<f64> {
    let stdout = run_capture(
        Command::new("ffprobe")
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(video_path),
        defaults::EXTRACT_TIMEOUT_SECS,
    )
    .await?;

    parse_field(&stdout, "duration")
}

/// Exact decoded frame count of the artifact's video stream.
///
/// Uses `-count_frames` rather than the container's frame-count box, so
/// the answer reflects what a decoder will actually present.
pub async fn count_frames(video_path: &Path) -> Result<u64> {
    let stdout = run_capture(
        Command::new("ffprobe")
            .arg("-v")
            .arg("error")
            .arg("-select_streams")
            .arg("v:0")
            .arg("-count_frames")
            .arg("-show_entries")
            .arg("stream=nb_read_frames")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(video_path),
        defaults::EXTRACT_TIMEOUT_SECS,
    )
    .await?;

    parse_field(&stdout, "frame count")
}

fn parse_field<T: std::str::FromStr>(stdout: &[u8], what: &str) -> Result<T> {
    String::from_utf8_lossy(stdout)
        .trim()
        .parse::<T>()
        .map_err(|_| {
            Error::EncoderFailed(format!(
                "ffprobe returned unparseable {}: {:?}",
                what,
                String::from_utf8_lossy(stdout).trim()
            ))
        })
}
