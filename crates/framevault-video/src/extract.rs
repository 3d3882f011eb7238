//! Single-frame extraction by frame index.

use std::path::Path;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::trace;

use framevault_core::{defaults, logging, Error, FrameExtractor, Result};

use crate::command::{ffmpeg_available, run_status};

/// Frame extractor backed by a fresh ffmpeg process per call.
///
/// Seeking is frame-exact: the `select=eq(n,N)` filter addresses the
/// decoded frame ordinal directly, so no timestamp rounding can land on a
/// neighboring frame regardless of the stream's frame rate.
#[derive(Debug, Clone, Default)]
pub struct FfmpegFrameExtractor;

impl FfmpegFrameExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FrameExtractor for FfmpegFrameExtractor {
    async fn extract(&self, video_path: &Path, frame_number: u32) -> Result<Vec<u8>> {
        let work_dir = TempDir::new()?;
        let out_path = work_dir.path().join("frame.png");

        trace!(
            { logging::VIDEO_PATH } = %video_path.display(),
            { logging::FRAME_NUMBER } = frame_number,
            "extracting frame"
        );

        run_status(
            Command::new("ffmpeg")
                .arg("-i")
                .arg(video_path)
                .arg("-vf")
                .arg(format!("select=eq(n\\,{})", frame_number))
                .arg("-vsync")
                .arg("vfr")
                .arg("-vframes")
                .arg("1")
                .arg("-y")
                .arg(&out_path),
            defaults::EXTRACT_TIMEOUT_SECS,
        )
        .await
        .map_err(|e| match e {
            // Tooling problems stay fatal; anything about this specific
            // frame is a per-frame decode failure the retriever absorbs.
            Error::EncoderNotFound(_) => e,
            other => Error::FrameDecode(other.to_string()),
        })?;

        match tokio::fs::read(&out_path).await {
            Ok(bytes) => Ok(bytes),
            // ffmpeg exits 0 without output when the index is past the
            // last frame.
            Err(_) => Err(Error::FrameDecode(format!(
                "no frame produced for index {}",
                frame_number
            ))),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(ffmpeg_available().await)
    }
}
