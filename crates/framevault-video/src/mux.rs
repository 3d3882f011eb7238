//! Frame-directory to MP4 muxing.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, info};

use framevault_core::{defaults, logging, Error, Result};

use crate::command::run_status;
use crate::scratch::frame_pattern;

/// Options controlling the muxed output stream.
#[derive(Debug, Clone)]
pub struct MuxOptions {
    /// Output frame rate.
    pub fps: u32,
    /// Codec name passed to `-c:v`.
    pub codec: String,
    /// Pixel format passed to `-pix_fmt`.
    pub pixel_format: String,
    /// Square output edge in pixels; inputs are scaled and padded to it.
    pub resolution: u32,
}

impl Default for MuxOptions {
    fn default() -> Self {
        Self {
            fps: defaults::VIDEO_FPS,
            codec: defaults::VIDEO_CODEC.to_string(),
            pixel_format: defaults::VIDEO_PIXEL_FORMAT.to_string(),
            resolution: defaults::VIDEO_RESOLUTION,
        }
    }
}

impl MuxOptions {
    /// Scaling+padding filter that forces the output resolution without
    /// cropping. Scale preserves aspect, pad centers on white.
    fn video_filter(&self) -> String {
        let r = self.resolution;
        format!(
            "scale={r}:{r}:force_original_aspect_ratio=decrease,\
             pad={r}:{r}:(ow-iw)/2:(oh-ih)/2:color=white"
        )
    }
}

/// Assemble the numbered PNGs in `scratch_dir` into an MP4 at `output`.
///
/// The stream is written to a `.part` sibling first and renamed into
/// place on success, so a failed mux never publishes a partial MP4.
/// Frame `N` of the output is the `N`-th file in scratch order.
pub async fn mux_frames(
    scratch_dir: &Path,
    frame_count: usize,
    options: &MuxOptions,
    output: &Path,
) -> Result<()> {
    if frame_count == 0 {
        return Err(Error::InvalidInput(
            "cannot mux zero frames".to_string(),
        ));
    }

    let input_pattern = scratch_dir.join(frame_pattern(frame_count));
    let part_path = output.with_extension("mp4.part");

    debug!(
        frame_count,
        fps = options.fps,
        codec = %options.codec,
        { logging::VIDEO_PATH } = %output.display(),
        "muxing frames"
    );

    let result = run_status(
        Command::new("ffmpeg")
            .arg("-y")
            .arg("-framerate")
            .arg(options.fps.to_string())
            .arg("-i")
            .arg(&input_pattern)
            .arg("-c:v")
            .arg(&options.codec)
            .arg("-pix_fmt")
            .arg(&options.pixel_format)
            .arg("-vf")
            .arg(options.video_filter())
            // The staging path ends in .part, so the container format
            // cannot be inferred from the extension.
            .arg("-f")
            .arg("mp4")
            .arg(&part_path),
        defaults::MUX_TIMEOUT_SECS,
    )
    .await;

    if let Err(e) = result {
        // Never leave a half-written artifact behind.
        let _ = tokio::fs::remove_file(&part_path).await;
        return Err(e);
    }

    tokio::fs::rename(&part_path, output).await?;

    info!(
        frame_count,
        { logging::VIDEO_PATH } = %output.display(),
        "mux complete"
    );
    Ok(())
}
