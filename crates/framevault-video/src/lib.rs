//! # framevault-video
//!
//! Thin plumbing around the external `ffmpeg`/`ffprobe` tools: muxing a
//! directory of frame PNGs into an MP4, probing artifacts, and extracting
//! single frames by index.
//!
//! Every invocation spawns a fresh subprocess under its own timeout; no
//! codec process is ever shared between requests. Frame order is carried
//! entirely by zero-padded scratch filenames, and no filter that could
//! drop, duplicate, or reorder frames is ever applied.

mod command;
pub mod extract;
pub mod mux;
pub mod probe;
pub mod scratch;

pub use command::{ffmpeg_available, ffprobe_available};
pub use extract::FfmpegFrameExtractor;
pub use mux::{mux_frames, MuxOptions};
pub use probe::{count_frames, probe_duration};
pub use scratch::{frame_file_name, frame_pattern, pad_width};
