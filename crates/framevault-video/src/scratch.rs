//! Scratch-directory frame naming.
//!
//! Frame files are named so that lexicographic order equals frame order;
//! the muxer's input pattern and the names produced here must always
//! agree on the pad width.

use framevault_core::defaults;

/// Zero-pad width for a corpus of `frame_count` frames.
pub fn pad_width(frame_count: usize) -> usize {
    let digits = if frame_count <= 1 {
        1
    } else {
        (frame_count - 1).to_string().len()
    };
    digits.max(defaults::FRAME_NAME_PAD)
}

/// Scratch filename of frame `index` within a corpus of `frame_count`.
pub fn frame_file_name(index: usize, frame_count: usize) -> String {
    format!("frame_{:0width$}.png", index, width = pad_width(frame_count))
}

/// ffmpeg input pattern matching `frame_file_name` output.
pub fn frame_pattern(frame_count: usize) -> String {
    format!("frame_%0{}d.png", pad_width(frame_count))
}
