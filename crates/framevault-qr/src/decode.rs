//! QR payload recovery from frame bitmaps.

use tracing::trace;

use framevault_core::{Error, Result};

/// Decode the QR payload of a PNG-encoded frame.
///
/// The frame may carry codec artifacts; QR's own error correction absorbs
/// them up to the configured level. Fails with `FrameDecode` when no grid
/// is detected or the symbol is unreadable.
pub fn decode_png(png_bytes: &[u8]) -> Result<String> {
    let luma = image::load_from_memory(png_bytes)
        .map_err(|e| Error::FrameDecode(format!("failed to load frame image: {}", e)))?
        .to_luma8();

    let mut prepared = rqrr::PreparedImage::prepare(luma);
    let grids = prepared.detect_grids();
    if grids.is_empty() {
        return Err(Error::FrameDecode("no QR grid detected".to_string()));
    }

    trace!(grids = grids.len(), "detected QR grids");

    let (_meta, content) = grids[0]
        .decode()
        .map_err(|e| Error::FrameDecode(format!("QR decode failed: {:?}", e)))?;
    Ok(content)
}
