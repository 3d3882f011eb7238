//! Chunk text to QR frame bitmaps.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use tracing::trace;

use framevault_core::{defaults, logging};
use framevault_core::{Error, QrEcLevel, Result};

const WHITE: Luma<u8> = Luma([255u8]);

/// Renders chunk text into square grayscale QR PNGs.
///
/// The symbol version is chosen by the QR library per payload; the
/// rasterizer fails with `PayloadTooLarge` when a chunk exceeds a single
/// symbol at the configured error-correction level, or when the symbol
/// cannot be drawn at one pixel per module inside the configured
/// resolution.
#[derive(Debug, Clone)]
pub struct QrRasterizer {
    ec_level: EcLevel,
    resolution: u32,
    margin_modules: u32,
}

impl QrRasterizer {
    pub fn new(level: QrEcLevel, resolution: u32) -> Result<Self> {
        if resolution == 0 {
            return Err(Error::Config(
                "video_resolution must be positive".to_string(),
            ));
        }
        Ok(Self {
            ec_level: map_level(level),
            resolution,
            margin_modules: defaults::QR_MARGIN_MODULES,
        })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Render `text` into PNG bytes of exactly `resolution` squared
    /// pixels. `frame_number` is only used to attribute errors.
    pub fn rasterize(&self, text: &str, frame_number: u32) -> Result<Vec<u8>> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), self.ec_level).map_err(
            |e| match e {
                qrcode::types::QrError::DataTooLong => Error::PayloadTooLarge {
                    frame_number,
                    len: text.len(),
                },
                other => Error::Internal(format!("QR encoding failed: {:?}", other)),
            },
        )?;

        let modules = code.width() as u32 + 2 * self.margin_modules;
        let scale = self.resolution / modules;
        if scale == 0 {
            // The symbol has more modules than the frame has pixels.
            return Err(Error::PayloadTooLarge {
                frame_number,
                len: text.len(),
            });
        }

        let symbol: GrayImage = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(scale, scale)
            .build();

        trace!(
            { logging::FRAME_NUMBER } = frame_number,
            { logging::PAYLOAD_LEN } = text.len(),
            symbol_px = symbol.width(),
            out_px = self.resolution,
            "rendered QR symbol"
        );

        let canvas = center_on_white(&symbol, self.resolution);

        let mut png = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| Error::Internal(format!("PNG encoding failed: {}", e)))?;
        Ok(png)
    }
}

fn map_level(level: QrEcLevel) -> EcLevel {
    match level {
        QrEcLevel::L => EcLevel::L,
        QrEcLevel::M => EcLevel::M,
        QrEcLevel::Q => EcLevel::Q,
        QrEcLevel::H => EcLevel::H,
    }
}

/// Paste `symbol` centered onto a white square of `size` pixels.
fn center_on_white(symbol: &GrayImage, size: u32) -> GrayImage {
    let mut canvas = GrayImage::from_pixel(size, size, WHITE);
    let dx = (size - symbol.width()) / 2;
    let dy = (size - symbol.height()) / 2;
    for (x, y, pixel) in symbol.enumerate_pixels() {
        canvas.put_pixel(x + dx, y + dy, *pixel);
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_png;

    #[test]
    fn test_rasterize_produces_exact_dimensions() {
        let rasterizer = QrRasterizer::new(QrEcLevel::M, 256).unwrap();
        let png = rasterizer.rasterize("hello world", 0).unwrap();

        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), 256);
        assert_eq!(img.height(), 256);
    }

    #[test]
    fn test_rasterize_centers_symbol_with_white_border() {
        let rasterizer = QrRasterizer::new(QrEcLevel::M, 256).unwrap();
        let png = rasterizer.rasterize("border check", 0).unwrap();

        let img = image::load_from_memory(&png).unwrap().to_luma8();
        // Corners sit inside the padding and must be white.
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(255, 0).0[0], 255);
        assert_eq!(img.get_pixel(0, 255).0[0], 255);
        assert_eq!(img.get_pixel(255, 255).0[0], 255);
    }

    #[test]
    fn test_round_trip_ascii() {
        let rasterizer = QrRasterizer::new(QrEcLevel::M, 256).unwrap();
        let text = "The quick brown fox jumps over the lazy dog.";
        let png = rasterizer.rasterize(text, 0).unwrap();

        assert_eq!(decode_png(&png).unwrap(), text);
    }

    #[test]
    fn test_round_trip_multibyte() {
        let rasterizer = QrRasterizer::new(QrEcLevel::Q, 256).unwrap();
        let text = "héllo wörld — ünïcode 文字";
        let png = rasterizer.rasterize(text, 3).unwrap();

        assert_eq!(decode_png(&png).unwrap(), text);
    }

    #[test]
    fn test_round_trip_at_every_ec_level() {
        for level in [QrEcLevel::L, QrEcLevel::M, QrEcLevel::Q, QrEcLevel::H] {
            let rasterizer = QrRasterizer::new(level, 256).unwrap();
            let text = format!("payload at level {}", level);
            let png = rasterizer.rasterize(&text, 0).unwrap();
            assert_eq!(decode_png(&png).unwrap(), text, "level {}", level);
        }
    }

    #[test]
    fn test_payload_too_large_fails_fast() {
        // 5000 chars exceeds a single symbol at the most redundant level.
        let rasterizer = QrRasterizer::new(QrEcLevel::H, 256).unwrap();
        let text = "x".repeat(5000);

        match rasterizer.rasterize(&text, 7) {
            Err(Error::PayloadTooLarge { frame_number, len }) => {
                assert_eq!(frame_number, 7);
                assert_eq!(len, 5000);
            }
            other => panic!("Expected PayloadTooLarge, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_symbol_wider_than_resolution_is_too_large() {
        // A large payload needs a high version symbol; at 64 px there is
        // no room for one pixel per module.
        let rasterizer = QrRasterizer::new(QrEcLevel::M, 64).unwrap();
        let text = "y".repeat(1500);

        assert!(matches!(
            rasterizer.rasterize(&text, 0),
            Err(Error::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_resolution() {
        assert!(QrRasterizer::new(QrEcLevel::M, 0).is_err());
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let rasterizer = QrRasterizer::new(QrEcLevel::M, 256).unwrap();
        let a = rasterizer.rasterize("same payload", 0).unwrap();
        let b = rasterizer.rasterize("same payload", 0).unwrap();
        assert_eq!(a, b);
    }
}
