//! # framevault-qr
//!
//! QR symbol rasterization and decoding.
//!
//! The encode half turns a chunk of text into an exact-resolution
//! grayscale PNG: black modules on white, centered, with a configurable
//! module margin. The decode half recovers the payload text from PNG
//! bytes, tolerant of the mild distortion a video codec introduces.

pub mod decode;
pub mod encode;

pub use decode::decode_png;
pub use encode::QrRasterizer;
