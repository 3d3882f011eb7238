//! Centralized default constants for framevault.
//!
//! **This module is the single source of truth** for all shared default
//! values. Every crate in the workspace references these constants instead
//! of defining its own magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// CHUNKING
// =============================================================================

/// Sliding-window size in Unicode scalar values.
pub const CHUNK_SIZE: usize = 500;

/// Overlap between consecutive windows. Must stay strictly below
/// `CHUNK_SIZE` or the window stride degenerates to zero.
pub const CHUNK_OVERLAP: usize = 50;

// =============================================================================
// QR RASTERIZATION
// =============================================================================

/// Default QR error-correction level ("L", "M", "Q", or "H").
pub const QR_ERROR_CORRECTION: &str = "M";

/// Quiet-zone width around the symbol, in modules.
pub const QR_MARGIN_MODULES: u32 = 1;

// =============================================================================
// VIDEO
// =============================================================================

/// Output frame rate. 1 fps keeps the H.264 stream key-frame heavy so
/// every frame decodes independently of its neighbors.
pub const VIDEO_FPS: u32 = 1;

/// Square output frame edge in pixels.
pub const VIDEO_RESOLUTION: u32 = 256;

/// Video codec passed to the external encoder.
pub const VIDEO_CODEC: &str = "libx264";

/// Pixel format for the output stream.
pub const VIDEO_PIXEL_FORMAT: &str = "yuv420p";

/// Minimum zero-pad width for scratch frame filenames. Wide enough that
/// lexicographic order equals frame order for the common corpus sizes;
/// the muxer widens it further when an encode exceeds 99999 frames.
pub const FRAME_NAME_PAD: usize = 5;

// =============================================================================
// EXTERNAL TOOL TIMEOUTS
// =============================================================================

/// Timeout for a full mux run in seconds.
pub const MUX_TIMEOUT_SECS: u64 = 300;

/// Timeout for single-frame extraction and probing in seconds.
pub const EXTRACT_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// EMBEDDING
// =============================================================================

/// Default embedding model name (Ollama).
pub const EMBED_MODEL: &str = "nomic-embed-text";

/// Default embedding vector dimension for nomic-embed-text.
pub const EMBED_DIMENSION: usize = 768;

/// Default Ollama base URL.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Timeout for embedding requests in seconds.
pub const EMBED_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// ENCODING PIPELINE
// =============================================================================

/// Upper bound on concurrent rasterize+embed tasks when the configured
/// parallelism is zero ("use all cores").
pub const ENCODE_MAX_PARALLELISM: usize = 32;

// =============================================================================
// RETRIEVAL
// =============================================================================

/// LRU capacity of the decoded-frame cache, per retriever instance.
pub const FRAME_CACHE_SIZE: usize = 50;
