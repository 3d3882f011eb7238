//! Structured logging schema for framevault.
//!
//! Field names that appear in more than one crate are defined here once
//! and referenced at the call site as constant field names
//! (`debug!({ logging::DOCUMENT_ID } = id, ...)`), so a name can never
//! drift between subsystems and log aggregation tools can query by one
//! spelling everywhere. Fields local to a single call site stay inline.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied (dropped frames) |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (hits, chunks, frames) |

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Opaque document identifier being operated on.
pub const DOCUMENT_ID: &str = "document_id";

/// Zero-based frame ordinal within the MP4.
pub const FRAME_NUMBER: &str = "frame_number";

/// Filesystem path of the MP4 artifact.
pub const VIDEO_PATH: &str = "video_path";

/// Search query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search.
pub const RESULT_COUNT: &str = "result_count";

/// Number of chunks produced or processed.
pub const CHUNK_COUNT: &str = "chunk_count";

/// Byte length of a chunk payload.
pub const PAYLOAD_LEN: &str = "payload_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether a frame was served from the decoded-frame cache.
pub const CACHE_HIT: &str = "cache_hit";

/// Error message accompanying a dropped item or failed operation.
pub const ERROR_MSG: &str = "error";
