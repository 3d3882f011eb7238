//! # framevault-core
//!
//! Core types, traits, and abstractions for the framevault library.
//!
//! This crate provides the foundational data structures and trait
//! definitions that other framevault crates depend on: the error type,
//! the data model, configuration, the sliding-window chunker, cosine
//! similarity, cancellation, and the backend contracts.

pub mod cancel;
pub mod chunker;
pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod similarity;
pub mod traits;

// Re-export commonly used types at crate root
pub use cancel::CancelToken;
pub use chunker::SlidingWindowChunker;
pub use config::{EncodingConfig, QrEcLevel, RetrieverConfig};
pub use error::{Error, Result};
pub use models::{
    ArchiveStats, Chunk, IndexEntry, SearchResult, META_END_OFFSET, META_START_OFFSET,
    META_VIDEO_FPS, META_VIDEO_PATH,
};
pub use similarity::cosine_similarity;
pub use traits::{EmbeddingBackend, FrameExtractor, VectorStore};
