//! # framevault-retrieve
//!
//! Semantic retrieval over encoded artifacts: embed the query, consult
//! the vector store, pull the named frames out of the MP4, decode their
//! QR payloads, and return results in similarity order. A bounded LRU
//! cache sits in front of the costly extract+decode step.

pub mod frame_cache;
pub mod retriever;

pub use frame_cache::{CacheStats, FrameCache};
pub use retriever::Retriever;
