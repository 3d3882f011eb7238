//! # framevault-encode
//!
//! The encode pipeline: turns a text document into an MP4 whose frame
//! *N* is a QR code carrying chunk *N*, plus the matching vector-index
//! entries.
//!
//! Side-effect ordering is fixed: the MP4 is fully published before the
//! index is touched, so an interrupted encode can leave a video without
//! index entries (recoverable by re-encoding — chunking is deterministic)
//! but never index entries without frames.

pub mod pipeline;

pub use pipeline::{BatchDocument, DocumentEncoder, EncodedDocument};
