//! Sliding-window text chunking.
//!
//! Splits a document into fixed-size overlapping windows whose emission
//! ordinals double as frame numbers in the encoded artifact. Window
//! arithmetic is codepoint-level so every chunk is a valid UTF-8 slice of
//! the source; recorded offsets are byte positions.

use tracing::trace;

use crate::config::EncodingConfig;
use crate::error::{Error, Result};
use crate::models::Chunk;

/// Fixed-size sliding-window chunker.
///
/// Emits windows of `chunk_size` codepoints advancing by
/// `chunk_size - chunk_overlap`; the final window is not padded and may
/// be shorter. Chunking is a pure function of `(text, config)`.
#[derive(Debug, Clone)]
pub struct SlidingWindowChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SlidingWindowChunker {
    /// Create a chunker, rejecting a zero or negative stride.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be strictly less than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Create a chunker from an already-validated encoding config.
    pub fn from_config(config: &EncodingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into ordered chunks. Empty input yields an empty Vec.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every codepoint boundary, including text.len().
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(byte_pos, _)| byte_pos)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = boundaries.len() - 1;

        let stride = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start_char = 0;

        while start_char < char_count {
            let end_char = (start_char + self.chunk_size).min(char_count);
            let start_byte = boundaries[start_char];
            let end_byte = boundaries[end_char];

            trace!(
                index = chunks.len(),
                start_byte,
                end_byte,
                "emitting chunk"
            );

            chunks.push(Chunk::new(
                text[start_byte..end_byte].to_string(),
                chunks.len(),
                start_byte,
                end_byte,
            ));

            start_char += stride;
        }

        chunks
    }
}
