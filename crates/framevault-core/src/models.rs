//! Core data model: chunks, index entries, search results, stats.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key carrying the byte offset where a chunk starts.
pub const META_START_OFFSET: &str = "start_offset";

/// Metadata key carrying the byte offset where a chunk ends.
pub const META_END_OFFSET: &str = "end_offset";

/// Metadata key carrying the artifact path a chunk was encoded into.
pub const META_VIDEO_PATH: &str = "video_path";

/// Metadata key carrying the artifact frame rate. Written on the frame-0
/// entry of each document so timestamp-seeking consumers can convert
/// frame numbers without probing the file.
pub const META_VIDEO_FPS: &str = "video_fps";

/// A contiguous slice of source text with a stable index equal to the
/// frame number that encodes it.
///
/// Window arithmetic is codepoint-level; `start_offset`/`end_offset` are
/// the corresponding byte positions in the source, so the text is always
/// a valid UTF-8 slice of the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// Emission ordinal; equal to the chunk's frame number.
    pub index: usize,
    /// Starting byte offset in the original document.
    pub start_offset: usize,
    /// Ending byte offset in the original document.
    pub end_offset: usize,
}

impl Chunk {
    pub fn new(text: String, index: usize, start_offset: usize, end_offset: usize) -> Self {
        Self {
            text,
            index,
            start_offset,
            end_offset,
        }
    }

    /// Length of the chunk in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The unit persisted by a vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Opaque owner identifier.
    pub document_id: String,
    /// Zero-based presentation-order frame ordinal in the MP4.
    pub frame_number: u32,
    /// The chunk text encoded at that frame. Authoritative copy; the QR
    /// payload is derived from it, never the other way around.
    pub chunk_text: String,
    /// Fixed-length f32 embedding. All entries in one store share a
    /// dimension.
    pub embedding: Vec<f32>,
    /// String-serializable side data.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Cosine similarity against the query; only set on search results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
}

impl IndexEntry {
    pub fn new(
        document_id: impl Into<String>,
        frame_number: u32,
        chunk_text: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            frame_number,
            chunk_text: chunk_text.into(),
            embedding,
            metadata: HashMap::new(),
            similarity: None,
        }
    }

    /// Attach a metadata key/value, builder style.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A single retrieval hit, decoded from the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Text decoded from the frame's QR payload.
    pub chunk_text: String,
    /// Cosine similarity of the hit, in [-1, 1].
    pub similarity: f32,
    pub frame_number: u32,
    pub document_id: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// On-demand statistics for one encoded artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveStats {
    /// Chunks the configured chunker produces for the source text.
    pub total_chunks: usize,
    /// Frames actually present in the MP4.
    pub total_frames: u64,
    pub video_size_bytes: u64,
    pub original_size_bytes: u64,
    /// `original_size_bytes / video_size_bytes`; 0.0 when the video is
    /// empty.
    pub compression_ratio: f64,
    pub duration_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_len_and_empty() {
        let chunk = Chunk::new("hello".to_string(), 0, 0, 5);
        assert_eq!(chunk.len(), 5);
        assert!(!chunk.is_empty());

        let empty = Chunk::new(String::new(), 0, 0, 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_index_entry_builder_metadata() {
        let entry = IndexEntry::new("doc-1", 0, "text", vec![0.1, 0.2])
            .with_metadata(META_VIDEO_FPS, "1")
            .with_metadata(META_START_OFFSET, "0");

        assert_eq!(entry.metadata.get(META_VIDEO_FPS).unwrap(), "1");
        assert_eq!(entry.metadata.get(META_START_OFFSET).unwrap(), "0");
        assert!(entry.similarity.is_none());
    }

    #[test]
    fn test_index_entry_serde_round_trip() {
        let entry = IndexEntry::new("doc-1", 7, "chunk text", vec![1.0, 0.0, 0.0])
            .with_metadata(META_VIDEO_PATH, "/tmp/a.mp4");

        let json = serde_json::to_string(&entry).unwrap();
        let back: IndexEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_index_entry_similarity_not_serialized_when_none() {
        let entry = IndexEntry::new("doc-1", 0, "t", vec![0.5]);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("similarity"));
    }
}
