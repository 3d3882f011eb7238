//! Core traits for framevault abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability. The pipeline
//! crates depend only on these contracts, never on a concrete variant.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::IndexEntry;

// =============================================================================
// EMBEDDING BACKEND
// =============================================================================

/// Backend capable of generating text embeddings.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Generate embeddings for the given texts.
    ///
    /// Returns one vector per input text, each of `dimension()` length.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the expected dimension of embedding vectors.
    fn dimension(&self) -> usize;

    /// Get the model name being used.
    fn model_name(&self) -> &str;

    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;

    /// Convenience: embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_texts(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("backend returned no vectors".to_string()))
    }
}

// =============================================================================
// VECTOR STORE
// =============================================================================

/// Store of `(embedding, frame_number, document_id, chunk_text, metadata)`
/// tuples answering top-k cosine queries.
///
/// `upsert`, `search`, and `count` are required; `delete_document` and
/// `clear` are optional capabilities that default to `Unsupported`. All
/// embeddings written to one store instance must share a dimension.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert entries, replacing any existing entry with the same
    /// `(document_id, frame_number)` key.
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()>;

    /// Top-k entries by descending cosine similarity against `query`,
    /// with `similarity` set on each. `k == 0` and an empty store both
    /// yield an empty Vec, never an error.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<IndexEntry>>;

    /// Number of entries currently stored.
    async fn count(&self) -> Result<usize>;

    /// Remove all entries belonging to a document.
    async fn delete_document(&self, _document_id: &str) -> Result<()> {
        Err(Error::Unsupported(
            "this backend does not support delete_document".to_string(),
        ))
    }

    /// Remove all entries.
    async fn clear(&self) -> Result<()> {
        Err(Error::Unsupported(
            "this backend does not support clear".to_string(),
        ))
    }
}

// =============================================================================
// FRAME EXTRACTION
// =============================================================================

/// Source of single decoded frames from an MP4 artifact.
///
/// The production implementation shells out to the external video tool;
/// the seam exists so retrieval logic can be exercised without a codec.
#[async_trait]
pub trait FrameExtractor: Send + Sync {
    /// Extract the `frame_number`-th presented frame (0-indexed) as PNG
    /// bytes.
    async fn extract(&self, video_path: &Path, frame_number: u32) -> Result<Vec<u8>>;

    /// Check if the extraction toolchain is available.
    async fn health_check(&self) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedEmbedder {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl EmbeddingBackend for FixedEmbedder {
        async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            *self.calls.lock().unwrap() += 1;
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "fixed"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_embed_single_delegates_to_batch() {
        let backend = FixedEmbedder {
            calls: Mutex::new(0),
        };
        let vector = backend.embed("hello").await.unwrap();
        assert_eq!(vector, vec![1.0, 0.0]);
        assert_eq!(*backend.calls.lock().unwrap(), 1);
    }

    struct NoCapabilityStore;

    #[async_trait]
    impl VectorStore for NoCapabilityStore {
        async fn upsert(&self, _entries: Vec<IndexEntry>) -> Result<()> {
            Ok(())
        }

        async fn search(&self, _query: &[f32], _k: usize) -> Result<Vec<IndexEntry>> {
            Ok(Vec::new())
        }

        async fn count(&self) -> Result<usize> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_optional_capabilities_default_to_unsupported() {
        let store = NoCapabilityStore;
        assert!(matches!(
            store.delete_document("doc").await,
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(store.clear().await, Err(Error::Unsupported(_))));
    }
}
