//! Mock embedding backend for deterministic testing.
//!
//! Generates embeddings that are a pure function of the input text, logs
//! every call for assertions, and can be switched into a failing mode to
//! exercise error paths. Identical texts always embed to identical unit
//! vectors, so a query equal to an indexed chunk scores similarity 1.0.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use framevault_core::{EmbeddingBackend, Error, Result};

/// Deterministic mock embedding backend.
#[derive(Clone)]
pub struct MockEmbedder {
    dimension: usize,
    failing: Arc<AtomicBool>,
    call_log: Arc<Mutex<Vec<String>>>,
}

impl MockEmbedder {
    /// Create a mock with a 384-dimension output.
    pub fn new() -> Self {
        Self::with_dimension(384)
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            failing: Arc::new(AtomicBool::new(false)),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Switch the backend into (or out of) a failing mode.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Texts passed to `embed_texts`, in call order.
    pub fn embedded_texts(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn embed_call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbedder {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        {
            let mut log = self.call_log.lock().unwrap();
            log.extend(texts.iter().cloned());
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Embedding("mock backend failing".to_string()));
        }

        Ok(texts
            .iter()
            .map(|text| MockEmbeddingGenerator::generate(text, self.dimension))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embedder"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.failing.load(Ordering::SeqCst))
    }
}

/// Deterministic embedding generator.
///
/// Embeds text by hashing its overlapping byte trigrams into buckets of
/// the output vector: texts sharing substrings land mass in the same
/// buckets, while any edit moves mass elsewhere. The result is a unit
/// vector, so a query identical to an indexed chunk scores cosine
/// similarity 1.0.
pub struct MockEmbeddingGenerator;

impl MockEmbeddingGenerator {
    pub fn generate(text: &str, dimension: usize) -> Vec<f32> {
        let mut vec = vec![0.0; dimension];
        let bytes = text.as_bytes();
        if dimension == 0 || bytes.is_empty() {
            return vec;
        }

        // Texts shorter than a trigram hash as a single window.
        let window = bytes.len().min(3);
        for gram in bytes.windows(window) {
            vec[Self::bucket(gram, dimension)] += 1.0;
        }

        let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }

    /// FNV-1a over the gram bytes, reduced to a bucket index.
    fn bucket(gram: &[u8], dimension: usize) -> usize {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = FNV_OFFSET;
        for &byte in gram {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash as usize % dimension
    }
}
