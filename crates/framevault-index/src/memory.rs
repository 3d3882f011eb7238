//! In-memory vector store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use framevault_core::{Error, IndexEntry, Result, VectorStore};

use crate::scan;

#[derive(Default)]
struct StoreInner {
    entries: Vec<IndexEntry>,
    dimension: Option<usize>,
}

/// Flat-list vector store with a linear-scan search.
///
/// The reference backend: every other backend must be observationally
/// equivalent to this one on the shared contract.
#[derive(Default)]
pub struct MemoryVectorStore {
    inner: RwLock<StoreInner>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimension locked in by the first upsert, if any.
    pub async fn dimension(&self) -> Option<usize> {
        self.inner.read().await.dimension
    }
}

/// Check that every incoming embedding matches the store's dimension,
/// locking it on first write.
fn check_dimensions(dimension: &mut Option<usize>, entries: &[IndexEntry]) -> Result<()> {
    for entry in entries {
        match *dimension {
            None => *dimension = Some(entry.embedding.len()),
            Some(expected) if entry.embedding.len() != expected => {
                return Err(Error::InvalidInput(format!(
                    "embedding dimension {} does not match store dimension {}",
                    entry.embedding.len(),
                    expected
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut inner = self.inner.write().await;
        check_dimensions(&mut inner.dimension, &entries)?;
        let incoming = entries.len();
        scan::upsert_into(&mut inner.entries, entries);
        debug!(incoming, total = inner.entries.len(), "upserted entries");
        Ok(())
    }

    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<IndexEntry>> {
        let inner = self.inner.read().await;
        Ok(scan::rank(&inner.entries, query, k))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.entries.len())
    }

    async fn delete_document(&self, document_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.entries.retain(|e| e.document_id != document_id);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.dimension = None;
        Ok(())
    }
}
