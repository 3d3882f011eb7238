//! File-backed vector store.
//!
//! The flat entry list is rewritten as a JSON document after every
//! mutation. This is **not crash-safe** — a failure between mutation and
//! persist loses the write — and is intended for development and small
//! corpora, not production.

use std::path::{Path, PathBuf};

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

/// Vector store persisted as a single JSON document.
pub struct FileVectorStore {
    path: PathBuf,
    inner: RwLock<StoreInner>,
}

impl FileVectorStore {
    /// Open a store at `path`, loading existing entries if the file
    /// exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let bytes = tokio::fs::read(&path).await?;
            let entries: Vec<IndexEntry> = serde_json::from_slice(&bytes)?;
            let dimension = entries.first().map(|e| e.embedding.len());
            debug!(path = %path.display(), count = entries.len(), "loaded index file");
            StoreInner { entries, dimension }
        } else {
            StoreInner::default()
        };

        Ok(Self {
            path,
            inner: RwLock::new(inner),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &[IndexEntry]) -> Result<()> {
        let json = serde_json::to_vec(entries)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn upsert(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut inner = self.inner.write().await;
        for entry in &entries {
            match inner.dimension {
                None => inner.dimension = Some(entry.embedding.len()),
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
        scan::upsert_into(&mut inner.entries, entries);
        self.persist(&inner.entries).await
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
        self.persist(&inner.entries).await
    }

    async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.dimension = None;
        self.persist(&inner.entries).await
    }
}
