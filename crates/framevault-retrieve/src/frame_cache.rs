//! Bounded LRU cache for decoded frame text.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::Mutex;

use framevault_core::{defaults, Error, Result};

type CacheKey = (PathBuf, u32);

/// Cache observability snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
}

/// Per-retriever LRU mapping `(video_path, frame_number)` to decoded
/// chunk text.
///
/// Shared behind a mutex so concurrent searches on one retriever
/// synchronize access; the cache is never global.
#[derive(Clone)]
pub struct FrameCache {
    inner: Arc<Mutex<LruCache<CacheKey, String>>>,
    capacity: usize,
}

impl FrameCache {
    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(defaults::FRAME_CACHE_SIZE)
            .expect("default frame cache capacity is non-zero")
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity_nz = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::Config("max_cache_size must be positive".to_string()))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity_nz))),
            capacity,
        })
    }

    pub async fn get(&self, video_path: &Path, frame_number: u32) -> Option<String> {
        let mut cache = self.inner.lock().await;
        cache.get(&(video_path.to_path_buf(), frame_number)).cloned()
    }

    pub async fn put(&self, video_path: PathBuf, frame_number: u32, text: String) {
        let mut cache = self.inner.lock().await;
        cache.put((video_path, frame_number), text);
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.inner.lock().await.len(),
            capacity: self.capacity,
        }
    }
}

impl Default for FrameCache {
    fn default() -> Self {
        Self::new()
    }
}
