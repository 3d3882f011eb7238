//! Query-to-results retrieval over an encoded artifact.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use framevault_core::logging;
use framevault_core::{
    CancelToken, EmbeddingBackend, Error, FrameExtractor, IndexEntry, Result, RetrieverConfig,
    SearchResult, VectorStore, META_VIDEO_PATH,
};
use framevault_qr::decode_png;
use framevault_video::FfmpegFrameExtractor;

use crate::frame_cache::{CacheStats, FrameCache};

/// Answers semantic queries against encoded artifacts.
///
/// Hits stream out in similarity order: the index lookup happens first,
/// then frames are extracted hit by hit, so a caller consuming the Vec
/// front-to-back observes the best matches earliest.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingBackend>,
    store: Arc<dyn VectorStore>,
    extractor: Arc<dyn FrameExtractor>,
    cache: FrameCache,
    config: RetrieverConfig,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingBackend>,
        store: Arc<dyn VectorStore>,
        extractor: Arc<dyn FrameExtractor>,
        config: RetrieverConfig,
    ) -> Result<Self> {
        config.validate()?;
        let cache = FrameCache::with_capacity(config.max_cache_size)?;
        Ok(Self {
            embedder,
            store,
            extractor,
            cache,
            config,
        })
    }

    /// Construct with the production ffmpeg frame extractor.
    pub fn with_ffmpeg(
        embedder: Arc<dyn EmbeddingBackend>,
        store: Arc<dyn VectorStore>,
        config: RetrieverConfig,
    ) -> Result<Self> {
        Self::new(
            embedder,
            store,
            Arc::new(FfmpegFrameExtractor::new()),
            config,
        )
    }

    /// Top-k semantic search against one artifact.
    pub async fn search(
        &self,
        query: &str,
        video_path: &Path,
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        self.search_cancellable(query, video_path, k, &CancelToken::new())
            .await
    }

    /// Top-k semantic search honoring `cancel` at every suspension point.
    ///
    /// An extraction already under way when cancellation lands completes
    /// and populates the cache for future searches; its result is not
    /// returned.
    pub async fn search_cancellable(
        &self,
        query: &str,
        video_path: &Path,
        k: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<SearchResult>> {
        if !video_path.exists() {
            return Err(Error::VideoNotFound(video_path.to_path_buf()));
        }
        cancel.check()?;

        let started = Instant::now();
        let query_vec = self.embedder.embed(query).await?;
        cancel.check()?;

        let hits = self.store.search(&query_vec, k).await?;
        debug!(
            { logging::QUERY } = query,
            hit_count = hits.len(),
            { logging::VIDEO_PATH } = %video_path.display(),
            "index search complete"
        );

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            // Entries that record their artifact belong only to it; a hit
            // from another video is another path's result.
            if let Some(recorded) = hit.metadata.get(META_VIDEO_PATH) {
                if Path::new(recorded) != video_path {
                    trace!(
                        { logging::FRAME_NUMBER } = hit.frame_number,
                        recorded = %recorded,
                        "skipping hit from another artifact"
                    );
                    continue;
                }
            }
            cancel.check()?;

            match self.resolve_hit(video_path, &hit).await? {
                Some(text) => {
                    if text != hit.chunk_text {
                        // The stored chunk text is authoritative; a codec
                        // that mangles a frame this far is worth flagging.
                        warn!(
                            { logging::FRAME_NUMBER } = hit.frame_number,
                            { logging::DOCUMENT_ID } = %hit.document_id,
                            "decoded frame text differs from stored chunk text"
                        );
                    }
                    results.push(SearchResult {
                        chunk_text: text,
                        similarity: hit.similarity.unwrap_or(0.0),
                        frame_number: hit.frame_number,
                        document_id: hit.document_id,
                        metadata: hit.metadata,
                    });
                }
                None => continue,
            }
        }

        info!(
            { logging::QUERY } = query,
            { logging::RESULT_COUNT } = results.len(),
            { logging::DURATION_MS } = started.elapsed().as_millis() as u64,
            "search complete"
        );
        Ok(results)
    }

    /// Search several artifacts and merge by descending similarity.
    ///
    /// Each path contributes up to `k` hits; this is a concatenation and
    /// re-sort, not a global top-k.
    pub async fn search_multiple(
        &self,
        query: &str,
        video_paths: &[&Path],
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let mut merged = Vec::new();
        for path in video_paths {
            merged.extend(self.search(query, path, k).await?);
        }
        // Stable sort keeps path order among equal scores.
        merged.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(merged)
    }

    /// Decoded text for one hit: cache, or extract+decode+fill.
    ///
    /// Per-frame failures are absorbed — one bad frame must not break a
    /// top-k query — except a missing encoder binary, which is
    /// environmental and fails the search. Absorbed failures log at WARN
    /// when verbose, TRACE otherwise.
    async fn resolve_hit(&self, video_path: &Path, hit: &IndexEntry) -> Result<Option<String>> {
        let path_buf = video_path.to_path_buf();
        if let Some(text) = self.cache.get(&path_buf, hit.frame_number).await {
            trace!(
                { logging::FRAME_NUMBER } = hit.frame_number,
                { logging::CACHE_HIT } = true,
                "frame resolved"
            );
            return Ok(Some(text));
        }

        match self.decode_frame(video_path, hit.frame_number).await {
            Ok(text) => {
                self.cache
                    .put(path_buf, hit.frame_number, text.clone())
                    .await;
                Ok(Some(text))
            }
            // A missing encoder binary is environmental, not a property
            // of this frame; it fails the whole search.
            Err(e @ Error::EncoderNotFound(_)) => Err(e),
            Err(e) => {
                if self.config.verbose {
                    warn!(
                        { logging::FRAME_NUMBER } = hit.frame_number,
                        { logging::ERROR_MSG } = %e,
                        "dropping hit: frame extraction or decode failed"
                    );
                } else {
                    trace!(
                        { logging::FRAME_NUMBER } = hit.frame_number,
                        { logging::ERROR_MSG } = %e,
                        "dropping hit: frame extraction or decode failed"
                    );
                }
                Ok(None)
            }
        }
    }

    async fn decode_frame(&self, video_path: &Path, frame_number: u32) -> Result<String> {
        let png = self
            .extractor
            .extract(video_path, frame_number)
            .await
            .map_err(|e| match e {
                Error::EncoderNotFound(_) | Error::FrameDecode(_) => e,
                other => Error::FrameDecode(other.to_string()),
            })?;
        decode_png(&png)
    }

    /// Snapshot of the frame cache for observability.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Drop all cached frame decodes.
    pub async fn clear_cache(&self) {
        self.cache.clear().await
    }
}
