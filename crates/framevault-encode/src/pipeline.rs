//! Document encoding pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tempfile::TempDir;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use framevault_core::logging;
use framevault_core::{
    ArchiveStats, CancelToken, Chunk, EmbeddingBackend, EncodingConfig, Error, IndexEntry,
    Result, SlidingWindowChunker, VectorStore, META_END_OFFSET, META_START_OFFSET,
    META_VIDEO_FPS, META_VIDEO_PATH,
};
use framevault_qr::QrRasterizer;
use framevault_video::{count_frames, frame_file_name, mux_frames, probe_duration, MuxOptions};

/// Summary of one successfully encoded document.
#[derive(Debug, Clone)]
pub struct EncodedDocument {
    pub document_id: String,
    pub chunk_count: usize,
    pub video_path: PathBuf,
}

/// One input to `add_documents_batch`.
#[derive(Debug, Clone)]
pub struct BatchDocument {
    pub document_id: String,
    pub text: String,
    pub video_path: PathBuf,
}

/// Per-chunk artifacts produced by the fan-out stage, reassembled in
/// chunk-index order before muxing.
struct ChunkArtifacts {
    chunk: Chunk,
    png: Vec<u8>,
    embedding: Vec<f32>,
}

/// Encodes documents into (MP4, index entries) pairs.
pub struct DocumentEncoder {
    embedder: Arc<dyn EmbeddingBackend>,
    store: Arc<dyn VectorStore>,
    config: EncodingConfig,
    chunker: SlidingWindowChunker,
    rasterizer: QrRasterizer,
}

impl DocumentEncoder {
    pub fn new(
        embedder: Arc<dyn EmbeddingBackend>,
        store: Arc<dyn VectorStore>,
        config: EncodingConfig,
    ) -> Result<Self> {
        config.validate()?;
        let chunker = SlidingWindowChunker::from_config(&config)?;
        let rasterizer = QrRasterizer::new(config.error_correction, config.video_resolution)?;
        Ok(Self {
            embedder,
            store,
            config,
            chunker,
            rasterizer,
        })
    }

    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    /// Encode one document: chunk, rasterize+embed, mux, then index.
    ///
    /// Empty text fails with `EmptyDocument` before any side effect; no
    /// artifact is written and the index is not touched.
    pub async fn add_document(
        &self,
        document_id: &str,
        text: &str,
        video_path: &Path,
    ) -> Result<EncodedDocument> {
        self.add_document_cancellable(document_id, text, video_path, &CancelToken::new())
            .await
    }

    /// Encode one document, honoring `cancel` at every suspension point.
    ///
    /// Cancellation cleans up the scratch directory and leaves the index
    /// untouched; a cancelled encode never half-publishes.
    pub async fn add_document_cancellable(
        &self,
        document_id: &str,
        text: &str,
        video_path: &Path,
        cancel: &CancelToken,
    ) -> Result<EncodedDocument> {
        if text.is_empty() {
            return Err(Error::EmptyDocument(document_id.to_string()));
        }
        cancel.check()?;

        let started = Instant::now();
        let chunks = self.chunker.chunk(text);
        let chunk_count = chunks.len();
        debug!(
            { logging::DOCUMENT_ID } = document_id,
            { logging::CHUNK_COUNT } = chunk_count,
            "chunked document"
        );

        let artifacts = self.rasterize_and_embed(chunks, cancel).await?;
        cancel.check()?;

        // Scratch directory is removed on every exit path by Drop.
        let scratch = TempDir::new()?;
        for artifact in &artifacts {
            let name = frame_file_name(artifact.chunk.index, chunk_count);
            tokio::fs::write(scratch.path().join(name), &artifact.png).await?;
        }
        cancel.check()?;

        let options = MuxOptions {
            fps: self.config.video_fps,
            resolution: self.config.video_resolution,
            ..MuxOptions::default()
        };
        mux_frames(scratch.path(), chunk_count, &options, video_path).await?;
        cancel.check()?;

        // Mux strictly precedes indexing: entries must never exist for
        // frames that were not written.
        let entries = self.build_entries(document_id, video_path, &artifacts);
        self.store.upsert(entries).await?;

        info!(
            { logging::DOCUMENT_ID } = document_id,
            { logging::CHUNK_COUNT } = chunk_count,
            { logging::DURATION_MS } = started.elapsed().as_millis() as u64,
            { logging::VIDEO_PATH } = %video_path.display(),
            "document encoded"
        );

        Ok(EncodedDocument {
            document_id: document_id.to_string(),
            chunk_count,
            video_path: video_path.to_path_buf(),
        })
    }

    /// Encode a batch of documents sequentially.
    ///
    /// Documents are processed strictly in order so that at most one
    /// scratch directory exists at a time; the first failure aborts the
    /// remainder and is returned.
    pub async fn add_documents_batch(
        &self,
        documents: &[BatchDocument],
    ) -> Result<Vec<EncodedDocument>> {
        let mut encoded = Vec::with_capacity(documents.len());
        for doc in documents {
            encoded.push(
                self.add_document(&doc.document_id, &doc.text, &doc.video_path)
                    .await?,
            );
        }
        Ok(encoded)
    }

    /// Remove a document: its index entries and its artifact.
    pub async fn remove_document(&self, document_id: &str, video_path: &Path) -> Result<()> {
        self.store.delete_document(document_id).await?;
        if video_path.exists() {
            tokio::fs::remove_file(video_path).await?;
        }
        Ok(())
    }

    /// Probe the artifact and re-chunk the source to produce stats.
    pub async fn stats(&self, text: &str, video_path: &Path) -> Result<ArchiveStats> {
        if !video_path.exists() {
            return Err(Error::VideoNotFound(video_path.to_path_buf()));
        }

        let total_chunks = self.chunker.chunk(text).len();
        let total_frames = count_frames(video_path).await?;
        let duration_seconds = probe_duration(video_path).await?;
        let video_size_bytes = tokio::fs::metadata(video_path).await?.len();
        let original_size_bytes = text.len() as u64;
        let compression_ratio = if video_size_bytes > 0 {
            original_size_bytes as f64 / video_size_bytes as f64
        } else {
            0.0
        };

        Ok(ArchiveStats {
            total_chunks,
            total_frames,
            video_size_bytes,
            original_size_bytes,
            compression_ratio,
            duration_seconds,
        })
    }

    /// Bounded-parallel rasterize+embed fan-out, reassembled by index.
    async fn rasterize_and_embed(
        &self,
        chunks: Vec<Chunk>,
        cancel: &CancelToken,
    ) -> Result<Vec<ChunkArtifacts>> {
        let chunk_count = chunks.len();
        let semaphore = Arc::new(Semaphore::new(self.config.effective_parallelism()));
        let mut tasks: JoinSet<Result<ChunkArtifacts>> = JoinSet::new();

        for chunk in chunks {
            cancel.check()?;
            let semaphore = semaphore.clone();
            let embedder = self.embedder.clone();
            let rasterizer = self.rasterizer.clone();
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| Error::Internal("encode semaphore closed".to_string()))?;
                cancel.check()?;

                let png = rasterizer.rasterize(&chunk.text, chunk.index as u32)?;
                let embedding = embedder.embed(&chunk.text).await?;
                Ok(ChunkArtifacts {
                    chunk,
                    png,
                    embedding,
                })
            });
        }

        let mut slots: Vec<Option<ChunkArtifacts>> = Vec::new();
        slots.resize_with(chunk_count, || None);

        while let Some(joined) = tasks.join_next().await {
            let artifact = joined
                .map_err(|e| Error::Internal(format!("encode task panicked: {}", e)))??;
            let index = artifact.chunk.index;
            slots[index] = Some(artifact);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    Error::Internal(format!("missing artifacts for chunk {}", index))
                })
            })
            .collect()
    }

    fn build_entries(
        &self,
        document_id: &str,
        video_path: &Path,
        artifacts: &[ChunkArtifacts],
    ) -> Vec<IndexEntry> {
        let video_path_str = video_path.to_string_lossy().to_string();
        artifacts
            .iter()
            .map(|artifact| {
                let frame_number = artifact.chunk.index as u32;
                let mut entry = IndexEntry::new(
                    document_id,
                    frame_number,
                    artifact.chunk.text.clone(),
                    artifact.embedding.clone(),
                )
                .with_metadata(META_START_OFFSET, artifact.chunk.start_offset.to_string())
                .with_metadata(META_END_OFFSET, artifact.chunk.end_offset.to_string())
                .with_metadata(META_VIDEO_PATH, video_path_str.clone());

                if frame_number == 0 {
                    entry = entry.with_metadata(META_VIDEO_FPS, self.config.video_fps.to_string());
                }
                entry
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NullEmbedder;

    #[async_trait]
    impl EmbeddingBackend for NullEmbedder {
        async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.0; 4]).collect())
        }
        fn dimension(&self) -> usize {
            4
        }
        fn model_name(&self) -> &str {
            "null"
        }
        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    struct NullStore;

    #[async_trait]
    impl VectorStore for NullStore {
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

    #[test]
    fn test_constructor_rejects_invalid_config() {
        let config = EncodingConfig::default().with_chunking(100, 100);
        let result = DocumentEncoder::new(Arc::new(NullEmbedder), Arc::new(NullStore), config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_entries_carry_offsets_and_fps_on_frame_zero() {
        let encoder = DocumentEncoder::new(
            Arc::new(NullEmbedder),
            Arc::new(NullStore),
            EncodingConfig::default().with_chunking(10, 2),
        )
        .unwrap();

        let chunks = encoder.chunker.chunk("ABCDEFGHIJKLMNOPQR");
        let artifacts: Vec<ChunkArtifacts> = chunks
            .into_iter()
            .map(|chunk| ChunkArtifacts {
                chunk,
                png: Vec::new(),
                embedding: vec![0.0; 4],
            })
            .collect();

        let entries = encoder.build_entries("doc", Path::new("/tmp/doc.mp4"), &artifacts);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].metadata.get(META_VIDEO_FPS).unwrap(), "1");
        assert!(!entries[1].metadata.contains_key(META_VIDEO_FPS));
        assert_eq!(entries[1].metadata.get(META_START_OFFSET).unwrap(), "8");
        assert_eq!(
            entries[2].metadata.get(META_VIDEO_PATH).unwrap(),
            "/tmp/doc.mp4"
        );
    }
}
