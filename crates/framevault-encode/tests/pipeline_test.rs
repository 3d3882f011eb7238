//! Encode pipeline tests over the mock embedder and in-memory store.
//!
//! Tests that publish an actual MP4 probe for ffmpeg first and skip when
//! the toolchain is absent; everything that fails before muxing runs
//! everywhere.

use std::collections::HashSet;
use std::sync::Arc;

use framevault_core::{
    CancelToken, EmbeddingBackend, EncodingConfig, Error, QrEcLevel, VectorStore, META_VIDEO_FPS,
};
use framevault_embed::MockEmbedder;
use framevault_encode::{BatchDocument, DocumentEncoder};
use framevault_index::MemoryVectorStore;
use framevault_video::{count_frames, ffmpeg_available, ffprobe_available};

fn encoder_with(
    config: EncodingConfig,
) -> (DocumentEncoder, Arc<MockEmbedder>, Arc<MemoryVectorStore>) {
    let embedder = Arc::new(MockEmbedder::with_dimension(64));
    let store = Arc::new(MemoryVectorStore::new());
    let encoder = DocumentEncoder::new(embedder.clone(), store.clone(), config).unwrap();
    (encoder, embedder, store)
}

#[tokio::test]
async fn test_empty_document_rejected_before_any_side_effect() {
    let (encoder, embedder, store) = encoder_with(EncodingConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("empty.mp4");

    let result = encoder.add_document("doc-empty", "", &video).await;

    assert!(matches!(result, Err(Error::EmptyDocument(_))));
    assert!(!video.exists());
    assert_eq!(store.count().await.unwrap(), 0);
    assert_eq!(embedder.embed_call_count(), 0);
}

#[tokio::test]
async fn test_oversized_chunk_fails_before_mp4_exists() {
    // A 5000-char chunk exceeds a single QR symbol at level H.
    let config = EncodingConfig::default()
        .with_chunking(5000, 50)
        .with_error_correction(QrEcLevel::H);
    let (encoder, _embedder, store) = encoder_with(config);
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("oversized.mp4");

    let text = "z".repeat(5000);
    let result = encoder.add_document("doc-big", &text, &video).await;

    assert!(matches!(result, Err(Error::PayloadTooLarge { .. })));
    assert!(!video.exists(), "no MP4 may be written on rasterize failure");
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_embedder_failure_propagates_and_store_untouched() {
    let (encoder, embedder, store) = encoder_with(EncodingConfig::default());
    embedder.set_failing(true);
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("fail.mp4");

    let result = encoder.add_document("doc-fail", "some text", &video).await;

    assert!(matches!(result, Err(Error::Embedding(_))));
    assert!(!video.exists());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_cancelled_encode_leaves_index_untouched() {
    let (encoder, _embedder, store) = encoder_with(EncodingConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("cancelled.mp4");

    let cancel = CancelToken::new();
    cancel.cancel();
    let result = encoder
        .add_document_cancellable("doc-cancel", "some text", &video, &cancel)
        .await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(!video.exists());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_add_document_round_trip_indexes_every_frame() {
    if !ffmpeg_available().await || !ffprobe_available().await {
        eprintln!("ffmpeg/ffprobe not installed, skipping");
        return;
    }

    let config = EncodingConfig::default().with_chunking(10, 2);
    let (encoder, embedder, store) = encoder_with(config);
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("corpus.mp4");

    let text = "ABCDEFGHIJKLMNOPQR";
    let encoded = encoder.add_document("doc-s1", text, &video).await.unwrap();

    assert_eq!(encoded.chunk_count, 3);
    assert!(video.exists());
    assert_eq!(count_frames(&video).await.unwrap(), 3);

    // Frame-index bijection: stored frame numbers are exactly {0, 1, 2}.
    assert_eq!(store.count().await.unwrap(), 3);
    let query = embedder.embed("ABCDEFGHIJ").await.unwrap();
    let hits = store.search(&query, 10).await.unwrap();
    let frames: HashSet<u32> = hits.iter().map(|h| h.frame_number).collect();
    assert_eq!(frames, HashSet::from([0, 1, 2]));

    // fps persisted on the frame-0 entry only.
    for hit in &hits {
        let has_fps = hit.metadata.contains_key(META_VIDEO_FPS);
        assert_eq!(has_fps, hit.frame_number == 0);
    }
}

#[tokio::test]
async fn test_reencode_does_not_double_entries() {
    if !ffmpeg_available().await || !ffprobe_available().await {
        eprintln!("ffmpeg/ffprobe not installed, skipping");
        return;
    }

    let config = EncodingConfig::default().with_chunking(10, 2);
    let (encoder, _embedder, store) = encoder_with(config);
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("twice.mp4");

    let text = "ABCDEFGHIJKLMNOPQR";
    encoder.add_document("doc-twice", text, &video).await.unwrap();
    encoder.add_document("doc-twice", text, &video).await.unwrap();

    assert_eq!(store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_batch_is_sequential_and_complete() {
    if !ffmpeg_available().await || !ffprobe_available().await {
        eprintln!("ffmpeg/ffprobe not installed, skipping");
        return;
    }

    let (encoder, _embedder, store) = encoder_with(EncodingConfig::default());
    let dir = tempfile::tempdir().unwrap();

    let documents = vec![
        BatchDocument {
            document_id: "batch-a".to_string(),
            text: "first document about storage engines".to_string(),
            video_path: dir.path().join("a.mp4"),
        },
        BatchDocument {
            document_id: "batch-b".to_string(),
            text: "second document about retrieval".to_string(),
            video_path: dir.path().join("b.mp4"),
        },
    ];

    let encoded = encoder.add_documents_batch(&documents).await.unwrap();
    assert_eq!(encoded.len(), 2);
    assert!(dir.path().join("a.mp4").exists());
    assert!(dir.path().join("b.mp4").exists());
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_stats_reports_probe_and_chunker_agreement() {
    if !ffmpeg_available().await || !ffprobe_available().await {
        eprintln!("ffmpeg/ffprobe not installed, skipping");
        return;
    }

    let config = EncodingConfig::default().with_chunking(20, 5);
    let (encoder, _embedder, _store) = encoder_with(config);
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("stats.mp4");

    let text = "stats text long enough to produce several chunks here";
    encoder.add_document("doc-stats", text, &video).await.unwrap();

    let stats = encoder.stats(text, &video).await.unwrap();
    assert_eq!(stats.total_frames, stats.total_chunks as u64);
    assert_eq!(stats.original_size_bytes, text.len() as u64);
    assert!(stats.video_size_bytes > 0);
    assert!(stats.duration_seconds > 0.0);
}

#[tokio::test]
async fn test_stats_on_missing_video_fails_up_front() {
    let (encoder, _embedder, _store) = encoder_with(EncodingConfig::default());
    let result = encoder
        .stats("text", std::path::Path::new("/nonexistent/video.mp4"))
        .await;
    assert!(matches!(result, Err(Error::VideoNotFound(_))));
}

#[tokio::test]
async fn test_remove_document_deletes_entries_and_artifact() {
    if !ffmpeg_available().await || !ffprobe_available().await {
        eprintln!("ffmpeg/ffprobe not installed, skipping");
        return;
    }

    let (encoder, _embedder, store) = encoder_with(EncodingConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("removed.mp4");

    encoder
        .add_document("doc-rm", "a document that will be removed", &video)
        .await
        .unwrap();
    assert!(video.exists());

    encoder.remove_document("doc-rm", &video).await.unwrap();
    assert!(!video.exists());
    assert_eq!(store.count().await.unwrap(), 0);
}
