//! Ingestion pipeline tests: batching, pacing, partial failure, and the
//! store round trip

mod common;

use askroute_core::{
    ingest_chunks, AskRouteError, Chunk, ChunkingConfig, Database, IngestOptions, Unlimited,
};
use common::{vector_for, CountingLimiter, MockEmbedder};
use std::sync::{Arc, Mutex};

const DIMS: usize = 8;

fn test_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.initialize().unwrap();
    db
}

fn options(batch_size: usize) -> IngestOptions {
    IngestOptions {
        collection: "docs".to_string(),
        chunking: ChunkingConfig::default(),
        batch_size,
    }
}

fn make_chunks(n: usize) -> Vec<Chunk> {
    (0..n)
        .map(|i| Chunk {
            text: format!("chunk number {} with some body text", i),
            position: i * 100,
        })
        .collect()
}

#[tokio::test]
async fn twelve_chunks_at_batch_five_issue_three_batches() {
    let db = test_db();
    let embedder = MockEmbedder::new(DIMS);
    let limiter = CountingLimiter::new();

    let observed: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let observed_in_cb = Arc::clone(&observed);

    let stats = ingest_chunks(
        &db,
        &embedder,
        &limiter,
        &options(5),
        "report.pdf",
        make_chunks(12),
        Some(Box::new(move |p| {
            observed_in_cb.lock().unwrap().push(p.batch_chunks);
        })),
    )
    .await
    .unwrap();

    assert_eq!(stats.chunks, 12);
    assert_eq!(stats.batches, 3);
    assert_eq!(*observed.lock().unwrap(), vec![5, 5, 2]);
    assert_eq!(*embedder.batch_sizes.lock().unwrap(), vec![5, 5, 2]);
    // The limiter is consulted before every batch
    assert_eq!(limiter.count(), 3);
    assert_eq!(db.count_chunks("docs").unwrap(), 12);
}

#[tokio::test]
async fn mid_ingestion_failure_keeps_committed_batches() {
    let db = test_db();
    let embedder = MockEmbedder::failing_on_batch(DIMS, 2);
    let limiter = Unlimited;

    let err = ingest_chunks(
        &db,
        &embedder,
        &limiter,
        &options(5),
        "report.pdf",
        make_chunks(12),
        None,
    )
    .await
    .unwrap_err();

    match err {
        AskRouteError::IngestionPartial {
            committed, total, ..
        } => {
            assert_eq!(committed, 5);
            assert_eq!(total, 12);
        }
        other => panic!("expected IngestionPartial, got {:?}", other),
    }

    // The first batch stays committed; nothing after the failure lands
    assert_eq!(db.count_chunks("docs").unwrap(), 5);
}

#[tokio::test]
async fn reingest_doubles_chunk_count() {
    let db = test_db();
    let embedder = MockEmbedder::new(DIMS);
    let limiter = Unlimited;

    for _ in 0..2 {
        ingest_chunks(
            &db,
            &embedder,
            &limiter,
            &options(5),
            "report.pdf",
            make_chunks(7),
            None,
        )
        .await
        .unwrap();
    }

    assert_eq!(db.count_chunks("docs").unwrap(), 14);
}

#[tokio::test]
async fn stored_chunk_is_rank_one_for_its_own_embedding() {
    let db = test_db();
    let embedder = MockEmbedder::new(DIMS);
    let limiter = Unlimited;

    let chunks = make_chunks(9);
    let probe_text = chunks[4].text.clone();

    ingest_chunks(
        &db,
        &embedder,
        &limiter,
        &options(3),
        "report.pdf",
        chunks,
        None,
    )
    .await
    .unwrap();

    let probe = vector_for(&probe_text, DIMS);
    let results = db.query_nearest("docs", &probe, 3).unwrap();

    assert_eq!(results[0].content, probe_text);
    assert!((results[0].score - 1.0).abs() < 0.0001);
    for r in &results[1..] {
        assert!(r.score < results[0].score);
    }
}

#[tokio::test]
async fn ingestion_creates_collection_lazily() {
    let db = test_db();
    let embedder = MockEmbedder::new(DIMS);
    let limiter = Unlimited;

    assert!(db.get_collection("docs").unwrap().is_none());

    ingest_chunks(
        &db,
        &embedder,
        &limiter,
        &options(5),
        "report.pdf",
        make_chunks(3),
        None,
    )
    .await
    .unwrap();

    let info = db.get_collection("docs").unwrap().unwrap();
    assert_eq!(info.dimensions, DIMS);
}
