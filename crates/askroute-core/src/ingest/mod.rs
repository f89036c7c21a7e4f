//! PDF ingestion pipeline
//!
//! Extracts per-page text, windows it into overlapping chunks, then
//! embeds and stores the chunks in rate-limited batches. Ingestion is
//! not atomic: a failing batch leaves earlier batches committed and
//! aborts the rest.

mod chunker;
mod pdf;
mod rate_limit;

pub use chunker::{chunk_text, Chunk, ChunkingConfig};
pub use pdf::extract_pages;
pub use rate_limit::{RateLimitConfig, RateLimiter, TokenBucket, Unlimited};

use crate::config::IngestSettings;
use crate::db::{hash_content, Database, EmbeddedChunk, Metric};
use crate::error::{AskRouteError, Result};
use crate::llm::Embedder;
use std::path::Path;

/// Ingestion options
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Target collection
    pub collection: String,
    /// Chunk window parameters
    pub chunking: ChunkingConfig,
    /// Chunks embedded and stored per batch
    pub batch_size: usize,
}

impl IngestOptions {
    pub fn from_settings(settings: &IngestSettings, collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            chunking: ChunkingConfig {
                chunk_size: settings.chunk_size,
                overlap: settings.chunk_overlap,
            },
            batch_size: settings.batch_size.max(1),
        }
    }
}

/// Per-batch progress report
#[derive(Debug, Clone)]
pub struct IngestProgress {
    /// 1-based batch index
    pub batch: usize,
    pub total_batches: usize,
    /// Chunks in this batch
    pub batch_chunks: usize,
    /// Chunks committed so far, this batch included
    pub committed_chunks: usize,
    pub total_chunks: usize,
}

/// Ingestion statistics
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    pub pages: usize,
    pub chunks: usize,
    pub batches: usize,
}

/// Progress callback type
pub type ProgressFn = Box<dyn Fn(IngestProgress) + Send + Sync>;

/// Ingest a PDF into the document store.
///
/// Chunks are appended without content deduplication: ingesting the same
/// file twice stores its chunks twice.
pub async fn ingest_pdf(
    db: &Database,
    embedder: &dyn Embedder,
    limiter: &dyn RateLimiter,
    options: &IngestOptions,
    path: &Path,
    progress: Option<ProgressFn>,
) -> Result<IngestStats> {
    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .unwrap_or_else(|| path.display().to_string());

    let pages = extract_pages(path)?;
    tracing::info!(source = %source, pages = pages.len(), "extracted PDF text");

    let mut chunks: Vec<Chunk> = Vec::new();
    for page in &pages {
        chunks.extend(chunk_text(page, options.chunking));
    }

    if chunks.is_empty() {
        return Err(AskRouteError::Parse(format!(
            "PDF {:?} produced no chunks",
            path
        )));
    }

    let stats = ingest_chunks(db, embedder, limiter, options, &source, chunks, progress).await?;

    Ok(IngestStats {
        pages: pages.len(),
        ..stats
    })
}

/// Embed and store pre-chunked text in rate-limited batches.
///
/// The limiter is consulted before every batch; a batch failure reports
/// the chunks committed so far and aborts the remainder.
pub async fn ingest_chunks(
    db: &Database,
    embedder: &dyn Embedder,
    limiter: &dyn RateLimiter,
    options: &IngestOptions,
    source: &str,
    chunks: Vec<Chunk>,
    progress: Option<ProgressFn>,
) -> Result<IngestStats> {
    db.ensure_collection(&options.collection, embedder.dimensions(), Metric::Cosine)?;

    let total_chunks = chunks.len();
    let batch_size = options.batch_size.max(1);
    let total_batches = total_chunks.div_ceil(batch_size);
    tracing::info!(
        total_chunks,
        total_batches,
        batch_size,
        "starting batched ingestion"
    );

    let mut committed = 0usize;
    let mut batches_done = 0usize;

    for (batch_idx, batch) in chunks.chunks(batch_size).enumerate() {
        limiter.acquire().await;
        tracing::debug!(batch = batch_idx + 1, total_batches, "processing batch");

        let result =
            embed_and_store(db, embedder, &options.collection, source, committed, batch).await;

        match result {
            Ok(stored) => {
                committed += stored;
                batches_done += 1;
            }
            Err(e) => {
                return Err(AskRouteError::IngestionPartial {
                    committed,
                    total: total_chunks,
                    source: Box::new(e),
                });
            }
        }

        if let Some(ref callback) = progress {
            callback(IngestProgress {
                batch: batch_idx + 1,
                total_batches,
                batch_chunks: batch.len(),
                committed_chunks: committed,
                total_chunks,
            });
        }
    }

    tracing::info!(committed, batches = batches_done, "ingestion complete");

    Ok(IngestStats {
        pages: 0,
        chunks: committed,
        batches: batches_done,
    })
}

async fn embed_and_store(
    db: &Database,
    embedder: &dyn Embedder,
    collection: &str,
    source: &str,
    seq_offset: usize,
    batch: &[Chunk],
) -> Result<usize> {
    let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    let embedded: Vec<EmbeddedChunk> = batch
        .iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (chunk, embedding))| EmbeddedChunk {
            source: source.to_string(),
            seq: (seq_offset + i) as u32,
            pos: chunk.position,
            content: chunk.text.clone(),
            content_hash: hash_content(&chunk.text),
            embedding,
        })
        .collect();

    db.insert_chunks(collection, &embedded)
}
