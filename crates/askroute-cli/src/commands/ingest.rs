//! Ingest command
//!
//! Copies the PDF under the configured data directory keyed by its
//! filename (overwriting any same-named upload), then runs the batched
//! ingestion pipeline with progress output.

use crate::app::IngestArgs;
use anyhow::{bail, Context, Result};
use askroute_core::{
    ingest_pdf, Config, HttpLlmClient, IngestOptions, IngestProgress, RateLimitConfig, Store,
    TokenBucket,
};

pub async fn run(args: IngestArgs, store: &Store, config: &Config) -> Result<()> {
    if !args.path.exists() {
        bail!("PDF not found at {}", args.path.display());
    }

    let filename = args
        .path
        .file_name()
        .context("path has no filename")?
        .to_owned();

    // Store the upload under the data directory, keyed by filename
    std::fs::create_dir_all(&config.ingest.data_dir)?;
    let stored_path = config.ingest.data_dir.join(&filename);
    if stored_path != args.path {
        std::fs::copy(&args.path, &stored_path)
            .with_context(|| format!("copying upload to {}", stored_path.display()))?;
    }

    let collection = args
        .collection
        .unwrap_or_else(|| config.store.collection.clone());

    let embedder = HttpLlmClient::new(config.llm.clone())?;
    let limiter = TokenBucket::new(RateLimitConfig {
        requests_per_second: config.ingest.batches_per_second,
        burst_size: 1,
    });
    let options = IngestOptions::from_settings(&config.ingest, collection);

    println!("Ingesting {}...", stored_path.display());

    let db = store.lock();
    let stats = ingest_pdf(
        &db,
        &embedder,
        &limiter,
        &options,
        &stored_path,
        Some(Box::new(|progress: IngestProgress| {
            eprint!(
                "\rBatch {}/{} ({}/{} chunks)   ",
                progress.batch,
                progress.total_batches,
                progress.committed_chunks,
                progress.total_chunks
            );
        })),
    )
    .await?;

    eprintln!();
    println!(
        "Ingestion complete: {} pages, {} chunks in {} batches.",
        stats.pages, stats.chunks, stats.batches
    );

    Ok(())
}
