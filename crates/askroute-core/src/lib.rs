//! Askroute Core Library
//!
//! Routed question answering: classify a query, fetch context from either
//! a weather provider or a local vector store of PDF chunks, then
//! generate an answer grounded in that context.
//!
//! # Features
//! - LLM routing and structured extraction with closed-enum validation
//! - SQLite-backed vector store with cosine similarity search
//! - Rate-limited batched PDF ingestion
//! - Explicit per-query pipeline state machine

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod weather;

pub use config::{Config, IngestSettings, LlmConfig, PipelineSettings, StoreConfig, WeatherConfig};
pub use db::{CollectionInfo, Database, EmbeddedChunk, Metric, ScoredChunk, Store};
pub use error::{AskRouteError, Error, Result};
pub use ingest::{
    chunk_text, ingest_chunks, ingest_pdf, Chunk, ChunkingConfig, IngestOptions, IngestProgress,
    IngestStats, ProgressFn, RateLimitConfig, RateLimiter, TokenBucket, Unlimited,
};
pub use llm::{
    extract_city, route_query, ChatMessage, Embedder, HttpLlmClient, LLMClient, RouteDecision,
};
pub use pipeline::{
    retrieve, Pipeline, PipelineOptions, PipelineRun, PipelineState, RetrievedContext, Stage,
    StageEvent, NO_DOCUMENTS_SENTINEL,
};
pub use weather::{OpenWeatherMap, WeatherProvider};

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "askroute";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "askroute";
