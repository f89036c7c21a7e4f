//! Configuration management

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM service configuration (chat completion + embeddings)
    #[serde(default)]
    pub llm: LlmConfig,

    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Ingestion settings
    #[serde(default)]
    pub ingest: IngestSettings,

    /// Pipeline settings
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

/// LLM service configuration for external inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the LLM service for chat/completions
    pub url: String,

    /// Model name for chat completions (routing, extraction, generation)
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Base URL for embeddings service (can be different from LLM URL)
    #[serde(default)]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding dimensions
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,

    /// API key (optional, for authenticated services)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Get the embeddings URL (falls back to main URL if not specified)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("ASKROUTE_LLM_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            model: default_chat_model(),
            embedding_url: std::env::var("ASKROUTE_EMBEDDING_URL").ok(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: std::env::var("ASKROUTE_EMBEDDING_DIMS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_embedding_dimensions),
            api_key: std::env::var("ASKROUTE_LLM_API_KEY").ok(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_chat_model() -> String {
    std::env::var("ASKROUTE_LLM_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string())
}

fn default_embedding_model() -> String {
    std::env::var("ASKROUTE_EMBEDDING_MODEL")
        .unwrap_or_else(|_| "text-embedding-004".to_string())
}

fn default_embedding_dimensions() -> usize {
    768
}

fn default_timeout() -> u64 {
    30
}

/// Weather provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the weather endpoint
    #[serde(default = "default_weather_url")]
    pub url: String,

    /// API key for the weather provider
    #[serde(default)]
    pub api_key: Option<String>,

    /// Measurement units passed to the provider
    #[serde(default = "default_units")]
    pub units: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            url: default_weather_url(),
            api_key: std::env::var("ASKROUTE_WEATHER_API_KEY")
                .or_else(|_| std::env::var("OPENWEATHERMAP_API_KEY"))
                .ok(),
            units: default_units(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_weather_url() -> String {
    std::env::var("ASKROUTE_WEATHER_URL")
        .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5/weather".to_string())
}

fn default_units() -> String {
    "metric".to_string()
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the on-disk store (defaults to the cache directory)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Active collection name
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: std::env::var("ASKROUTE_DB").ok().map(PathBuf::from),
            collection: std::env::var("ASKROUTE_COLLECTION")
                .unwrap_or_else(|_| default_collection()),
        }
    }
}

fn default_collection() -> String {
    "docs".to_string()
}

impl StoreConfig {
    /// Resolve the store path, falling back to the default location
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_store_path)
    }
}

/// Default on-disk store location
pub fn default_store_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(crate::CACHE_DIR_NAME)
        .join("store.sqlite")
}

/// Ingestion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSettings {
    /// Chunk window size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Chunks embedded and stored per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Sustained batch rate allowed against the embedding service
    #[serde(default = "default_batches_per_second")]
    pub batches_per_second: f64,

    /// Directory where uploaded PDFs are stored, keyed by filename
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            batch_size: default_batch_size(),
            batches_per_second: default_batches_per_second(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_batch_size() -> usize {
    5
}

// One batch per two seconds keeps the free-tier embedding API under its
// request limit.
fn default_batches_per_second() -> f64 {
    0.5
}

fn default_data_dir() -> PathBuf {
    std::env::var("ASKROUTE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"))
}

/// Pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Number of nearest chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    10
}

impl Config {
    /// Load config from default path, falling back to env-driven defaults
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Re-read configuration from disk and environment.
    ///
    /// Used by the chat reset action after the environment has been
    /// reloaded, so changed credentials take effect without a restart.
    pub fn reload() -> Result<Self> {
        Self::load()
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}
