//! Error types for askroute

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using AskRouteError
pub type Result<T> = std::result::Result<T, AskRouteError>;

/// Error type alias for convenience
pub type Error = AskRouteError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for askroute
#[derive(Debug, Error)]
pub enum AskRouteError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Unknown route label: {0:?}")]
    Routing(String),

    #[error("No city found in query: {0:?}")]
    NoCityFound(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Vector dimension mismatch in collection {collection}: expected {expected}, got {actual}")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },

    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Ingestion aborted after {committed}/{total} chunks: {source}")]
    IngestionPartial {
        committed: usize,
        total: usize,
        #[source]
        source: Box<AskRouteError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AskRouteError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CollectionNotFound(_) | Self::SourceNotFound(_) => exit_codes::NOT_FOUND,
            Self::Config(_) | Self::NoCityFound(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
