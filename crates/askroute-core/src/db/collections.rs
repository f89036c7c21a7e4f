//! Collection management
//!
//! A collection holds chunks of one fixed vector dimensionality and
//! similarity metric. Creation is lazy and idempotent; a dimensionality
//! or metric conflict fails fast instead of silently coexisting.

use super::Database;
use crate::error::{AskRouteError, Result};
use chrono::Utc;
use rusqlite::params;

/// Similarity metric for a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cosine,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "cosine" => Ok(Metric::Cosine),
            other => Err(AskRouteError::Parse(format!(
                "unknown similarity metric: {}",
                other
            ))),
        }
    }
}

/// Collection metadata
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub name: String,
    pub dimensions: usize,
    pub metric: Metric,
    pub created_at: String,
}

impl Database {
    /// Create the collection if absent. Calling again with identical
    /// parameters is a no-op; conflicting parameters are an error.
    pub fn ensure_collection(&self, name: &str, dimensions: usize, metric: Metric) -> Result<()> {
        if let Some(existing) = self.get_collection(name)? {
            if existing.dimensions != dimensions {
                return Err(AskRouteError::DimensionMismatch {
                    collection: name.to_string(),
                    expected: existing.dimensions,
                    actual: dimensions,
                });
            }
            if existing.metric != metric {
                return Err(AskRouteError::Config(format!(
                    "collection {} already uses metric {}",
                    name,
                    existing.metric.as_str()
                )));
            }
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO collections (name, dimensions, metric, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, dimensions as i64, metric.as_str(), now],
        )?;
        tracing::info!(collection = name, dimensions, "created collection");
        Ok(())
    }

    /// Look up collection metadata
    pub fn get_collection(&self, name: &str) -> Result<Option<CollectionInfo>> {
        let result = self.conn.query_row(
            "SELECT name, dimensions, metric, created_at FROM collections WHERE name = ?1",
            params![name],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        );

        match result {
            Ok((name, dims, metric, created_at)) => Ok(Some(CollectionInfo {
                name,
                dimensions: dims as usize,
                metric: Metric::parse(&metric)?,
                created_at,
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Collection metadata, erroring if the collection does not exist
    pub fn require_collection(&self, name: &str) -> Result<CollectionInfo> {
        self.get_collection(name)?
            .ok_or_else(|| AskRouteError::CollectionNotFound(name.to_string()))
    }

    /// List all collections
    pub fn list_collections(&self) -> Result<Vec<CollectionInfo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, dimensions, metric, created_at FROM collections ORDER BY name")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(name, dims, metric, created_at)| {
                Ok(CollectionInfo {
                    name,
                    dimensions: dims as usize,
                    metric: Metric::parse(&metric)?,
                    created_at,
                })
            })
            .collect()
    }

    /// Delete all chunks in a collection, keeping the collection itself
    pub fn reset_collection(&self, name: &str) -> Result<usize> {
        self.require_collection(name)?;
        let deleted = self
            .conn
            .execute("DELETE FROM chunks WHERE collection = ?1", params![name])?;
        tracing::info!(collection = name, deleted, "reset collection");
        Ok(deleted)
    }
}
