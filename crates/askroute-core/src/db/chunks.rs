//! Chunk storage and nearest-neighbor queries

use super::vectors::{bytes_to_embedding, cosine_similarity, embedding_to_bytes};
use super::Database;
use crate::error::{AskRouteError, Result};
use chrono::Utc;
use rusqlite::params;

/// A chunk ready for insertion: text plus its embedding vector
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    /// Source document name (filename)
    pub source: String,
    /// Sequence number within the source document
    pub seq: u32,
    /// Character offset within the source page
    pub pos: usize,
    /// Chunk text
    pub content: String,
    /// SHA-256 of the content
    pub content_hash: String,
    /// Embedding vector
    pub embedding: Vec<f32>,
}

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub source: String,
    pub seq: u32,
    pub content: String,
    pub score: f32,
}

impl Database {
    /// Append chunks to a collection.
    ///
    /// Each vector's length is validated against the collection
    /// dimensionality before anything is written. There is no content
    /// deduplication: inserting the same chunks twice stores them twice.
    /// The whole call commits or rolls back as one batch.
    pub fn insert_chunks(&self, collection: &str, chunks: &[EmbeddedChunk]) -> Result<usize> {
        let info = self.require_collection(collection)?;

        for chunk in chunks {
            if chunk.embedding.len() != info.dimensions {
                return Err(AskRouteError::DimensionMismatch {
                    collection: collection.to_string(),
                    expected: info.dimensions,
                    actual: chunk.embedding.len(),
                });
            }
        }

        let now = Utc::now().to_rfc3339();

        self.conn.execute("BEGIN IMMEDIATE", [])?;
        let result = (|| {
            for chunk in chunks {
                self.conn.execute(
                    "INSERT INTO chunks (collection, source, seq, pos, content, content_hash, embedding, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        collection,
                        chunk.source,
                        chunk.seq,
                        chunk.pos as i64,
                        chunk.content,
                        chunk.content_hash,
                        embedding_to_bytes(&chunk.embedding),
                        now
                    ],
                )?;
            }
            Ok(chunks.len())
        })();

        if result.is_ok() {
            self.conn.execute("COMMIT", [])?;
        } else {
            let _ = self.conn.execute("ROLLBACK", []);
        }
        result
    }

    /// Return up to `k` chunks ranked by cosine similarity to the query
    /// vector, highest first. Tie order follows the store's scan order
    /// and is not stable across runs.
    pub fn query_nearest(
        &self,
        collection: &str,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let info = self.require_collection(collection)?;

        if query.len() != info.dimensions {
            return Err(AskRouteError::DimensionMismatch {
                collection: collection.to_string(),
                expected: info.dimensions,
                actual: query.len(),
            });
        }

        let mut stmt = self.conn.prepare(
            "SELECT source, seq, content, embedding FROM chunks WHERE collection = ?1",
        )?;

        let mut scored: Vec<ScoredChunk> = stmt
            .query_map(params![collection], |row| {
                let source: String = row.get(0)?;
                let seq: u32 = row.get(1)?;
                let content: String = row.get(2)?;
                let bytes: Vec<u8> = row.get(3)?;
                Ok((source, seq, content, bytes))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(source, seq, content, bytes)| {
                let embedding = bytes_to_embedding(&bytes);
                let score = cosine_similarity(query, &embedding);
                ScoredChunk {
                    source,
                    seq,
                    content,
                    score,
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    /// Count chunks in a collection
    pub fn count_chunks(&self, collection: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
