//! Database layer for askroute
//!
//! SQLite-backed document store holding chunked PDF text with embedding
//! vectors, partitioned into fixed-dimensionality collections.

mod chunks;
mod collections;
mod handle;
mod schema;
pub mod vectors;

pub use chunks::{EmbeddedChunk, ScoredChunk};
pub use collections::{CollectionInfo, Metric};
pub use handle::Store;
pub use schema::Database;

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of chunk content, used as chunk identity together
/// with its position
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_content_is_stable() {
        let a = hash_content("same text");
        let b = hash_content("same text");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_hash_content_differs() {
        assert_ne!(hash_content("one"), hash_content("two"));
    }
}
