//! Document storage abstraction.
//!
//! The [`DocStore`] trait defines the three operations the ranking
//! pipeline needs — `put`, `get`, `has` — as an explicit injected
//! dependency rather than ambient global state, so the pipeline can be
//! tested against an isolated store.
//!
//! Documents are immutable once stored and live for the process lifetime;
//! there is no eviction and no persistence across restarts. Implementations
//! must be `Send + Sync`, and their per-entry operations must be atomic:
//! under that contract, concurrent ingestions of different documents
//! (keyed by content hash) and concurrent read-only queries need no
//! further locking.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::StoredDocument;

/// Abstract keyed store from document id to its page texts.
#[async_trait]
pub trait DocStore: Send + Sync {
    /// Store a document under its id. Re-putting the same content-hash id
    /// replaces an identical record, so the operation is idempotent.
    async fn put(&self, doc: StoredDocument) -> Result<()>;

    /// Fetch a document by id.
    ///
    /// An unknown id is a lookup failure surfaced verbatim to the caller —
    /// a caller logic error, never retried.
    async fn get(&self, doc_id: &str) -> Result<StoredDocument>;

    /// Whether a document with this id exists.
    async fn has(&self, doc_id: &str) -> bool;
}
