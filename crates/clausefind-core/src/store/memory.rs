//! In-memory [`DocStore`] implementation.
//!
//! A `HashMap` behind `std::sync::RwLock`: single-entry put/get/has are
//! atomic under the lock, which is all the concurrency model requires.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::StoredDocument;

use super::DocStore;

/// Process-lifetime in-memory document store.
pub struct MemoryDocStore {
    docs: RwLock<HashMap<String, StoredDocument>>,
}

impl MemoryDocStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryDocStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocStore for MemoryDocStore {
    async fn put(&self, doc: StoredDocument) -> Result<()> {
        let mut docs = self.docs.write().unwrap();
        docs.insert(doc.doc_id.clone(), doc);
        Ok(())
    }

    async fn get(&self, doc_id: &str) -> Result<StoredDocument> {
        let docs = self.docs.read().unwrap();
        docs.get(doc_id)
            .cloned()
            .ok_or_else(|| anyhow!("document not found: {}", doc_id))
    }

    async fn has(&self, doc_id: &str) -> bool {
        let docs = self.docs.read().unwrap();
        docs.contains_key(doc_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> StoredDocument {
        StoredDocument {
            doc_id: id.to_string(),
            filename: "contract.pdf".to_string(),
            pages: vec!["Page one text.".to_string(), "Page two text.".to_string()],
        }
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryDocStore::new();
        store.put(doc("doc_abc")).await.unwrap();

        let fetched = store.get("doc_abc").await.unwrap();
        assert_eq!(fetched.filename, "contract.pdf");
        assert_eq!(fetched.pages.len(), 2);
    }

    #[tokio::test]
    async fn test_get_unknown_id_fails() {
        let store = MemoryDocStore::new();
        let err = store.get("doc_missing").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_has() {
        let store = MemoryDocStore::new();
        assert!(!store.has("doc_abc").await);
        store.put(doc("doc_abc")).await.unwrap();
        assert!(store.has("doc_abc").await);
    }

    #[tokio::test]
    async fn test_reput_same_id_is_idempotent() {
        let store = MemoryDocStore::new();
        store.put(doc("doc_abc")).await.unwrap();
        store.put(doc("doc_abc")).await.unwrap();
        let fetched = store.get("doc_abc").await.unwrap();
        assert_eq!(fetched.pages.len(), 2);
    }
}
