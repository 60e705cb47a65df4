//! Core data models used throughout ClauseFind.
//!
//! These types represent the documents, excerpts, and citations that flow
//! through the ingestion and ranking pipeline.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Disclaimer attached to every tool response.
///
/// ClauseFind quotes document text and performs simple, deterministic
/// extraction; it never interprets legal meaning.
pub const DISCLAIMER: &str = "Not legal advice. I’m not a lawyer. I’m only quoting the document \
     text and doing simple, deterministic extraction without interpreting legal meaning.";

/// A document stored for the lifetime of the process.
///
/// `pages` holds the reconstructed reading-order text for each page,
/// 1-indexed by position (`pages[0]` is page 1). Immutable once created.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub doc_id: String,
    pub filename: String,
    pub pages: Vec<String>,
}

/// A scored, excerpted match for one page of a document.
///
/// `exact_text` is always a contiguous substring of the page's original
/// reconstructed text — the pipeline quotes, it never paraphrases.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredExcerpt {
    /// 1-indexed page number.
    pub page: usize,
    /// Verbatim excerpt from the page text.
    #[serde(rename = "exactText")]
    pub exact_text: String,
    /// Human-readable explanation of why the page matched.
    #[serde(rename = "matchReason")]
    pub match_reason: String,
    /// Additive relevance score (phrase bonus + capped token hits).
    pub score: i64,
}

/// Caller-facing proof of provenance: a page number plus the quoted text.
#[derive(Debug, Clone, Serialize)]
pub struct Citation {
    pub page: usize,
    #[serde(rename = "exactText")]
    pub exact_text: String,
}

/// Project scored excerpts down to their citation pairs.
pub fn citations_from_excerpts(excerpts: &[ScoredExcerpt]) -> Vec<Citation> {
    excerpts
        .iter()
        .map(|e| Citation {
            page: e.page,
            exact_text: e.exact_text.clone(),
        })
        .collect()
}

/// Derive the document identifier from the source bytes.
///
/// Identity is a content hash, so identical uploads map to the same id
/// and re-ingestion is naturally idempotent.
pub fn document_id(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hash = format!("{:x}", hasher.finalize());
    format!("doc_{}", &hash[..24])
}
