//! PDF ingestion pipeline.
//!
//! Coordinates the full flow: parse bytes into positioned fragments,
//! reconstruct each page's reading-order text, derive the content-hash
//! document id, and store the finished record. Reconstruction happens
//! exactly once per document — queries later run against the stored page
//! texts.
//!
//! Ingestion is all-or-nothing: a parse failure stores nothing, so the
//! store never holds a half-populated document.

use anyhow::Result;

use clausefind_core::layout::reconstruct_page;
use clausefind_core::models::{document_id, StoredDocument};
use clausefind_core::store::DocStore;

use crate::pdf;

/// Result of a successful ingestion.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub doc_id: String,
    pub filename: String,
    pub page_count: usize,
}

/// Reconstruct per-page text from raw PDF bytes.
///
/// Falls back to whole-document plain-text extraction (as a single page)
/// when the fragment walk produces no text anywhere — typically scanned
/// PDFs. A document whose fallback also yields nothing keeps its empty
/// pages; a text-free document is valid, it just never matches a query.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
    let fragment_pages = pdf::extract_fragments(bytes)?;
    let pages: Vec<String> = fragment_pages
        .iter()
        .map(|fragments| reconstruct_page(fragments))
        .collect();

    if pages.iter().all(|p| p.is_empty()) {
        if let Ok(text) = pdf::extract_plain_text(bytes) {
            let text = text.trim();
            if !text.is_empty() {
                return Ok(vec![text.to_string()]);
            }
        }
    }

    Ok(pages)
}

/// Ingest a PDF: extract, reconstruct, hash, store.
pub async fn ingest_pdf(
    store: &dyn DocStore,
    filename: &str,
    bytes: &[u8],
) -> Result<IngestOutcome> {
    let pages = extract_pages(bytes)?;
    let doc_id = document_id(bytes);
    let page_count = pages.len();

    store
        .put(StoredDocument {
            doc_id: doc_id.clone(),
            filename: filename.to_string(),
            pages,
        })
        .await?;

    Ok(IngestOutcome {
        doc_id,
        filename: filename.to_string(),
        page_count,
    })
}
