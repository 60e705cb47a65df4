//! Tool trait, registry, and the five ClauseFind tools.
//!
//! Tools are the single dispatch surface shared by the HTTP API and the
//! MCP bridge: each tool validates its JSON parameters synchronously,
//! runs against the shared document store, and returns a JSON value.
//! Every response carries the disclaimer and a `_meta` output-template
//! pointer so MCP hosts can render the preview widget.
//!
//! | Tool | Purpose |
//! |------|---------|
//! | `extract_document_text` | Ingest a base64 PDF, store page text |
//! | `find_relevant_clauses` | Rank pages against a query, with citations |
//! | `extract_key_fields` | Regex-only field extraction from quoted clauses |
//! | `compute_deadlines` | Explicit base date + duration → deadline |
//! | `generate_notice_email` | Deterministic notice email template |

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};

use clausefind_core::deadline::compute_deadline;
use clausefind_core::fields::{extract_key_fields, is_valid_email};
use clausefind_core::models::{citations_from_excerpts, Citation, DISCLAIMER};
use clausefind_core::notice::render_notice_email;
use clausefind_core::scoring::rank_pages;
use clausefind_core::store::DocStore;

use crate::config::Config;
use crate::ingest::ingest_pdf;
use crate::widget::WIDGET_URI;

/// Context bridge for tool execution: the shared store plus configuration.
pub struct ToolContext {
    pub store: Arc<dyn DocStore>,
    pub config: Arc<Config>,
}

impl ToolContext {
    pub fn new(store: Arc<dyn DocStore>, config: Arc<Config>) -> Self {
        Self { store, config }
    }
}

/// A tool that MCP clients (and the HTTP API) can discover and call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Lowercase identifier with underscores, used as the route path and
    /// the MCP tool name.
    fn name(&self) -> &str;

    /// One-line description for client discovery.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute with JSON parameters (always an object).
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

/// Registry for tools.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry pre-loaded with all five built-in tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ExtractDocumentTextTool));
        registry.register(Box::new(FindRelevantClausesTool));
        registry.register(Box::new(ExtractKeyFieldsTool));
        registry.register(Box::new(ComputeDeadlinesTool));
        registry.register(Box::new(GenerateNoticeEmailTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ── Parameter helpers ────────────────────────────────────────────────────

fn require_str<'a>(params: &'a Value, name: &str) -> Result<&'a str> {
    match params.get(name).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => bail!("{} must be a non-empty string", name),
    }
}

fn optional_str<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(Value::as_str)
}

/// Numeric parameter, truncated toward zero; non-numbers count as absent.
fn int_param(params: &Value, name: &str) -> Option<i64> {
    params
        .get(name)
        .and_then(Value::as_f64)
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// All quoted clause texts joined for regex extraction; page numbers are
/// not required here.
fn combined_clause_text(params: &Value) -> String {
    params
        .get("clauses")
        .and_then(Value::as_array)
        .map(|clauses| {
            clauses
                .iter()
                .filter_map(|c| c.get("exactText").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n\n")
        })
        .unwrap_or_default()
}

/// Clauses with both a page number and non-blank text, for quoting.
fn quoted_clauses(params: &Value) -> Vec<Citation> {
    params
        .get("clauses")
        .and_then(Value::as_array)
        .map(|clauses| {
            clauses
                .iter()
                .filter_map(|c| {
                    let page = c.get("page").and_then(Value::as_u64)? as usize;
                    let text = c.get("exactText").and_then(Value::as_str)?;
                    if page == 0 || text.trim().is_empty() {
                        return None;
                    }
                    Some(Citation {
                        page,
                        exact_text: text.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn meta_value() -> Value {
    json!({ "openai/outputTemplate": WIDGET_URI })
}

// ── extract_document_text ────────────────────────────────────────────────

/// Ingest a PDF and store its page-numbered text.
pub struct ExtractDocumentTextTool;

#[async_trait]
impl Tool for ExtractDocumentTextTool {
    fn name(&self) -> &str {
        "extract_document_text"
    }

    fn description(&self) -> &str {
        "Extract page-numbered text from a PDF and store it in memory"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filename": { "type": "string", "description": "Original filename" },
                "mime_type": { "type": "string", "description": "Must be application/pdf" },
                "pdf_base64": { "type": "string", "description": "Base64-encoded PDF bytes" }
            },
            "required": ["filename", "mime_type", "pdf_base64"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let filename = require_str(&params, "filename")?;
        let mime_type = require_str(&params, "mime_type")?;
        let pdf_base64 = require_str(&params, "pdf_base64")?;

        if mime_type != "application/pdf" {
            bail!("only application/pdf is accepted");
        }

        let bytes = BASE64
            .decode(pdf_base64.trim())
            .context("pdf_base64 is not valid base64")?;

        let outcome = ingest_pdf(ctx.store.as_ref(), filename, &bytes).await?;

        Ok(json!({
            "tool": self.name(),
            "disclaimer": DISCLAIMER,
            "doc_id": outcome.doc_id,
            "filename": outcome.filename,
            "page_count": outcome.page_count,
            "_meta": meta_value(),
        }))
    }
}

// ── find_relevant_clauses ────────────────────────────────────────────────

/// Rank a stored document's pages against a free-text query.
pub struct FindRelevantClausesTool;

#[async_trait]
impl Tool for FindRelevantClausesTool {
    fn name(&self) -> &str {
        "find_relevant_clauses"
    }

    fn description(&self) -> &str {
        "Find relevant clauses using deterministic keyword and phrase scoring"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "doc_id": { "type": "string", "description": "Document id from extract_document_text" },
                "query": { "type": "string", "description": "Free-text clause query" },
                "max_results": { "type": "number", "description": "Result cap, clamped to [1, 10]" },
                "excerpt_max_chars": { "type": "number", "description": "Excerpt window, clamped to [120, 2000]" }
            },
            "required": ["doc_id", "query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let doc_id = require_str(&params, "doc_id")?;
        let query = require_str(&params, "query")?;

        let limits = ctx.config.default_limits().with_overrides(
            int_param(&params, "max_results"),
            int_param(&params, "excerpt_max_chars"),
        );

        let doc = ctx.store.get(doc_id).await?;
        let ranked = rank_pages(&doc.pages, query, limits);
        let citations = citations_from_excerpts(&ranked);

        let clauses: Vec<Value> = ranked
            .iter()
            .map(|x| {
                json!({
                    "page": x.page,
                    "exactText": x.exact_text,
                    "matchReason": x.match_reason,
                })
            })
            .collect();

        Ok(json!({
            "tool": self.name(),
            "disclaimer": DISCLAIMER,
            "doc_id": doc_id,
            "query": query,
            "clauses": clauses,
            "citations": citations,
            "_meta": meta_value(),
        }))
    }
}

// ── extract_key_fields ───────────────────────────────────────────────────

/// Regex-only field extraction from previously quoted clauses.
pub struct ExtractKeyFieldsTool;

#[async_trait]
impl Tool for ExtractKeyFieldsTool {
    fn name(&self) -> &str {
        "extract_key_fields"
    }

    fn description(&self) -> &str {
        "Extract key fields from quoted clauses using regex-only extraction"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "doc_id": { "type": "string" },
                "clauses": { "type": "array", "description": "Clauses from find_relevant_clauses" }
            },
            "required": ["doc_id", "clauses"]
        })
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<Value> {
        let doc_id = require_str(&params, "doc_id")?;
        let combined = combined_clause_text(&params);
        let key_fields = extract_key_fields(&combined);

        Ok(json!({
            "tool": self.name(),
            "disclaimer": DISCLAIMER,
            "doc_id": doc_id,
            "key_fields": key_fields,
            "_meta": meta_value(),
        }))
    }
}

// ── compute_deadlines ────────────────────────────────────────────────────

/// Deadline computation from explicit dates and durations only.
pub struct ComputeDeadlinesTool;

#[async_trait]
impl Tool for ComputeDeadlinesTool {
    fn name(&self) -> &str {
        "compute_deadlines"
    }

    fn description(&self) -> &str {
        "Compute deadlines only when an explicit base date and explicit duration (e.g. '30 days') exist"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "doc_id": { "type": "string" },
                "clauses": { "type": "array", "description": "Clauses from find_relevant_clauses" },
                "reference_date": { "type": "string", "description": "Optional ISO base date (YYYY-MM-DD)" }
            },
            "required": ["doc_id", "clauses"]
        })
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<Value> {
        let doc_id = require_str(&params, "doc_id")?;
        let combined = combined_clause_text(&params);
        let deadlines = compute_deadline(&combined, optional_str(&params, "reference_date"));

        Ok(json!({
            "tool": self.name(),
            "disclaimer": DISCLAIMER,
            "doc_id": doc_id,
            "deadlines": deadlines,
            "_meta": meta_value(),
        }))
    }
}

// ── generate_notice_email ────────────────────────────────────────────────

/// Deterministic notice email with quoted clauses and page numbers.
pub struct GenerateNoticeEmailTool;

#[async_trait]
impl Tool for GenerateNoticeEmailTool {
    fn name(&self) -> &str {
        "generate_notice_email"
    }

    fn description(&self) -> &str {
        "Generate a deterministic notice email template with quoted clauses and page numbers"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "doc_id": { "type": "string" },
                "clauses": { "type": "array", "description": "Clauses from find_relevant_clauses" },
                "to": { "type": "string", "description": "Recipient email address" },
                "from": { "type": "string", "description": "Sender email address" },
                "purpose": { "type": "string", "description": "What the notice concerns" },
                "subject": { "type": "string", "description": "Optional subject override" }
            },
            "required": ["doc_id", "clauses", "to", "from", "purpose"]
        })
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<Value> {
        let doc_id = require_str(&params, "doc_id")?;
        let to = require_str(&params, "to")?.trim();
        let from = require_str(&params, "from")?.trim();
        let purpose = require_str(&params, "purpose")?;

        if !is_valid_email(to) {
            bail!("to must be a valid email address");
        }
        if !is_valid_email(from) {
            bail!("from must be a valid email address");
        }

        let clauses = quoted_clauses(&params);
        let notice_email =
            render_notice_email(to, from, purpose, optional_str(&params, "subject"), &clauses);

        Ok(json!({
            "tool": self.name(),
            "disclaimer": DISCLAIMER,
            "doc_id": doc_id,
            "notice_email": notice_email,
            "_meta": meta_value(),
        }))
    }
}
