//! # ClauseFind
//!
//! **Deterministic contract-PDF clause lookup behind MCP tools.**
//!
//! ClauseFind ingests a PDF, reconstructs per-page reading-order text from
//! the document's positioned text fragments, and ranks pages against
//! free-text queries with a deterministic keyword/phrase scoring model,
//! returning verbatim page-cited excerpts. Regex field extraction,
//! deadline computation, and notice-email templating run over the quoted
//! clauses.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌───────────┐
//! │ PDF fragment │──▶│ Page          │──▶│ In-memory │
//! │ extraction   │   │ reconstruction │   │ doc store │
//! └──────────────┘   └───────────────┘   └─────┬─────┘
//!                                              │
//!                          ┌───────────────────┤
//!                          ▼                   ▼
//!                     ┌──────────┐       ┌──────────┐
//!                     │   CLI    │       │ HTTP/MCP │
//!                     │  (clf)   │       │  server  │
//!                     └──────────┘       └──────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. [`pdf`] parses raw bytes into per-page positioned fragment lists.
//! 2. [`ingest`] reconstructs each page (via `clausefind_core::layout`),
//!    derives the content-hash document id, and stores the record.
//! 3. On query, `clausefind_core::scoring` ranks pages and selects
//!    excerpts; [`tools`] wraps the pipeline as the five MCP tools.
//! 4. [`server`] exposes the tools over HTTP and streamable-HTTP MCP;
//!    [`mcp`] also serves stdio for editor clients.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`pdf`] | Positioned-fragment extraction from PDF bytes |
//! | [`ingest`] | Ingestion pipeline (extract → reconstruct → store) |
//! | [`tools`] | Tool trait, registry, and the five built-in tools |
//! | [`mcp`] | MCP JSON-RPC bridge (streamable HTTP + stdio) |
//! | [`server`] | Axum HTTP server |
//! | [`widget`] | Static preview widget resource |

pub mod config;
pub mod ingest;
pub mod mcp;
pub mod pdf;
pub mod server;
pub mod tools;
pub mod widget;
