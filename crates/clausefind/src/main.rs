//! # ClauseFind CLI (`clf`)
//!
//! The `clf` binary is the primary interface for ClauseFind. It provides
//! commands for one-shot PDF text extraction and clause lookup, and for
//! starting the MCP server over HTTP or stdio.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `clf extract <file.pdf>` | Print reconstructed per-page text |
//! | `clf find <file.pdf> "<query>"` | Ingest and rank pages, JSON output |
//! | `clf serve mcp` | Start the HTTP + MCP streamable-HTTP server |
//! | `clf serve stdio` | Serve MCP over stdio (for editor clients) |
//!
//! ## Examples
//!
//! ```bash
//! # Reconstructed page text, one block per page
//! clf extract contract.pdf
//!
//! # Top clauses for a query, with page-cited excerpts
//! clf find contract.pdf "termination notice period" --max-results 3
//!
//! # Start the server for Cursor/Claude integration
//! clf serve mcp --config ./config/clausefind.toml
//! ```

mod config;
mod ingest;
mod mcp;
mod pdf;
mod server;
mod tools;
mod widget;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use clausefind_core::models::citations_from_excerpts;
use clausefind_core::scoring::rank_pages;
use clausefind_core::store::memory::MemoryDocStore;
use clausefind_core::store::DocStore;

/// ClauseFind — deterministic contract-PDF clause lookup.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; when the file does not exist, built-in defaults apply.
#[derive(Parser)]
#[command(
    name = "clf",
    about = "ClauseFind — deterministic contract-PDF clause lookup behind MCP tools",
    version,
    long_about = "ClauseFind ingests a PDF, reconstructs per-page reading-order text, and ranks \
    pages against free-text queries with deterministic keyword/phrase scoring, returning \
    verbatim page-cited excerpts over MCP tools (HTTP or stdio)."
)]
struct Cli {
    /// Path to configuration file (TOML). Defaults apply if absent.
    #[arg(long, global = true, default_value = "./config/clausefind.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Print a PDF's reconstructed per-page text.
    Extract {
        /// Path to the PDF file.
        file: PathBuf,
    },

    /// Ingest a PDF and rank its pages against a query (one-shot).
    ///
    /// Prints the ranked clauses and citations as pretty JSON.
    Find {
        /// Path to the PDF file.
        file: PathBuf,

        /// Free-text clause query.
        query: String,

        /// Maximum results to return (clamped to 1–10).
        #[arg(long)]
        max_results: Option<i64>,

        /// Excerpt window in characters (clamped to 120–2000).
        #[arg(long)]
        excerpt_max_chars: Option<i64>,
    },

    /// Start an MCP server.
    Serve {
        #[command(subcommand)]
        transport: ServeCommand,
    },
}

/// Server transports.
#[derive(Subcommand)]
enum ServeCommand {
    /// HTTP server with the JSON tools API and a streamable-HTTP MCP
    /// endpoint at /mcp.
    Mcp,

    /// MCP over stdio, for editor clients that spawn the server as a
    /// subprocess.
    Stdio,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Arc::new(config::load_config(&cli.config)?);

    match cli.command {
        Commands::Extract { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let pages = ingest::extract_pages(&bytes)?;
            for (i, page) in pages.iter().enumerate() {
                println!("--- page {} ---", i + 1);
                println!("{}", page);
            }
            println!("({} pages)", pages.len());
        }

        Commands::Find {
            file,
            query,
            max_results,
            excerpt_max_chars,
        } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;

            let store = MemoryDocStore::new();
            let outcome = ingest::ingest_pdf(&store, &file.display().to_string(), &bytes).await?;
            let doc = store.get(&outcome.doc_id).await?;

            let limits = config
                .default_limits()
                .with_overrides(max_results, excerpt_max_chars);
            let clauses = rank_pages(&doc.pages, &query, limits);
            let citations = citations_from_excerpts(&clauses);

            let output = serde_json::json!({
                "doc_id": outcome.doc_id,
                "page_count": outcome.page_count,
                "query": query,
                "clauses": clauses,
                "citations": citations,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Serve { transport } => {
            let store: Arc<dyn DocStore> = Arc::new(MemoryDocStore::new());
            match transport {
                ServeCommand::Mcp => server::run_server(config, store).await?,
                ServeCommand::Stdio => mcp::serve_stdio(store, config).await?,
            }
        }
    }

    Ok(())
}
