//! MCP JSON-RPC protocol bridge.
//!
//! Adapts the [`ToolRegistry`] into an MCP server that Cursor, Claude,
//! and other MCP clients can connect to — over streamable HTTP (mounted
//! at `/mcp` by the HTTP server) or over stdio via [`serve_stdio`].

use std::borrow::Cow;
use std::sync::Arc;

use anyhow::Result;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler};

use clausefind_core::store::DocStore;

use crate::config::Config;
use crate::tools::{ToolContext, ToolRegistry};

/// Bridges the tool registry to the MCP JSON-RPC protocol.
///
/// Each MCP session receives a clone of this struct (everything is behind
/// `Arc`), so all sessions share the same store and tool set.
#[derive(Clone)]
pub struct McpBridge {
    store: Arc<dyn DocStore>,
    config: Arc<Config>,
    tools: Arc<ToolRegistry>,
}

impl McpBridge {
    pub fn new(store: Arc<dyn DocStore>, config: Arc<Config>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            store,
            config,
            tools,
        }
    }

    /// Convert a ClauseFind tool into an rmcp `Tool` descriptor.
    fn to_mcp_tool(tool: &dyn crate::tools::Tool) -> Tool {
        let schema_value = tool.parameters_schema();
        let input_schema: Arc<serde_json::Map<String, serde_json::Value>> = match schema_value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        Tool {
            name: Cow::Owned(tool.name().to_string()),
            title: None,
            description: Some(Cow::Owned(tool.description().to_string())),
            input_schema,
            output_schema: None,
            annotations: Some(ToolAnnotations::new().read_only(true)),
            execution: None,
            icons: None,
            meta: None,
        }
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "clausefind".to_string(),
                title: Some("ClauseFind".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "ClauseFind — deterministic contract-PDF clause lookup. Use \
                 extract_document_text to ingest a PDF, find_relevant_clauses to locate \
                 clauses with page-cited excerpts, then extract_key_fields, \
                 compute_deadlines, and generate_notice_email over the quoted clauses. \
                 All output quotes document text verbatim; nothing is legal advice."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools: Vec<Tool> = self
            .tools
            .tools()
            .iter()
            .map(|t| Self::to_mcp_tool(t.as_ref()))
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tools.find(name).map(Self::to_mcp_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool = self.tools.find(&request.name).ok_or_else(|| {
            McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("no tool registered with name: {}", request.name),
                None,
            )
        })?;

        let params = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let ctx = ToolContext::new(self.store.clone(), self.config.clone());
        match tool.execute(params, &ctx).await {
            Ok(result) => {
                let text = serde_json::to_string_pretty(&result).unwrap_or_default();
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }
}

/// Serve the MCP protocol over stdio until the client disconnects.
///
/// This is the transport editor clients spawn as a subprocess
/// (`clf serve stdio`).
pub async fn serve_stdio(store: Arc<dyn DocStore>, config: Arc<Config>) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    let tools = Arc::new(ToolRegistry::with_builtins());
    let bridge = McpBridge::new(store, config, tools);

    let running = bridge
        .serve(stdio())
        .await
        .map_err(|e| anyhow::anyhow!("failed to start stdio MCP server: {}", e))?;
    running
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("stdio MCP server failed: {}", e))?;
    Ok(())
}
