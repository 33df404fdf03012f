//! MCP server implementation.
//!
//! This module contains the server setup using rmcp: the tool router (an
//! operation-name to typed-handler mapping), the response envelope, and
//! the protocol handshake metadata.
//!
//! Every failure from the client or the workflow validator is converted
//! into a result flagged as an error at this boundary; nothing escapes as
//! an uncaught fault. Unrecognized tool names get the same treatment.

use crate::models::{
    AddCommentParams, CreateWorkPackageParams, GetAvailableStatusesParams, GetProjectParams,
    GetWorkPackageParams, ListWorkPackagesParams, UpdateWorkPackageParams,
};
use crate::tools::Tools;
use openproject_api::OpenProjectClient;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::ToolCallContext;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, handler::server::ServerHandler, tool, tool_router};
use serde::Serialize;
use std::sync::Arc;

/// The OpenProject MCP server.
///
/// Provides MCP protocol handling over stdio transport.
#[derive(Clone)]
pub struct OpenProjectMcpServer {
    /// Tool implementations.
    tools: Arc<Tools>,
    /// Tool router for MCP dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl OpenProjectMcpServer {
    /// List all visible projects.
    #[tool(description = "List all visible OpenProject projects")]
    async fn list_projects(&self) -> Result<CallToolResult, McpError> {
        Ok(render(self.tools.list_projects().await))
    }

    /// Get details of one project.
    #[tool(description = "Get details of a specific project by ID")]
    async fn get_project(
        &self,
        Parameters(params): Parameters<GetProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render(self.tools.get_project(params).await))
    }

    /// List every work package in a project.
    #[tool(
        description = "List all work packages in a given project, following pagination until exhausted"
    )]
    async fn list_work_packages(
        &self,
        Parameters(params): Parameters<ListWorkPackagesParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render(self.tools.list_work_packages(params).await))
    }

    /// Get details of one work package.
    #[tool(description = "Get details of a specific work package by ID")]
    async fn get_work_package(
        &self,
        Parameters(params): Parameters<GetWorkPackageParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render(self.tools.get_work_package(params).await))
    }

    /// Create a new work package.
    #[tool(description = "Create a new work package in a project")]
    async fn create_work_package(
        &self,
        Parameters(params): Parameters<CreateWorkPackageParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render(self.tools.create_work_package(params).await))
    }

    /// Update an existing work package.
    #[tool(
        description = "Update an existing work package. Requires the current lock version; status changes are validated against the currently allowed transitions first."
    )]
    async fn update_work_package(
        &self,
        Parameters(params): Parameters<UpdateWorkPackageParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render(self.tools.update_work_package(params).await))
    }

    /// Enumerate all statuses.
    #[tool(description = "List all statuses known to the OpenProject instance")]
    async fn list_statuses(&self) -> Result<CallToolResult, McpError> {
        Ok(render(self.tools.list_statuses().await))
    }

    /// Show current status and legal next statuses for a work package.
    #[tool(
        description = "Get the current status of a work package and the statuses it may legally transition to"
    )]
    async fn get_available_statuses(
        &self,
        Parameters(params): Parameters<GetAvailableStatusesParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render(self.tools.get_available_statuses(params).await))
    }

    /// Add a comment to a work package.
    #[tool(description = "Add a markdown comment to a work package's activity stream")]
    async fn add_comment(
        &self,
        Parameters(params): Parameters<AddCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(render(self.tools.add_comment(params).await))
    }
}

impl OpenProjectMcpServer {
    /// Create a server around a configured client.
    #[must_use]
    pub fn new(client: Arc<OpenProjectClient>) -> Self {
        Self {
            tools: Arc::new(Tools::new(client)),
            tool_router: Self::tool_router(),
        }
    }

    /// Direct access to the tool implementations.
    #[must_use]
    pub fn tools(&self) -> &Tools {
        &self.tools
    }
}

/// Wrap a tool outcome in the protocol envelope.
///
/// Successes become pretty-printed JSON text; failures become results
/// flagged as errors carrying the failure's message, so no fault ever
/// crosses the dispatch boundary.
fn render<T: Serialize>(outcome: crate::error::Result<T>) -> CallToolResult {
    let rendered = outcome.and_then(|value| Ok(serde_json::to_string_pretty(&value)?));
    match rendered {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => CallToolResult::error(vec![Content::text(format!("Error: {e}"))]),
    }
}

/// Failure result for a tool name not present in the catalog.
fn unknown_tool(name: &str) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Unknown tool: {name}"))])
}

impl ServerHandler for OpenProjectMcpServer {
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        // An unrecognized name is a tool-level failure, not a protocol
        // fault.
        if !self.tool_router.has_route(request.name.as_ref()) {
            return Ok(unknown_tool(&request.name));
        }
        let context = ToolCallContext::new(self, request, context);
        self.tool_router.call(context).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.tool_router.list_all(),
        })
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "openproject-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "OpenProject MCP server. Configure OPENPROJECT_BASE_URL and OPENPROJECT_API_KEY, then use the work package tools."
                    .into(),
            ),
        }
    }
}
