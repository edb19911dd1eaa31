//! MCP server for design-system access.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: `initialize`, then the `notifications/initialized`
//!    notification
//! 2. **Operation**: tools and resources backed by the design-system readers
//! 3. **Shutdown**: EOF on stdin or a termination signal
//!
//! Requests other than `initialize` and `ping` are refused until
//! initialisation completes.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::design_system::{
    ComponentReader, DesignSystemError, DesignSystemResult, TokenCategory, TokenReader,
};
use crate::integration::IntegrationManager;
use crate::mcp::protocol::{
    is_false, parse_message, IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, RequestId, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::resources::{ReadResourceParams, Resource, ResourceContents};
use crate::mcp::tools::{
    self, ComponentCodeArgs, SearchArgs, ToolCallParams, ToolCallResult, ToolRequest,
    ToolRequestError, TokensArgs,
};
use crate::mcp::transport::StdioTransport;

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ListCapabilities>,
    /// Resource-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ListCapabilities>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ListCapabilities::default()),
            resources: Some(ListCapabilities::default()),
        }
    }
}

/// Capabilities of a listable feature.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListCapabilities {
    /// Whether the list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// The MCP server for a design system.
pub struct McpServer {
    /// Current server state.
    state: ServerState,
    /// The transport layer.
    transport: StdioTransport,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    components: ComponentReader,
    tokens: TokenReader,
    integration: IntegrationManager,
    /// URI scheme of the resources.
    library_name: String,
}

impl McpServer {
    /// Creates a server for the design system rooted at `design_system_path`.
    #[must_use]
    pub fn new(design_system_path: impl AsRef<Path>, library_name: impl Into<String>) -> Self {
        let path = design_system_path.as_ref();
        let library_name = library_name.into();

        Self {
            state: ServerState::AwaitingInit,
            transport: StdioTransport::new(),
            protocol_version: None,
            components: ComponentReader::new(path),
            tokens: TokenReader::new(path),
            integration: IntegrationManager::new(path, library_name.clone()),
            library_name,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Returns the negotiated protocol version, once initialised.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: std::io::Result<Option<String>>,
    ) -> std::io::Result<bool> {
        let Some(line) = line_result? else {
            tracing::info!("stdin closed");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if line.trim().is_empty() {
            return Ok(false);
        }

        self.handle_line(&line).await?;

        Ok(self.state == ServerState::ShuttingDown)
    }

    /// Handles a single line of input.
    async fn handle_line(&mut self, line: &str) -> std::io::Result<()> {
        let reply = match parse_message(line) {
            Ok(msg) => self.process(msg).await,
            Err(error) => {
                tracing::debug!(code = error.error.code, "Rejected malformed message");
                Some(Err(error))
            }
        };

        match reply {
            Some(Ok(response)) => self.transport.write_response(&response).await,
            Some(Err(error)) => self.transport.write_error(&error).await,
            None => Ok(()),
        }
    }

    /// Processes one parsed message and returns the reply, if any.
    ///
    /// Notifications never produce a reply.
    pub async fn process(
        &mut self,
        msg: IncomingMessage,
    ) -> Option<Result<JsonRpcResponse, JsonRpcError>> {
        match msg {
            IncomingMessage::Request(req) => Some(self.handle_request(&req).await),
            IncomingMessage::Notification(ref notif) => {
                self.handle_notification(notif);
                None
            }
        }
    }

    /// Handles an incoming request.
    async fn handle_request(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        tracing::debug!(id = %req.id, method = %req.method, "Handling request");

        match req.method.as_str() {
            "initialize" => self.handle_initialize(req),
            "ping" => Ok(Self::handle_ping(req)),
            "tools/list" => self.handle_tools_list(req),
            "tools/call" => self.handle_tools_call(req).await,
            "resources/list" => self.handle_resources_list(req),
            "resources/read" => self.handle_resources_read(req).await,
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        }
    }

    /// Handles an incoming notification.
    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            tracing::info!("Client initialised");
            self.state = ServerState::Running;
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::already_initialised(req.id.clone()));
        }

        let params: InitializeParams = required_params(req, "initialize")?;
        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = client.version.as_deref().unwrap_or("unknown"),
                requested_version = %params.protocol_version,
                "Initialising"
            );
        }

        let negotiated_version = MCP_PROTOCOL_VERSION.to_string();

        self.protocol_version = Some(negotiated_version.clone());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the ping request.
    fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }

    /// Ensures the server is in the Running state.
    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state != ServerState::Running {
            return Err(JsonRpcError::not_initialised(id.clone()));
        }
        Ok(())
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "tools": tools::definitions() }),
        ))
    }

    /// Handles the tools/call request.
    async fn handle_tools_call(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ToolCallParams = required_params(req, "tool call")?;

        let result = match ToolRequest::parse(&params.name, params.arguments) {
            Ok(request) => {
                tracing::debug!(tool = request.name(), "Calling tool");
                self.call_tool(request).await
            }
            Err(ToolRequestError::UnknownTool(name)) => {
                return Err(JsonRpcError::invalid_params(
                    req.id.clone(),
                    format!("Unknown tool: {name}"),
                ));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected tool arguments");
                ToolCallResult::error(e.to_string())
            }
        };

        to_response(&req.id, &result)
    }

    /// Runs a validated tool request.
    async fn call_tool(&self, request: ToolRequest) -> ToolCallResult {
        match request {
            ToolRequest::SearchComponents(args) => self.call_search_components(args).await,
            ToolRequest::GetComponentCode(args) => self.call_get_component_code(args).await,
            ToolRequest::GetDesignTokens(args) => self.call_get_design_tokens(args).await,
            ToolRequest::ApplyThemeSetup(options) => {
                ToolCallResult::json(&self.integration.apply_theme_setup(&options).await)
            }
            ToolRequest::IntegrateComponents(request) => {
                ToolCallResult::json(&self.integration.integrate_components(&request).await)
            }
        }
    }

    async fn call_search_components(&self, args: SearchArgs) -> ToolCallResult {
        let query = args.query.as_deref().unwrap_or_default();
        let category = args.category.as_deref();

        match self.components.search_components(query, category).await {
            Ok(results) => ToolCallResult::json(&json!({
                "total": results.len(),
                "results": results,
                "query": args.query,
                "category": args.category,
            })),
            Err(e) => reader_error("Failed to search components", &e),
        }
    }

    async fn call_get_component_code(&self, args: ComponentCodeArgs) -> ToolCallResult {
        let name = args.component_name.as_str();

        let (code, info) = tokio::join!(
            self.components.component_code(name, args.code_options()),
            self.components.component_info(name),
        );
        let (code, info) = match (code, info) {
            (Ok(code), Ok(info)) => (code, info),
            (Err(e), _) | (_, Err(e)) => {
                return reader_error("Failed to get component code", &e);
            }
        };

        let mut files = IndexMap::new();
        files.insert(format!("{name}.tsx"), code.tsx);
        if let Some(index) = code.index {
            files.insert("index.ts".to_string(), index);
        }
        if let Some(stories) = code.stories {
            files.insert(format!("{name}.stories.tsx"), stories);
        }
        if let Some(types) = code.types {
            files.insert(format!("{name}.types.ts"), types);
        }

        ToolCallResult::json(&json!({
            "componentName": name,
            "info": {
                "description": info.description,
                "variants": info.variants,
                "dependencies": info.dependencies,
                "props": info.props,
            },
            "files": files,
        }))
    }

    async fn call_get_design_tokens(&self, args: TokensArgs) -> ToolCallResult {
        let tokens = match self.tokens.design_tokens(args.category).await {
            Ok(tokens) => tokens,
            Err(e) => return reader_error("Failed to get design tokens", &e),
        };

        match args.format.render(&tokens) {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => ToolCallResult::error(format!("Failed to render design tokens: {e}")),
        }
    }

    /// Handles the resources/list request.
    fn handle_resources_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let resources: Vec<_> = Resource::ALL
            .into_iter()
            .map(|r| r.definition(&self.library_name))
            .collect();

        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "resources": resources }),
        ))
    }

    /// Handles the resources/read request.
    async fn handle_resources_read(
        &self,
        req: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ReadResourceParams = required_params(req, "resource read")?;
        let Some(resource) = Resource::from_uri(&params.uri, &self.library_name) else {
            return Err(JsonRpcError::resource_not_found(req.id.clone(), &params.uri));
        };

        let body = self.read_resource(resource).await.map_err(|e| {
            tracing::warn!(uri = %params.uri, error = %e, "Resource read failed");
            JsonRpcError::internal_error(req.id.clone(), e.detailed())
        })?;

        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| JsonRpcError::internal_error(req.id.clone(), e.to_string()))?;

        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "contents": [ResourceContents::json(params.uri, text)] }),
        ))
    }

    /// Builds the JSON body of a resource.
    async fn read_resource(&self, resource: Resource) -> DesignSystemResult<Value> {
        match resource {
            Resource::ComponentCatalog => {
                let components = self.components.catalog().await?;
                Ok(json!({
                    "total": components.len(),
                    "components": components,
                    "generatedAt": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                }))
            }
            Resource::ColorTokens => {
                let (tokens, groups) = tokio::join!(
                    self.tokens.design_tokens(Some(TokenCategory::Color)),
                    self.tokens.color_groups(),
                );
                let mut body = to_value(&tokens?);
                body["groups"] = to_value(&groups?);
                Ok(body)
            }
            Resource::TailwindConfig => Ok(to_value(&self.tokens.tailwind_config().await?)),
        }
    }
}

/// Decodes the required `params` of a request.
fn required_params<T: DeserializeOwned>(
    req: &JsonRpcRequest,
    what: &str,
) -> Result<T, JsonRpcError> {
    req.params
        .as_ref()
        .map(|p| serde_json::from_value(p.clone()))
        .transpose()
        .map_err(|e| JsonRpcError::invalid_params(req.id.clone(), format!("Invalid {what} params: {e}")))?
        .ok_or_else(|| JsonRpcError::invalid_params(req.id.clone(), format!("Missing {what} params")))
}

fn to_response(id: &RequestId, result: &ToolCallResult) -> Result<JsonRpcResponse, JsonRpcError> {
    let value = serde_json::to_value(result).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialise tool call result");
        JsonRpcError::internal_error(id.clone(), "Internal error: failed to serialise result")
    })?;
    Ok(JsonRpcResponse::success(id.clone(), value))
}

/// Serialises plain data types whose `Serialize` impls cannot fail.
fn to_value(value: &impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn reader_error(context: &str, error: &DesignSystemError) -> ToolCallResult {
    if error.is_not_found() {
        tracing::debug!(error = %error, "{context}");
    } else {
        tracing::warn!(error = %error, "{context}");
    }
    ToolCallResult::error(format!("{context}: {}", error.detailed()))
}
