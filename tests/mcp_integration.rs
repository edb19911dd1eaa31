//! Integration tests for MCP protocol handling.
//!
//! These tests verify the MCP server's JSON-RPC 2.0 protocol implementation,
//! including request/response handling, error responses, and lifecycle management.

mod common;

use common::Fixture;
use design_system_mcp::mcp::protocol::{
    parse_message, IncomingMessage, JsonRpcError, JsonRpcResponse, RequestId,
};
use design_system_mcp::mcp::server::{McpServer, ServerState};
use serde_json::{json, Value};

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_initialize_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "1.0.0"
            }
        }
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Request(req) = result.unwrap() {
        assert_eq!(req.method, "initialize");
        assert_eq!(req.id, RequestId::Number(1));
    } else {
        panic!("Expected Request");
    }
}

#[test]
fn test_parse_notification() {
    let json = r#"{
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Notification(notif) = result.unwrap() {
        assert_eq!(notif.method, "notifications/initialized");
    } else {
        panic!("Expected Notification");
    }
}

#[test]
fn test_parse_invalid_json() {
    let err = parse_message("not valid json").unwrap_err();
    assert_eq!(err.error.code, -32700);
}

#[test]
fn test_parse_missing_jsonrpc_version() {
    let json = r#"{
        "id": 1,
        "method": "test"
    }"#;

    let err = parse_message(json).unwrap_err();
    assert_eq!(err.error.code, -32600);
}

// =============================================================================
// Session Helpers
// =============================================================================

struct Session {
    server: McpServer,
    next_id: i64,
    _fixture: Fixture,
}

impl Session {
    /// A server over the shared fixture, taken through the handshake.
    async fn start() -> Self {
        let fixture = Fixture::new();
        let server = McpServer::new(fixture.src(), "acme-ui");
        let mut session = Self {
            server,
            next_id: 0,
            _fixture: fixture,
        };

        session
            .call("initialize", json!({ "protocolVersion": "2024-11-05" }))
            .await
            .expect("initialize failed");
        session
            .send(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
            .await;
        assert_eq!(session.server.state(), ServerState::Running);

        session
    }

    async fn send(&mut self, line: &str) -> Option<Result<JsonRpcResponse, JsonRpcError>> {
        let msg = parse_message(line).expect("test message must parse");
        self.server.process(msg).await
    }

    async fn call(&mut self, method: &str, params: Value) -> Result<Value, JsonRpcError> {
        self.next_id += 1;
        let line = json!({
            "jsonrpc": "2.0",
            "id": self.next_id,
            "method": method,
            "params": params,
        })
        .to_string();

        self.send(&line)
            .await
            .expect("requests are always answered")
            .map(|response| response.result)
    }

    /// Calls a tool; returns `(is_error, text)`.
    async fn tool(&mut self, name: &str, arguments: Value) -> (bool, String) {
        let result = self
            .call("tools/call", json!({ "name": name, "arguments": arguments }))
            .await
            .expect("tool call should not be a protocol error");

        let is_error = result.get("isError").and_then(Value::as_bool).unwrap_or(false);
        let text = result["content"][0]["text"]
            .as_str()
            .expect("text content")
            .to_string();
        (is_error, text)
    }

    async fn tool_json(&mut self, name: &str, arguments: Value) -> Value {
        let (is_error, text) = self.tool(name, arguments).await;
        assert!(!is_error, "{name} failed: {text}");
        serde_json::from_str(&text).expect("tool output should be JSON")
    }

    async fn read_resource(&mut self, uri: &str) -> Result<Value, JsonRpcError> {
        let result = self.call("resources/read", json!({ "uri": uri })).await?;
        assert_eq!(result["contents"][0]["uri"], uri);
        assert_eq!(result["contents"][0]["mimeType"], "application/json");
        let text = result["contents"][0]["text"].as_str().expect("text body");
        Ok(serde_json::from_str(text).expect("resource body should be JSON"))
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_initialize_result() {
    let fixture = Fixture::new();
    let mut server = McpServer::new(fixture.src(), "acme-ui");

    let msg = parse_message(
        r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2024-11-05"}}"#,
    )
    .unwrap();
    let Some(Ok(response)) = server.process(msg).await else {
        panic!("initialize should succeed");
    };

    assert_eq!(response.result["protocolVersion"], "2024-11-05");
    assert_eq!(response.result["serverInfo"]["name"], "design-system-mcp");
    assert!(response.result["capabilities"]["tools"].is_object());
    assert!(response.result["capabilities"]["resources"].is_object());
    assert_eq!(server.protocol_version(), Some("2024-11-05"));
}

#[tokio::test]
async fn test_requests_before_initialized_notification_are_refused() {
    let fixture = Fixture::new();
    let mut server = McpServer::new(fixture.src(), "acme-ui");

    let init = parse_message(
        r#"{"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2024-11-05"}}"#,
    )
    .unwrap();
    assert!(matches!(server.process(init).await, Some(Ok(_))));

    let list = parse_message(r#"{"jsonrpc": "2.0", "id": 2, "method": "resources/list"}"#).unwrap();
    let Some(Err(error)) = server.process(list).await else {
        panic!("resources/list should be refused");
    };
    assert_eq!(error.error.code, -32600);
    assert_eq!(error.id, Some(RequestId::Number(2)));
}

#[tokio::test]
async fn test_unknown_method() {
    let mut session = Session::start().await;
    let err = session.call("prompts/list", json!({})).await.unwrap_err();
    assert_eq!(err.error.code, -32601);
}

#[tokio::test]
async fn test_tools_list() {
    let mut session = Session::start().await;
    let result = session.call("tools/list", json!({})).await.unwrap();

    let tools = result["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 5);
    let code = tools
        .iter()
        .find(|t| t["name"] == "get_component_code")
        .unwrap();
    assert_eq!(code["inputSchema"]["required"], json!(["componentName"]));
}

// =============================================================================
// Tools
// =============================================================================

#[tokio::test]
async fn test_search_components_tool() {
    let mut session = Session::start().await;

    let output = session
        .tool_json("search_components", json!({ "query": "car" }))
        .await;
    assert_eq!(output["total"], 1);
    assert_eq!(output["query"], "car");
    assert_eq!(output["category"], Value::Null);
    assert_eq!(output["results"][0]["name"], "card");
    assert_eq!(output["results"][0]["props"][0]["type"], "string");

    let output = session
        .tool_json("search_components", json!({ "category": "button" }))
        .await;
    assert_eq!(output["total"], 1);
    assert_eq!(output["category"], "button");
}

#[tokio::test]
async fn test_search_unlisted_category_matches_nothing() {
    let mut session = Session::start().await;

    for category in ["modal", "typography"] {
        let output = session
            .tool_json("search_components", json!({ "category": category }))
            .await;
        assert_eq!(output["total"], 0, "{category}");
        assert_eq!(output["results"], json!([]));
        assert_eq!(output["category"], category);
    }
}

#[tokio::test]
async fn test_get_component_code_tool() {
    let mut session = Session::start().await;

    let output = session
        .tool_json(
            "get_component_code",
            json!({ "componentName": "button", "includeStories": true }),
        )
        .await;

    assert_eq!(output["componentName"], "button");
    assert_eq!(output["info"]["variants"], json!(["variant", "size"]));

    let mut files: Vec<_> = output["files"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    files.sort();
    assert_eq!(files, vec!["button.stories.tsx", "button.tsx", "index.ts"]);
    assert_eq!(output["files"]["button.tsx"], common::BUTTON_TSX);
}

#[tokio::test]
async fn test_get_component_code_not_found_is_tool_error() {
    let mut session = Session::start().await;

    let (is_error, text) = session
        .tool("get_component_code", json!({ "componentName": "modal" }))
        .await;
    assert!(is_error);
    assert!(text.contains("Component not found: modal"));
}

#[tokio::test]
async fn test_get_design_tokens_tool() {
    let mut session = Session::start().await;

    let output = session
        .tool_json("get_design_tokens", json!({ "category": "spacing" }))
        .await;
    assert_eq!(output["light"]["spacing-sm"]["value"], "0.5rem");
    assert_eq!(output["dark"], json!({}));

    let (is_error, css) = session
        .tool("get_design_tokens", json!({ "format": "css" }))
        .await;
    assert!(!is_error);
    assert!(css.starts_with(":root {\n  --background: 0 0% 100%;"));
}

#[tokio::test]
async fn test_integration_tools() {
    let mut session = Session::start().await;

    let output = session
        .tool_json("apply_theme_setup", json!({ "targetPath": "/work/app" }))
        .await;
    assert_eq!(output["success"], true);
    assert_eq!(output["files"][0]["action"], "create");

    let output = session
        .tool_json(
            "integrate_components",
            json!({ "components": ["modal"], "targetPath": "/work/app" }),
        )
        .await;
    assert_eq!(output["success"], false);
    assert_eq!(output["files"], json!([]));
}

#[tokio::test]
async fn test_invalid_arguments_are_tool_errors() {
    let mut session = Session::start().await;

    let (is_error, text) = session
        .tool("get_design_tokens", json!({ "format": "yaml" }))
        .await;
    assert!(is_error);
    assert!(text.contains("get_design_tokens"));

    let (is_error, _) = session.tool("integrate_components", json!({})).await;
    assert!(is_error);
}

#[tokio::test]
async fn test_unknown_tool_is_protocol_error() {
    let mut session = Session::start().await;

    let err = session
        .call("tools/call", json!({ "name": "render_widget", "arguments": {} }))
        .await
        .unwrap_err();
    assert_eq!(err.error.code, -32602);
    assert!(err.error.message.contains("render_widget"));
}

// =============================================================================
// Resources
// =============================================================================

#[tokio::test]
async fn test_resources_list() {
    let mut session = Session::start().await;
    let result = session.call("resources/list", json!({})).await.unwrap();

    let uris: Vec<_> = result["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["uri"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        uris,
        vec![
            "acme-ui://components/catalog",
            "acme-ui://design-tokens/colors",
            "acme-ui://config/tailwind",
        ]
    );
}

#[tokio::test]
async fn test_catalog_resource() {
    let mut session = Session::start().await;
    let body = session
        .read_resource("acme-ui://components/catalog")
        .await
        .unwrap();

    assert_eq!(body["total"], 3);
    assert_eq!(body["components"][0]["name"], "button");
    assert_eq!(body["components"][1]["hasTypes"], true);
    assert!(body["generatedAt"].is_string());
}

#[tokio::test]
async fn test_colors_resource() {
    let mut session = Session::start().await;
    let body = session
        .read_resource("acme-ui://design-tokens/colors")
        .await
        .unwrap();

    assert_eq!(body["categories"], json!(["color"]));
    assert!(body["light"].get("radius").is_none());
    assert_eq!(body["groups"]["primary"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_tailwind_resource() {
    let mut session = Session::start().await;
    let body = session
        .read_resource("acme-ui://config/tailwind")
        .await
        .unwrap();

    assert_eq!(body["colors"]["brand"], "#0055ff");
    assert_eq!(body["borderRadius"]["lg"], "var(--radius)");
}

#[tokio::test]
async fn test_unknown_resource() {
    let mut session = Session::start().await;

    let err = session
        .call("resources/read", json!({ "uri": "nishiken-ui://components/catalog" }))
        .await
        .unwrap_err();
    assert_eq!(err.error.code, -32002);
    assert_eq!(err.error.message, "Resource not found");
}
