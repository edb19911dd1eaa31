//! JSON-RPC 2.0 framing for the MCP stdio channel.
//!
//! Incoming lines are decoded by [`parse_message`] into either a request
//! (carries an `id`, always answered) or a notification (no `id`, never
//! answered). Outgoing messages are [`JsonRpcResponse`] or [`JsonRpcError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The MCP protocol version this server speaks.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported in `serverInfo`.
pub const SERVER_NAME: &str = "design-system-mcp";

/// The only accepted value of the `jsonrpc` member.
pub const JSONRPC_VERSION: &str = "2.0";

#[allow(clippy::trivially_copy_pass_by_ref)] // skip_serializing_if passes &T
pub(crate) const fn is_false(b: &bool) -> bool {
    !*b
}

/// A request ID: a string or an integer, never `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric request ID.
    Number(i64),
    /// String request ID.
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// A request from the client.
#[derive(Debug, Clone)]
pub struct JsonRpcRequest {
    /// Request identifier echoed in the reply.
    pub id: RequestId,
    /// Method name, never empty.
    pub method: String,
    /// Parameters; an explicit `null` is treated as absent.
    pub params: Option<Value>,
}

/// A notification from the client.
#[derive(Debug, Clone)]
pub struct JsonRpcNotification {
    /// Notification name.
    pub method: String,
    /// Parameters, if any.
    pub params: Option<Value>,
}

/// A decoded incoming line.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// A request expecting a reply.
    Request(JsonRpcRequest),
    /// A notification.
    Notification(JsonRpcNotification),
}

/// A successful reply.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always [`JSONRPC_VERSION`].
    pub jsonrpc: &'static str,
    /// ID of the request being answered.
    pub id: RequestId,
    /// Method result.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a success reply.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// Error codes used by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The line is not JSON, or not a JSON object.
    ParseError,
    /// Not a valid request, or not valid in the current lifecycle state.
    InvalidRequest,
    /// Unknown method.
    MethodNotFound,
    /// Missing or malformed method parameters, or an unknown tool.
    InvalidParams,
    /// Failure while producing a result.
    InternalError,
    /// Unknown resource URI (MCP extension).
    ResourceNotFound,
}

impl ErrorCode {
    /// Numeric wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ResourceNotFound => -32002,
        }
    }

    /// Message used when no more specific one is given.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::ResourceNotFound => "Resource not found",
        }
    }
}

/// The `error` member of an error reply.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorData {
    /// Wire code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Structured detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorData {
    /// Error with the code's default message.
    #[must_use]
    pub fn from_code(code: ErrorCode) -> Self {
        Self::with_message(code, code.default_message())
    }

    /// Error with a specific message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    /// Attaches structured detail.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// An error reply.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Always [`JSONRPC_VERSION`].
    pub jsonrpc: &'static str,
    /// ID of the failed request; absent when it could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    /// Error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // JsonRpcErrorData contains String
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error,
        }
    }

    #[must_use]
    pub fn parse_error() -> Self {
        Self::new(None, JsonRpcErrorData::from_code(ErrorCode::ParseError))
    }

    #[must_use]
    pub fn invalid_request(id: Option<RequestId>) -> Self {
        Self::new(id, JsonRpcErrorData::from_code(ErrorCode::InvalidRequest))
    }

    /// A request other than `initialize` or `ping` arrived before the
    /// `notifications/initialized` handshake finished.
    #[must_use]
    pub fn not_initialised(id: RequestId) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, "Server not initialised"),
        )
    }

    /// A second `initialize` arrived.
    #[must_use]
    pub fn already_initialised(id: RequestId) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, "Server already initialised"),
        )
    }

    #[must_use]
    pub fn method_not_found(id: RequestId, method: &str) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::with_message(
                ErrorCode::MethodNotFound,
                format!("Method not found: {method}"),
            ),
        )
    }

    #[must_use]
    pub fn invalid_params(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::with_message(ErrorCode::InvalidParams, message),
        )
    }

    /// Unknown resource; the URI is echoed in `data`.
    #[must_use]
    pub fn resource_not_found(id: RequestId, uri: &str) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::from_code(ErrorCode::ResourceNotFound)
                .with_data(serde_json::json!({ "uri": uri })),
        )
    }

    #[must_use]
    pub fn internal_error(id: RequestId, message: impl Into<String>) -> Self {
        Self::new(
            Some(id),
            JsonRpcErrorData::with_message(ErrorCode::InternalError, message),
        )
    }
}

/// Decodes one line from the client.
///
/// A present `id` makes the message a request; an `id` that is not a string
/// or integer (including `null`) is an invalid request.
///
/// # Errors
///
/// Returns a parse error if the line is not a JSON object, and an
/// invalid-request error if the envelope is malformed.
pub fn parse_message(line: &str) -> Result<IncomingMessage, JsonRpcError> {
    let mut envelope: Map<String, Value> =
        serde_json::from_str(line).map_err(|_| JsonRpcError::parse_error())?;

    if envelope.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(JsonRpcError::invalid_request(None));
    }

    let id = envelope
        .remove("id")
        .map(serde_json::from_value::<RequestId>)
        .transpose()
        .map_err(|_| JsonRpcError::invalid_request(None))?;

    let method = match envelope.remove("method") {
        Some(Value::String(method)) if !method.is_empty() => method,
        _ => return Err(JsonRpcError::invalid_request(id)),
    };
    let params = envelope.remove("params").filter(|p| !p.is_null());

    Ok(match id {
        Some(id) => IncomingMessage::Request(JsonRpcRequest { id, method, params }),
        None => IncomingMessage::Notification(JsonRpcNotification { method, params }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(line: &str) -> JsonRpcRequest {
        match parse_message(line) {
            Ok(IncomingMessage::Request(req)) => req,
            other => panic!("expected a request, got {other:?}"),
        }
    }

    fn error_code(line: &str) -> i32 {
        parse_message(line).unwrap_err().error.code
    }

    #[test]
    fn request_ids_may_be_numbers_or_strings() {
        let req = request(r#"{"jsonrpc": "2.0", "id": 1, "method": "tools/list"}"#);
        assert_eq!(req.id, RequestId::Number(1));
        assert_eq!(req.method, "tools/list");
        assert!(req.params.is_none());

        let req = request(r#"{"jsonrpc": "2.0", "id": "call-7", "method": "ping"}"#);
        assert_eq!(req.id, RequestId::String("call-7".to_string()));
        assert_eq!(req.id.to_string(), "call-7");
    }

    #[test]
    fn null_params_are_absent() {
        let req = request(r#"{"jsonrpc": "2.0", "id": 2, "method": "tools/list", "params": null}"#);
        assert!(req.params.is_none());

        let req = request(
            r#"{"jsonrpc": "2.0", "id": 3, "method": "resources/read", "params": {"uri": "x"}}"#,
        );
        assert_eq!(req.params, Some(json!({ "uri": "x" })));
    }

    #[test]
    fn missing_id_is_notification() {
        let msg = parse_message(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
            .unwrap();
        let IncomingMessage::Notification(notif) = msg else {
            panic!("expected a notification");
        };
        assert_eq!(notif.method, "notifications/initialized");
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(error_code("not json"), -32700);
        assert_eq!(error_code("[1, 2]"), -32700);
        assert_eq!(error_code(r#"{"id": 1, "method": "ping"}"#), -32600);
        assert_eq!(error_code(r#"{"jsonrpc": "1.0", "id": 1, "method": "ping"}"#), -32600);
        assert_eq!(error_code(r#"{"jsonrpc": "2.0", "id": null, "method": "ping"}"#), -32600);
        assert_eq!(error_code(r#"{"jsonrpc": "2.0", "id": 1.5, "method": "ping"}"#), -32600);
    }

    #[test]
    fn empty_method_keeps_request_id() {
        let err = parse_message(r#"{"jsonrpc": "2.0", "id": 9, "method": ""}"#).unwrap_err();
        assert_eq!(err.error.code, -32600);
        assert_eq!(err.id, Some(RequestId::Number(9)));
    }

    #[test]
    fn replies_serialise_with_version() {
        let value = serde_json::to_value(JsonRpcResponse::success(
            RequestId::Number(1),
            json!({ "tools": [] }),
        ))
        .unwrap();
        assert_eq!(value, json!({ "jsonrpc": "2.0", "id": 1, "result": { "tools": [] } }));

        let value = serde_json::to_value(JsonRpcError::parse_error()).unwrap();
        assert_eq!(
            value,
            json!({ "jsonrpc": "2.0", "error": { "code": -32700, "message": "Parse error" } })
        );
    }

    #[test]
    fn lifecycle_errors_are_invalid_requests() {
        let early = JsonRpcError::not_initialised(RequestId::Number(1));
        let again = JsonRpcError::already_initialised(RequestId::Number(2));
        assert_eq!(early.error.code, ErrorCode::InvalidRequest.code());
        assert_eq!(again.error.code, ErrorCode::InvalidRequest.code());
        assert_ne!(early.error.message, again.error.message);
    }

    #[test]
    fn resource_not_found_code_and_data() {
        let error = JsonRpcError::resource_not_found(RequestId::Number(7), "ds://nope");
        assert_eq!(error.error.code, -32002);
        assert_eq!(error.error.message, "Resource not found");
        assert_eq!(error.error.data, Some(json!({ "uri": "ds://nope" })));
    }
}
