//! JSON-RPC message shapes and LSP value conversions.
//!
//! Messages stay as `serde_json::Value` end to end; this module only classifies incoming ones and
//! builds outgoing ones.

use chainlens_core::{
    DIAGNOSTIC_SOURCE, Diagnostic, DiagnosticSeverity, Position, Range, TextDocument,
};
use serde_json::{Map, Value, json};

/// JSON-RPC: the request is not valid in the current state.
pub const INVALID_REQUEST: i64 = -32600;
/// JSON-RPC: the method does not exist.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC: invalid method parameters.
pub const INVALID_PARAMS: i64 = -32602;
/// JSON-RPC: internal error.
pub const INTERNAL_ERROR: i64 = -32603;
/// LSP: a request arrived before `initialize`.
pub const SERVER_NOT_INITIALIZED: i64 = -32002;
/// LSP: the request failed although it was well-formed.
pub const REQUEST_FAILED: i64 = -32803;

/// A classified inbound JSON-RPC message.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Client -> server request that must be answered.
    Request {
        /// Request id (number or string).
        id: Value,
        /// Method name.
        method: String,
        /// Params payload (`null` when absent).
        params: Value,
    },
    /// Client -> server notification.
    Notification {
        /// Method name.
        method: String,
        /// Params payload (`null` when absent).
        params: Value,
    },
    /// Response to a server -> client request.
    Response {
        /// Id of the request being answered.
        id: Value,
        /// Result payload, if successful.
        result: Option<Value>,
        /// Error payload, if the request failed.
        error: Option<Value>,
    },
}

impl Inbound {
    /// Classify a raw JSON-RPC message. Returns `None` for values that are none of the three.
    pub fn from_value(msg: Value) -> Option<Self> {
        let Value::Object(mut obj) = msg else {
            return None;
        };

        let id = obj.remove("id");
        let method = obj
            .get("method")
            .and_then(Value::as_str)
            .map(str::to_string);
        let params = obj.remove("params").unwrap_or(Value::Null);

        match (id, method) {
            (Some(id), Some(method)) => Some(Self::Request { id, method, params }),
            (None, Some(method)) => Some(Self::Notification { method, params }),
            (Some(id), None) => Some(Self::Response {
                id,
                result: obj.remove("result"),
                error: obj.remove("error"),
            }),
            (None, None) => None,
        }
    }
}

fn envelope() -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("jsonrpc".to_string(), Value::String("2.0".to_string()));
    obj
}

/// Build a server -> client request.
pub fn request(id: u64, method: &str, params: Value) -> Value {
    let mut obj = envelope();
    obj.insert("id".to_string(), Value::Number(id.into()));
    obj.insert("method".to_string(), Value::String(method.to_string()));
    obj.insert("params".to_string(), params);
    Value::Object(obj)
}

/// Build a notification.
pub fn notification(method: &str, params: Value) -> Value {
    let mut obj = envelope();
    obj.insert("method".to_string(), Value::String(method.to_string()));
    obj.insert("params".to_string(), params);
    Value::Object(obj)
}

/// Build a successful response.
pub fn response(id: Value, result: Value) -> Value {
    let mut obj = envelope();
    obj.insert("id".to_string(), id);
    obj.insert("result".to_string(), result);
    Value::Object(obj)
}

/// Build an error response.
pub fn error_response(id: Value, code: i64, message: impl Into<String>) -> Value {
    let mut error = Map::new();
    error.insert("code".to_string(), Value::Number(code.into()));
    error.insert("message".to_string(), Value::String(message.into()));

    let mut obj = envelope();
    obj.insert("id".to_string(), id);
    obj.insert("error".to_string(), Value::Object(error));
    Value::Object(obj)
}

/// LSP `MessageType` for `window/showMessage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// An error message.
    Error,
    /// An informational message.
    Info,
}

impl MessageType {
    fn as_u64(self) -> u64 {
        match self {
            Self::Error => 1,
            Self::Info => 3,
        }
    }
}

/// Build a `window/showMessage` notification.
pub fn show_message(typ: MessageType, message: impl Into<String>) -> Value {
    notification(
        "window/showMessage",
        json!({ "type": typ.as_u64(), "message": message.into() }),
    )
}

/// Parse an LSP `Position`.
pub fn position_from_value(value: &Value) -> Option<Position> {
    let line = value.get("line")?.as_u64()?;
    let character = value.get("character")?.as_u64()?;
    Some(Position::new(
        u32::try_from(line).ok()?,
        u32::try_from(character).ok()?,
    ))
}

/// Parse an LSP `Range`.
pub fn range_from_value(value: &Value) -> Option<Range> {
    let start = position_from_value(value.get("start")?)?;
    let end = position_from_value(value.get("end")?)?;
    Some(Range::new(start, end))
}

/// Serialize a `Position`.
pub fn position_to_value(position: Position) -> Value {
    json!({ "line": position.line, "character": position.character })
}

/// Serialize a `Range`.
pub fn range_to_value(range: Range) -> Value {
    json!({ "start": position_to_value(range.start), "end": position_to_value(range.end) })
}

/// Numeric LSP `DiagnosticSeverity`.
pub fn severity_to_u64(severity: DiagnosticSeverity) -> u64 {
    match severity {
        DiagnosticSeverity::Warning => 2,
        DiagnosticSeverity::Information => 3,
    }
}

/// Serialize a diagnostic, converting its byte range against `document`.
pub fn diagnostic_to_value(document: &TextDocument, diagnostic: &Diagnostic) -> Value {
    let range = document.byte_range_to_range(diagnostic.range.start..diagnostic.range.end);
    let mut obj = Map::new();
    obj.insert("range".to_string(), range_to_value(range));
    obj.insert(
        "severity".to_string(),
        Value::Number(severity_to_u64(diagnostic.severity).into()),
    );
    if let Some(code) = &diagnostic.code {
        obj.insert("code".to_string(), Value::String(code.to_string()));
    }
    obj.insert(
        "source".to_string(),
        Value::String(DIAGNOSTIC_SOURCE.to_string()),
    );
    obj.insert(
        "message".to_string(),
        Value::String(diagnostic.message.clone()),
    );
    Value::Object(obj)
}

/// Build a `textDocument/publishDiagnostics` notification.
pub fn publish_diagnostics(uri: &str, version: Option<i32>, diagnostics: Vec<Value>) -> Value {
    let mut params = Map::new();
    params.insert("uri".to_string(), Value::String(uri.to_string()));
    if let Some(version) = version {
        params.insert("version".to_string(), Value::Number(version.into()));
    }
    params.insert("diagnostics".to_string(), Value::Array(diagnostics));
    notification("textDocument/publishDiagnostics", Value::Object(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainlens_core::{DiagnosticCode, DiagnosticRange};
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_messages() {
        let req = Inbound::from_value(json!({
            "jsonrpc": "2.0", "id": 1, "method": "shutdown"
        }));
        assert_eq!(
            req,
            Some(Inbound::Request {
                id: json!(1),
                method: "shutdown".to_string(),
                params: Value::Null,
            })
        );

        let note = Inbound::from_value(json!({ "jsonrpc": "2.0", "method": "exit" }));
        assert!(matches!(note, Some(Inbound::Notification { .. })));

        let resp = Inbound::from_value(json!({ "jsonrpc": "2.0", "id": "a", "result": [] }));
        assert_eq!(
            resp,
            Some(Inbound::Response {
                id: json!("a"),
                result: Some(json!([])),
                error: None,
            })
        );

        assert_eq!(Inbound::from_value(json!([1, 2])), None);
        assert_eq!(Inbound::from_value(json!({ "jsonrpc": "2.0" })), None);
    }

    #[test]
    fn diagnostic_wire_shape() {
        let doc = TextDocument::new("file:///a.ts", 3, "x\n  chainId: 42\n");
        let diagnostic = Diagnostic {
            range: DiagnosticRange::new(4, 15),
            severity: DiagnosticSeverity::Warning,
            code: Some(DiagnosticCode::DeployToChain("42".to_string())),
            source: DIAGNOSTIC_SOURCE,
            message: "deploy".to_string(),
        };
        assert_eq!(
            diagnostic_to_value(&doc, &diagnostic),
            json!({
                "range": {
                    "start": { "line": 1, "character": 2 },
                    "end": { "line": 1, "character": 13 }
                },
                "severity": 2,
                "code": "DeployToChain42",
                "source": "hyperlane",
                "message": "deploy"
            })
        );
    }

    #[test]
    fn error_response_shape() {
        assert_eq!(
            error_response(json!(7), METHOD_NOT_FOUND, "nope"),
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "error": { "code": -32601, "message": "nope" }
            })
        );
    }
}
