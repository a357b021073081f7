// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

//! JSON-RPC 2.0 message shapes used by the MCP server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const VERSION: &str = "2.0";

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Absent for notifications, which never get a response.
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    pub fn tool_params(&self) -> Option<CallToolParams> {
        if self.method != "tools/call" {
            return None;
        }
        serde_json::from_value(self.params.clone()).ok()
    }
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse<T> {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub payload: T,
}

#[derive(Debug, Serialize)]
pub struct ResultPayload<T> {
    pub result: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub error: JsonRpcError,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ToolResultBody {
    pub content: Vec<ContentItem>,
    #[serde(rename = "isError")]
    pub is_error: bool,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ContentItem {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
}

pub fn success<T: Serialize>(id: Value, result: T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&JsonRpcResponse {
        jsonrpc: VERSION,
        id,
        payload: ResultPayload { result },
    })
}

pub fn failure(id: Value, code: i32, message: impl Into<String>) -> Result<String, serde_json::Error> {
    serde_json::to_string(&JsonRpcResponse {
        jsonrpc: VERSION,
        id,
        payload: ErrorPayload {
            error: JsonRpcError {
                code,
                message: message.into(),
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_shape() {
        let line = failure(json!(7), error_codes::METHOD_NOT_FOUND, "no such method")
            .expect("serializes");
        let value: Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": 7, "error": {"code": -32601, "message": "no such method"}})
        );
    }

    #[test]
    fn test_tool_result_shape() {
        let body = ToolResultBody {
            content: vec![ContentItem::Text {
                text: "done".to_string(),
            }],
            is_error: false,
            structured_content: None,
        };
        let value: Value = serde_json::from_str(&success(json!("a"), body).expect("serializes"))
            .expect("valid json");
        assert_eq!(value["result"]["content"][0], json!({"type": "text", "text": "done"}));
        assert_eq!(value["result"]["isError"], json!(false));
        assert!(value["result"].get("structuredContent").is_none());
    }

    #[test]
    fn test_notification_has_no_id() {
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
                .expect("parses");
        assert!(request.is_notification());
        assert!(request.tool_params().is_none());
    }
}
