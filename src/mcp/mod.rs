// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

//! MCP server exposing rule creation as a single tool.
//!
//! Speaks newline-delimited JSON-RPC 2.0 over stdio. The `create_lint_rule`
//! tool runs one workflow per call and returns the outcome message as text.
//! Calls are handled one at a time.

pub mod jsonrpc;

use crate::utils::error::LintsmithError;
use crate::utils::progress::PhaseSpinner;
use crate::workflow::WorkflowOutcome;
use crate::{MergedConfig, create_rule};
use anyhow::Context;
use async_trait::async_trait;
use jsonrpc::{ContentItem, JsonRpcRequest, ToolResultBody, error_codes};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub const TOOL_NAME: &str = "create_lint_rule";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// What the server calls for each `create_lint_rule` invocation.
#[async_trait]
pub trait RuleService: Send + Sync {
    async fn create_lint_rule(&self, description: &str) -> anyhow::Result<WorkflowOutcome>;
}

/// Runs the real workflow with a fixed configuration.
pub struct WorkflowService {
    config: MergedConfig,
}

impl WorkflowService {
    pub fn new(config: MergedConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RuleService for WorkflowService {
    async fn create_lint_rule(&self, description: &str) -> anyhow::Result<WorkflowOutcome> {
        // stdout carries protocol messages, so no spinner.
        create_rule(&self.config, description, PhaseSpinner::hidden()).await
    }
}

fn tool_definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": "Create a lint rule",
        "inputSchema": {
            "type": "object",
            "properties": {
                "description": {
                    "type": "string",
                    "description": "What the rule should enforce, in plain language"
                }
            },
            "required": ["description"]
        }
    })
}

fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);
    json!({
        "protocolVersion": protocol_version,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": "lintsmith",
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn text_result(text: String, is_error: bool) -> ToolResultBody {
    ToolResultBody {
        content: vec![ContentItem::Text { text }],
        is_error,
        structured_content: None,
    }
}

pub struct McpServer<S> {
    service: S,
}

impl<S: RuleService> McpServer<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Serve requests from `reader` until it is closed.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<(), LintsmithError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await? {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        tracing::debug!("MCP client closed the connection");
        Ok(())
    }

    /// Answer one message. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Result<Option<String>, serde_json::Error> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!("Unparseable MCP message: {}", err);
                return jsonrpc::failure(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", err),
                )
                .map(Some);
            }
        };

        if request.is_notification() {
            tracing::debug!(method = %request.method, "MCP notification");
            return Ok(None);
        }
        let id = request.id.clone().unwrap_or(Value::Null);
        if request.jsonrpc != jsonrpc::VERSION {
            return jsonrpc::failure(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            )
            .map(Some);
        }

        tracing::debug!(method = %request.method, "MCP request");
        let response = match request.method.as_str() {
            "initialize" => jsonrpc::success(id, initialize_result(&request.params)),
            "ping" => jsonrpc::success(id, json!({})),
            "tools/list" => jsonrpc::success(id, json!({ "tools": [tool_definition()] })),
            "tools/call" => self.call_tool(id, &request).await,
            other => jsonrpc::failure(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }?;
        Ok(Some(response))
    }

    async fn call_tool(
        &self,
        id: Value,
        request: &JsonRpcRequest,
    ) -> Result<String, serde_json::Error> {
        let Some(params) = request.tool_params() else {
            return jsonrpc::failure(id, error_codes::INVALID_PARAMS, "Invalid tools/call params");
        };
        if params.name != TOOL_NAME {
            return jsonrpc::failure(
                id,
                error_codes::INVALID_PARAMS,
                format!("Unknown tool: {}", params.name),
            );
        }
        let Some(description) = params
            .arguments
            .get("description")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|d| !d.is_empty())
        else {
            return jsonrpc::failure(
                id,
                error_codes::INVALID_PARAMS,
                "Missing required argument: description",
            );
        };

        tracing::info!("create_lint_rule: {}", description);
        let body = match self.service.create_lint_rule(description).await {
            Ok(outcome) => text_result(outcome.message(), !outcome.is_success()),
            Err(err) => {
                tracing::error!("create_lint_rule could not start: {:#}", err);
                text_result(format!("Failed to create lint rule, {:#}", err), true)
            }
        };
        jsonrpc::success(id, body)
    }
}

/// Serve the MCP tool on stdin and stdout until stdin closes.
pub async fn serve_stdio(config: MergedConfig) -> anyhow::Result<()> {
    config
        .workflow_settings()
        .context("Invalid workflow configuration")?;
    tracing::info!("lintsmith MCP server v{} on stdio", env!("CARGO_PKG_VERSION"));

    let server = McpServer::new(WorkflowService::new(config));
    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    Ok(())
}
