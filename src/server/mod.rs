//! MCP protocol adapter over stdio.
//!
//! Line-delimited JSON-RPC 2.0: one request per line on stdin, one response
//! per line on stdout. Diagnostics go to stderr only; stdout carries nothing
//! but protocol frames. The adapter maps protocol methods onto the tool
//! registry, the metadata resources, and the prompt templates, and contains
//! no robot logic of its own.

use crate::tools::{Tool, ToolResult};
use crate::{prompts, resources};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub struct McpServer {
    tools: Vec<Box<dyn Tool>>,
}

impl McpServer {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Serve requests from stdin until EOF.
    pub async fn run_stdio(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        info!(tools = self.tools.len(), "MCP server listening on stdio");
        while let Some(line) = lines.next_line().await.context("reading stdin")? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                stdout.write_all(response.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }
        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw frame. `None` means no response is due (notification).
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let request: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                error!("malformed request: {e}");
                return Some(
                    error_response(Value::Null, -32700, &format!("Parse error: {e}")).to_string(),
                );
            }
        };
        self.handle_request(request).await.map(|r| r.to_string())
    }

    async fn handle_request(&self, request: Value) -> Option<Value> {
        let id = request.get("id").cloned();
        let method = match request.get("method").and_then(|m| m.as_str()) {
            Some(m) => m.to_string(),
            // A method-less frame with an id still deserves an answer.
            None => {
                return id.map(|id| error_response(id, -32600, "Invalid Request: missing method"));
            }
        };
        let params = request.get("params").cloned().unwrap_or_else(|| json!({}));
        debug!(%method, "request");

        // Notifications carry no id and get no response.
        let id = match id {
            Some(id) => id,
            None => return None,
        };

        let response = match method.as_str() {
            "initialize" => ok_response(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {}, "resources": {}, "prompts": {} },
                    "serverInfo": {
                        "name": "reachy-mini-mcp",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            ),
            "ping" => ok_response(id, json!({})),
            "tools/list" => {
                let tools: Vec<Value> = self
                    .tools
                    .iter()
                    .map(|t| {
                        json!({
                            "name": t.name(),
                            "description": t.description(),
                            "inputSchema": t.parameters_schema(),
                        })
                    })
                    .collect();
                ok_response(id, json!({ "tools": tools }))
            }
            "tools/call" => self.call_tool(id, &params).await,
            "resources/list" => {
                let list: Vec<Value> = resources::list_resources()
                    .iter()
                    .map(|r| {
                        json!({
                            "uri": r.uri,
                            "name": r.name,
                            "description": r.description,
                            "mimeType": r.mime_type,
                        })
                    })
                    .collect();
                ok_response(id, json!({ "resources": list }))
            }
            "resources/read" => {
                let uri = params.get("uri").and_then(|u| u.as_str()).unwrap_or("");
                match resources::read_resource(uri) {
                    Some(text) => ok_response(
                        id,
                        json!({
                            "contents": [{
                                "uri": uri,
                                "mimeType": "application/json",
                                "text": text,
                            }]
                        }),
                    ),
                    None => error_response(id, -32602, &format!("Unknown resource: {uri}")),
                }
            }
            "prompts/list" => {
                let list: Vec<Value> = prompts::list_prompts()
                    .iter()
                    .map(|p| {
                        json!({
                            "name": p.name,
                            "description": p.description,
                            "arguments": p.arguments.iter().map(|a| json!({
                                "name": a.name,
                                "description": a.description,
                                "required": a.required,
                            })).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                ok_response(id, json!({ "prompts": list }))
            }
            "prompts/get" => {
                let name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
                let args = params
                    .get("arguments")
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                match prompts::get_prompt(name, &args) {
                    Some(messages) => {
                        let messages: Vec<Value> = messages
                            .iter()
                            .map(|m| {
                                json!({
                                    "role": m.role,
                                    "content": { "type": "text", "text": m.content },
                                })
                            })
                            .collect();
                        ok_response(id, json!({ "messages": messages }))
                    }
                    None => error_response(id, -32602, &format!("Unknown prompt: {name}")),
                }
            }
            other => error_response(id, -32601, &format!("Method not found: {other}")),
        };
        Some(response)
    }

    async fn call_tool(&self, id: Value, params: &Value) -> Value {
        let name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
        let args = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            return error_response(id, -32602, &format!("Unknown tool: {name}"));
        };

        // Tool failures (including propagated infrastructure errors) come
        // back as isError content so the agent can react; only protocol
        // misuse becomes a JSON-RPC error.
        match tool.execute(args).await {
            Ok(result) => ok_response(id, tool_result_content(&result)),
            Err(e) => {
                error!(tool = name, "tool execution failed: {e:#}");
                ok_response(
                    id,
                    json!({
                        "content": [{ "type": "text", "text": format!("{e:#}") }],
                        "isError": true,
                    }),
                )
            }
        }
    }
}

/// Map a [`ToolResult`] to MCP content blocks.
fn tool_result_content(result: &ToolResult) -> Value {
    let mut content = Vec::new();
    let text = if result.success {
        result.output.clone()
    } else {
        result
            .error
            .clone()
            .unwrap_or_else(|| "tool failed".to_string())
    };
    if !text.is_empty() {
        content.push(json!({ "type": "text", "text": text }));
    }
    for image in &result.images {
        content.push(json!({
            "type": "image",
            "data": image.data,
            "mimeType": image.mime_type,
        }));
    }
    json!({ "content": content, "isError": !result.success })
}

fn ok_response(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    })
}
