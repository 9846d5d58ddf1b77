// MCP server: JSON-RPC 2.0 dispatch over stdio

use crate::prompts::PromptRegistry;
use crate::protocol::{
    CallToolParams, GetPromptParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListPromptsResult, ListToolsResult, PromptsCapability, ServerCapabilities,
    ServerInfo, ToolsCapability, PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::Result;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, LinesCodec};

/// Name advertised in the initialize handshake.
pub const SERVER_NAME: &str = "fred-mcp";

pub struct McpServer {
    tools: ToolRegistry,
    prompts: PromptRegistry,
}

impl McpServer {
    pub fn new(tools: ToolRegistry, prompts: PromptRegistry) -> Self {
        Self { tools, prompts }
    }

    /// Map one request to at most one response.
    ///
    /// Notifications (no id) produce `None`. Tool failures never surface
    /// here as JSON-RPC errors: `tools/call` always succeeds at the RPC
    /// layer and carries an error-flagged result instead.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id?;
        let params = request.params.unwrap_or(serde_json::Value::Null);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.initialize_result()),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.tools.list_schemas(),
                },
            ),
            "tools/call" => match serde_json::from_value::<CallToolParams>(params) {
                Ok(call) => {
                    tracing::info!(tool = %call.name, "tool call");
                    let result = self.tools.dispatch(&call.name, call.arguments).await;
                    JsonRpcResponse::success(id, result)
                }
                Err(e) => JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("invalid tools/call params: {}", e)),
                ),
            },
            "prompts/list" => JsonRpcResponse::success(
                id,
                ListPromptsResult {
                    prompts: self.prompts.list_schemas(),
                },
            ),
            "prompts/get" => match serde_json::from_value::<GetPromptParams>(params) {
                Ok(get) => {
                    let arguments = get.arguments.unwrap_or_default();
                    match self.prompts.render(&get.name, &arguments) {
                        Some(result) => JsonRpcResponse::success(id, result),
                        None => JsonRpcResponse::error(
                            id,
                            JsonRpcError::invalid_params(format!("Unknown prompt: {}", get.name)),
                        ),
                    }
                }
                Err(e) => JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("invalid prompts/get params: {}", e)),
                ),
            },
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        };

        Some(response)
    }

    fn initialize_result(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
                prompts: Some(PromptsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Serve requests from stdin until EOF.
    ///
    /// Each request runs in its own task over the shared immutable server,
    /// so a slow upstream call never blocks other requests; responses are
    /// funneled through one writer task, one JSON object per line.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut lines = FramedRead::new(stdin, LinesCodec::new());

        let (tx, mut rx) = mpsc::channel::<String>(64);
        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(line) = rx.recv().await {
                if stdout.write_all(line.as_bytes()).await.is_err() {
                    break;
                }
                if stdout.write_all(b"\n").await.is_err() {
                    break;
                }
                let _ = stdout.flush().await;
            }
        });

        while let Some(line) = lines.next().await {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => {
                    let server = self.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Some(response) = server.handle_request(request).await {
                            match serde_json::to_string(&response) {
                                Ok(json) => {
                                    let _ = tx.send(json).await;
                                }
                                Err(e) => {
                                    tracing::error!(error = %e, "failed to serialize response")
                                }
                            }
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse request line");
                    let response = JsonRpcResponse::error(
                        serde_json::Value::Null,
                        JsonRpcError::parse_error(),
                    );
                    if let Ok(json) = serde_json::to_string(&response) {
                        let _ = tx.send(json).await;
                    }
                }
            }
        }

        drop(tx);
        let _ = writer.await;
        tracing::info!("stdin closed, shutting down");
        Ok(())
    }
}
