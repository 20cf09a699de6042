//! MCP server loop
//!
//! Reads newline-delimited JSON-RPC messages, answers the lifecycle and
//! tool methods, and runs `tools/call` requests concurrently. Responses are
//! funneled through a single writer task so lines never interleave.

use super::error::McpError;
use super::protocol::{
    MCP_PROTOCOL_VERSION, McpMessage, McpNotification, McpRequest, McpResponse, methods,
};
use super::types::{
    CallToolParams, InitializeResult, McpCapabilities, McpServerInfo, McpTool, McpToolResult,
};
use crate::tools::executor::ToolExecutor;
use crate::tools::types::ToolCall;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

/// Capacity of the outgoing response queue
const OUTBOX_CAPACITY: usize = 64;

/// MCP server exposing a tool executor
pub struct McpServer {
    info: McpServerInfo,
    executor: Arc<ToolExecutor>,
}

impl McpServer {
    /// Create a server over an executor
    pub fn new(info: McpServerInfo, executor: Arc<ToolExecutor>) -> Self {
        Self { info, executor }
    }

    /// Server identification
    pub fn info(&self) -> &McpServerInfo {
        &self.info
    }

    /// Serve over the process's stdin and stdout
    pub async fn serve_stdio(&self) -> Result<(), McpError> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await
    }

    /// Serve until the reader reaches EOF
    ///
    /// Pending tool calls are allowed to finish and their responses are
    /// written before this returns, also when reading fails.
    pub async fn serve<R, W>(&self, mut reader: R, writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<McpResponse>(OUTBOX_CAPACITY);
        let writer_task = tokio::spawn(write_responses(writer, rx));
        let mut in_flight = JoinSet::new();
        let mut buf = Vec::new();

        let read_result = loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break Ok(()),
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Reading from client failed");
                    break Err(McpError::from(e));
                }
            }

            let line = buf.trim_ascii();
            if line.is_empty() {
                continue;
            }

            // Invalid UTF-8 surfaces here as a JSON error.
            let message: McpMessage = match serde_json::from_slice(line) {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "Skipping unparsable message");
                    continue;
                }
            };

            match message {
                McpMessage::Request(request) if request.method == methods::TOOLS_CALL => {
                    let executor = Arc::clone(&self.executor);
                    let tx = tx.clone();
                    in_flight.spawn(async move {
                        let response = call_tool(&executor, request).await;
                        let _ = tx.send(response).await;
                    });
                }
                McpMessage::Request(request) => {
                    let response = self.handle_request(request);
                    if tx.send(response).await.is_err() {
                        break Ok(());
                    }
                }
                McpMessage::Notification(notification) => self.handle_notification(&notification),
                McpMessage::Response(response) => {
                    debug!(id = %response.id, "Ignoring response from client");
                }
            }

            // Reap finished calls so the set does not grow without bound.
            while in_flight.try_join_next().is_some() {}
        };

        debug!(pending = in_flight.len(), "Input closed, draining tool calls");
        while in_flight.join_next().await.is_some() {}

        drop(tx);
        let write_result = writer_task
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;
        read_result.and(write_result)
    }

    fn handle_request(&self, request: McpRequest) -> McpResponse {
        debug!(method = %request.method, id = %request.id, "Handling request");
        let result = match request.method.as_str() {
            methods::INITIALIZE => Ok(self.initialize_result()),
            methods::PING => Ok(json!({})),
            methods::TOOLS_LIST => Ok(self.tools_list_result()),
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        match result {
            Ok(value) => McpResponse::success(request.id, value),
            Err(e) => McpResponse::error(request.id, e.to_rpc_error()),
        }
    }

    fn handle_notification(&self, notification: &McpNotification) {
        match notification.method.as_str() {
            methods::INITIALIZED => info!("Client initialized"),
            methods::CANCELLED => debug!("Cancellation requested; calls run to completion"),
            other => debug!(method = other, "Ignoring notification"),
        }
    }

    fn initialize_result(&self) -> Value {
        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: McpCapabilities::default(),
            server_info: self.info.clone(),
        };
        serde_json::to_value(result).unwrap_or(Value::Null)
    }

    fn tools_list_result(&self) -> Value {
        let tools: Vec<McpTool> = self.executor.schemas().iter().map(McpTool::from).collect();
        json!({ "tools": tools })
    }
}

#[instrument(skip_all, fields(id = %request.id))]
async fn call_tool(executor: &ToolExecutor, request: McpRequest) -> McpResponse {
    let params = match request.parse_params::<CallToolParams>() {
        Ok(params) => params,
        Err(e) => return McpResponse::error(request.id, e.to_rpc_error()),
    };

    if !(params.arguments.is_object() || params.arguments.is_null()) {
        let err = McpError::InvalidParams("'arguments' must be an object".to_string());
        return McpResponse::error(request.id, err.to_rpc_error());
    }

    let call = ToolCall::from_json(request.id.to_string(), &params.name, params.arguments);
    let result = executor.execute_tool(&call).await;

    match serde_json::to_value(McpToolResult::from(&result)) {
        Ok(value) => McpResponse::success(request.id, value),
        Err(e) => McpResponse::error(request.id, McpError::from(e).to_rpc_error()),
    }
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::Receiver<McpResponse>) -> Result<(), McpError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_string(&response)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    writer.shutdown().await?;
    Ok(())
}
