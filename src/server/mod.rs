//! History bridge server
//!
//! Newline-delimited JSON-RPC over stdio. Requests are dispatched in the order
//! they are read and answered as their operations complete; a single writer
//! task owns the output stream.

pub mod handlers;

use std::io;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::history::HistoryManager;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerInfo};
use handlers::{dispatch, DispatchError};

/// Serves a [`HistoryManager`] to the UI process
pub struct HistoryServer {
    manager: HistoryManager,
    server_info: ServerInfo,
}

impl HistoryServer {
    pub fn new(manager: HistoryManager) -> Self {
        Self::with_info(manager, ServerInfo::default())
    }

    pub fn with_info(manager: HistoryManager, server_info: ServerInfo) -> Self {
        Self {
            manager,
            server_info,
        }
    }

    pub fn manager(&self) -> &HistoryManager {
        &self.manager
    }

    /// Serve stdin/stdout until stdin closes
    pub async fn run(&self) -> io::Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve requests from `reader`, writing responses to `writer`
    ///
    /// Returns after the input ends and every in-flight request is answered.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let writer_task = tokio::spawn(write_lines(writer, rx));
        let mut in_flight = JoinSet::new();

        info!(path = %self.manager.path().display(), "history server ready");

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.handle_line(trimmed, &tx, &mut in_flight);
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "request task failed");
            }
        }

        drop(tx);
        writer_task.await.map_err(io::Error::other)??;
        debug!("history server input closed");
        Ok(())
    }

    fn handle_line(
        &self,
        line: &str,
        tx: &mpsc::UnboundedSender<String>,
        in_flight: &mut JoinSet<()>,
    ) {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                send(tx, &JsonRpcError::parse_error(e.to_string()));
                return;
            }
        };

        let Some(id) = request.id.clone() else {
            self.handle_notification(request, in_flight);
            return;
        };

        if !request.is_valid() {
            send(tx, &JsonRpcError::invalid_request(id, "jsonrpc must be '2.0'"));
            return;
        }

        match request.method.as_str() {
            "initialize" => {
                let result = json!({
                    "serverInfo": {
                        "name": self.server_info.name,
                        "version": self.server_info.version
                    },
                    "historyFile": self.manager.path().display().to_string(),
                    "maxEntries": self.manager.max_entries()
                });
                send(tx, &JsonRpcResponse::new(id, result));
            }
            "ping" => send(tx, &JsonRpcResponse::new(id, json!({}))),
            method => match dispatch(&self.manager, method, request.params) {
                Ok(pending) => {
                    let tx = tx.clone();
                    in_flight.spawn(async move {
                        let reply = pending.await;
                        match serde_json::to_value(reply) {
                            Ok(result) => send(&tx, &JsonRpcResponse::new(id, result)),
                            Err(e) => error!(error = %e, "failed to encode reply"),
                        }
                    });
                }
                Err(DispatchError::MethodNotFound) => {
                    send(tx, &JsonRpcError::method_not_found(id, method));
                }
                Err(DispatchError::InvalidParams(details)) => {
                    send(tx, &JsonRpcError::invalid_params(id, details));
                }
            },
        }
    }

    /// Run a request without an id; nothing is ever written back
    fn handle_notification(&self, request: JsonRpcRequest, in_flight: &mut JoinSet<()>) {
        if !request.is_valid() {
            debug!(method = %request.method, "ignoring invalid notification");
            return;
        }

        match request.method.as_str() {
            "initialize" | "ping" => {}
            method => match dispatch(&self.manager, method, request.params) {
                Ok(pending) => {
                    in_flight.spawn(async move {
                        pending.await;
                    });
                }
                Err(DispatchError::MethodNotFound) => {
                    debug!(method, "ignoring notification for unknown method");
                }
                Err(DispatchError::InvalidParams(details)) => {
                    debug!(method, details = %details, "ignoring notification with bad params");
                }
            },
        }
    }
}

fn send<T: Serialize>(tx: &mpsc::UnboundedSender<String>, message: &T) {
    match serde_json::to_string(message) {
        Ok(line) => {
            // Receiver only goes away after all senders are dropped
            let _ = tx.send(line);
        }
        Err(e) => error!(error = %e, "failed to encode response"),
    }
}

async fn write_lines<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<String>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    writer.shutdown().await
}
