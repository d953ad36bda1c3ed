//! Protocol types for the UI bridge
//!
//! Requests and protocol-level errors follow JSON-RPC 2.0. Operation results
//! are wrapped in an [`IpcReply`] envelope so history failures reach the UI as
//! data rather than as transport errors.

mod ipc;
mod jsonrpc;

pub use ipc::{IpcReply, ServerInfo};
pub use jsonrpc::{ErrorObject, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
