//! The `RpcTransport` trait, the seam between the fetch adapter and
//! whatever client actually talks to a node.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// The async trait every JSON-RPC transport implements.
///
/// Implementations must be `Send + Sync` for use across Tokio tasks; the
/// trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// Send a single JSON-RPC request and return the response.
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// The transport's identifier (URL or name), used in logs.
    fn url(&self) -> &str;

    /// Convenience: call a method and return its `result`, mapping a node
    /// error object to [`TransportError::Rpc`]. A response for another
    /// request id is [`TransportError::IdMismatch`].
    async fn call(&self, id: u64, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        let resp = self.send(JsonRpcRequest::new(id, method, params)).await?;
        if !resp.answers(id) {
            return Err(TransportError::IdMismatch {
                sent: id,
                got: resp.id.unwrap_or_default(),
            });
        }
        resp.into_result().map_err(TransportError::Rpc)
    }
}
