//! Object readers: one `get_object` call per fetch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use movecodec_core::Address;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::TransportError;
use crate::object::ObjectResponse;
use crate::transport::RpcTransport;

/// Which representation to request from the node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// `showBcs`: raw bytes, decoded with the descriptor's layout.
    #[default]
    Bcs,
    /// `showContent`: typed fields, cross-checked against declared types.
    Content,
}

impl ReadMode {
    fn options(self) -> serde_json::Value {
        match self {
            ReadMode::Bcs => json!({ "showType": true, "showBcs": true }),
            ReadMode::Content => json!({ "showType": true, "showContent": true }),
        }
    }
}

impl std::fmt::Display for ReadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bcs => write!(f, "bcs"),
            Self::Content => write!(f, "content"),
        }
    }
}

/// Anything that can look up a single object by id.
#[async_trait]
pub trait ObjectReader: Send + Sync {
    async fn get_object(&self, id: &Address, mode: ReadMode) -> Result<ObjectResponse, TransportError>;
}

/// [`ObjectReader`] over a JSON-RPC transport, using `sui_getObject`.
pub struct SuiRpcReader {
    transport: Arc<dyn RpcTransport>,
    next_id: AtomicU64,
}

impl SuiRpcReader {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        self.transport.url()
    }
}

#[async_trait]
impl ObjectReader for SuiRpcReader {
    async fn get_object(&self, id: &Address, mode: ReadMode) -> Result<ObjectResponse, TransportError> {
        let req_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(url = %self.transport.url(), object_id = %id, %mode, req_id, "sui_getObject");
        let result = self
            .transport
            .call(req_id, "sui_getObject", vec![json!(id.to_hex_literal()), mode.options()])
            .await?;
        Ok(serde_json::from_value(result)?)
    }
}
