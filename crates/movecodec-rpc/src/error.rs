//! Transport and fetch error types.

use movecodec_core::{DecodeError, TypeNameError};
use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors raised by an [`RpcTransport`](crate::RpcTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response. Transport implementations
    /// report connection and HTTP status failures here.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// The response carries a different request id.
    #[error("Response id {got} does not match request id {sent}")]
    IdMismatch { sent: u64, got: u64 },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

/// Errors returned by [`fetch`](crate::fetch).
///
/// No retry happens inside the adapter; every failure surfaces here.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The node reported no object at `id` (deleted, never existed, ...).
    #[error("Object {id} not found ({code})")]
    NotFound { id: String, code: String },

    /// The object exists but is not the type the descriptor stands for.
    #[error("Object {id} is not a {expected} (got {got})")]
    WrongType {
        id: String,
        expected: String,
        got: String,
    },

    /// The response is well-formed JSON but lacks data the mode asked for.
    #[error("Malformed response for object {id}: {reason}")]
    MalformedResponse { id: String, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid object type: {0}")]
    TypeName(#[from] TypeNameError),
}
