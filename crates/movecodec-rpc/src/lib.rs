//! movecodec-rpc: fetching on-chain objects and decoding them with a
//! [`Reified`](movecodec_core::Reified) descriptor.
//!
//! # Overview
//!
//! - [`RpcTransport`]: the async seam a JSON-RPC client implements
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`]: wire types
//! - [`ObjectReader`] / [`SuiRpcReader`]: `sui_getObject` on top of a transport
//! - [`fetch`] / [`fetch_parsed`]: one request, one decoded value
//!
//! Transports themselves (HTTP, WebSocket) and session concerns such as
//! retries or pooling live outside this crate.

pub mod error;
pub mod fetch;
pub mod object;
pub mod reader;
pub mod request;
pub mod transport;

pub use error::{FetchError, TransportError};
pub use fetch::{fetch, fetch_parsed, fetch_with, FetchConfig};
pub use object::{ObjectData, ObjectResponse, ObjectResponseError, RawObject};
pub use reader::{ObjectReader, ReadMode, SuiRpcReader};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use transport::RpcTransport;
