//! Bitcoin Core JSON-RPC client.
//!
//! This library provides the dispatch and transport layer for calling a
//! Bitcoin Core node over JSON-RPC 1.0 / HTTP:
//!
//! - `registry` - Static table of every known RPC method and its arguments
//! - `codec` - JSON-RPC request/response envelopes
//! - `transport` - Authenticated HTTP exchange with full-body reads
//! - `classify` - Maps HTTP status and JSON-RPC errors to `RpcError`
//! - `client` - `RpcClient`, the single entry point for every call
//! - `config` - Endpoint, credentials, bitcoin.conf and cookie handling
//!
//! # Usage
//!
//! ```ignore
//! use bitcoin_rpc_client::{ClientConfig, RpcClient};
//! use serde_json::json;
//!
//! let config = ClientConfig::new("127.0.0.1", 8332, "user", "password")?;
//! let client = RpcClient::new(config);
//! let block = client.call("getblock", vec![json!(hash), json!(1)]).await?;
//! ```

pub mod classify;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod registry;
pub mod transport;

pub use client::RpcClient;
pub use config::{ClientConfig, ConfigError, Credentials, Endpoint, Network};
pub use error::{RemoteError, RpcError};
pub use registry::{Method, MethodDescriptor, MethodGroup};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
