//! JSON-RPC 1.0 request/response envelopes.
//!
//! # Wire Format
//!
//! ```text
//! request:  {"jsonrpc":"1.0","id":"7","method":"getblockhash","params":[0]}
//! response: {"result":"000000000019d6...","error":null,"id":"7"}
//! ```
//!
//! Arguments are written exactly as supplied: nothing is dropped, reordered
//! or coerced, and `null` passes through.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;
use crate::registry::Method;

/// Protocol version tag sent with every request.
pub const JSONRPC_VERSION: &str = "1.0";

/// Process-wide request ID counter.
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Generate the next request ID.
///
/// IDs increase monotonically across every client in the process. They are
/// only used for tracing; responses are matched by connection, not by ID.
pub fn next_request_id() -> String {
    NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed).to_string()
}

/// One call: a registered method plus its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub method: Method,
    pub args: Vec<Value>,
}

impl Invocation {
    pub fn new(method: Method, args: Vec<Value>) -> Self {
        Self { method, args }
    }
}

/// Wire-level request object.
#[derive(Debug, Serialize)]
pub struct RequestEnvelope<'a> {
    pub jsonrpc: &'static str,
    pub id: &'a str,
    pub method: &'a str,
    pub params: &'a [Value],
}

impl<'a> RequestEnvelope<'a> {
    pub fn new(invocation: &'a Invocation, id: &'a str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: invocation.method.as_str(),
            params: &invocation.args,
        }
    }
}

/// Wire-level response object.
///
/// A missing `result` decodes as `null`; a `null` error decodes as `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

/// Serialize an invocation into a request body.
pub fn encode(invocation: &Invocation, id: &str) -> Result<Vec<u8>, RpcError> {
    serde_json::to_vec(&RequestEnvelope::new(invocation, id)).map_err(RpcError::Encode)
}

/// Parse a complete response body.
///
/// The body must be a JSON object; arrays and scalars are rejected even
/// though serde would map a sequence onto the envelope fields.
pub fn decode_response(body: &[u8]) -> Result<ResponseEnvelope, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom(
            "expected a JSON-RPC response object",
        ));
    }
    serde_json::from_value(value)
}
