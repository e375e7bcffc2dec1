//! Error types for RPC dispatch.
//!
//! Every failure a call can produce is a variant of [`RpcError`]. None of
//! them are retried internally; retry policy belongs to the caller.

use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

/// Number of body bytes shown when a response fails to decode.
const BODY_PREVIEW_LEN: usize = 256;

/// JSON-RPC error object returned by the remote service.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    /// JSON-RPC error code (bitcoind uses negative codes, e.g. -5 for "not found")
    pub code: i64,
    /// Human-readable message
    pub message: String,
    /// Optional additional data
    pub data: Option<Value>,
}

impl RemoteError {
    /// Build a `RemoteError` from the raw `error` member of a response envelope.
    ///
    /// Well-formed objects carry a numeric `code` and a string `message`.
    /// Anything else is still surfaced: the code falls back to 0 and the
    /// message becomes the JSON text of the value.
    pub fn from_value(value: Value) -> Self {
        let code = value.get("code").and_then(Value::as_i64);
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);

        match (code, message) {
            (Some(code), Some(message)) => Self {
                code,
                message,
                data: value.get("data").cloned(),
            },
            (code, message) => Self {
                code: code.unwrap_or(0),
                message: message.unwrap_or_else(|| value.to_string()),
                data: None,
            },
        }
    }
}

/// Errors that can occur while dispatching a remote call.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The method name is not in the registry. Raised before any I/O.
    #[error("Unknown RPC method: {0}")]
    UnknownMethod(String),

    /// Argument count outside the range the registry declares.
    ///
    /// Only produced when arity checking is enabled on the client config.
    #[error("{method} takes {min} to {max} arguments, got {actual}")]
    InvalidArity {
        method: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// HTTP 4xx.
    #[error("Client error calling {method}: HTTP {status}")]
    ClientError {
        method: String,
        status: u16,
        /// JSON-RPC error object, when the body carried one
        remote: Option<RemoteError>,
    },

    /// HTTP 5xx.
    #[error("Server error calling {method}: HTTP {status}")]
    ServerError {
        method: String,
        status: u16,
        /// JSON-RPC error object, when the body carried one
        remote: Option<RemoteError>,
    },

    /// The response body is not valid JSON (or not the expected shape).
    #[error("Failed to decode response: {reason} (body: {})", body_preview(.body))]
    Decode {
        /// The complete raw body as received
        body: Vec<u8>,
        reason: String,
    },

    /// The remote service answered with a non-null JSON-RPC `error`.
    #[error("RPC error {code} from {method}: {message}")]
    Application {
        method: String,
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// Connection-level failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The call was aborted through its `AbortHandle`.
    #[error("RPC call aborted")]
    Aborted,
}

impl RpcError {
    /// The remote JSON-RPC error code, if the failure carried one.
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            RpcError::Application { code, .. } => Some(*code),
            RpcError::ClientError { remote, .. } | RpcError::ServerError { remote, .. } => {
                remote.as_ref().map(|r| r.code)
            }
            _ => None,
        }
    }

    /// HTTP status for client/server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            RpcError::ClientError { status, .. } | RpcError::ServerError { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Lossy UTF-8 prefix of a response body for error messages.
fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= BODY_PREVIEW_LEN {
        return text.into_owned();
    }
    let prefix: String = text.chars().take(BODY_PREVIEW_LEN).collect();
    format!("{prefix}...")
}
