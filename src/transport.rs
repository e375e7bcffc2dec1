//! Network transport for JSON-RPC calls.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   POST / HTTP/1.1 + Basic auth   ┌──────────────┐
//! │  RpcClient   │ ───────────────────────────────► │   bitcoind   │
//! │ (Transport)  │ ◄─────────────────────────────── │  (JSON-RPC)  │
//! └──────────────┘   status + complete body         └──────────────┘
//! ```
//!
//! Every call opens its own connection, writes the full request, and reads
//! the complete response body before returning. Nothing is pooled, so
//! concurrent calls never share a socket.
//!
//! Dropping the future returned by [`Transport::send`] closes the socket,
//! which is how timeouts and aborts release the connection.

mod framing;
mod http;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Credentials, Endpoint};

pub use framing::{read_response, write_request, MAX_BODY_SIZE};
pub use http::HttpTransport;

/// Status and fully assembled body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not reach the endpoint (refused, unreachable, DNS failure).
    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] std::io::Error),

    /// The exchange did not finish in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Malformed HTTP from the server.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// I/O error after the connection was established.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound
            | std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::AddrNotAvailable => TransportError::ConnectionFailed(err),
            _ => TransportError::Io(err),
        }
    }
}

/// Trait for the network exchange behind every RPC call.
///
/// This trait abstracts the HTTP layer to enable:
/// - Spy and stub transports in tests
/// - Alternative carriers without touching dispatch logic
///
/// Implementations perform at most one round trip per call and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `endpoint` authenticated with `credentials`.
    async fn send(
        &self,
        body: Vec<u8>,
        credentials: &Credentials,
        endpoint: &Endpoint,
    ) -> Result<RawResponse, TransportError>;
}
