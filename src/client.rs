//! Dispatch facade: the single call path every RPC goes through.
//!
//! This module provides `RpcClient`, an async client that validates the
//! method against the registry, encodes a JSON-RPC 1.0 request, sends it
//! over a [`Transport`], and classifies the response.

use std::future::Future;
use std::time::{Duration, Instant};

use futures::future::{AbortHandle, Abortable};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::classify::classify;
use crate::codec::{encode, next_request_id, Invocation};
use crate::config::ClientConfig;
use crate::error::RpcError;
use crate::registry::Method;
use crate::transport::{HttpTransport, Transport, TransportError};

/// Client for a Bitcoin Core JSON-RPC endpoint.
///
/// The client holds only read-only state (its configuration and transport),
/// so one instance can serve any number of concurrent calls through `&self`.
/// Each call uses its own connection; responses complete in whatever order
/// their round trips finish.
///
/// # Call Lifecycle
///
/// 1. Reject names missing from the registry (`RpcError::UnknownMethod`, no I/O)
/// 2. Optionally check the argument count (`RpcError::InvalidArity`, no I/O)
/// 3. Encode, send, read the full body, classify
///
/// # Example
///
/// ```ignore
/// use bitcoin_rpc_client::{ClientConfig, RpcClient};
/// use serde_json::json;
///
/// let config = ClientConfig::new("127.0.0.1", 18443, "user", "pass")?;
/// let client = RpcClient::new(config);
///
/// let height = client.call("getblockcount", vec![]).await?;
/// let hash: String = client.call_as("getblockhash", vec![json!(0)]).await?;
/// ```
#[derive(Debug)]
pub struct RpcClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl RpcClient<HttpTransport> {
    /// Create a client that talks HTTP to the configured endpoint.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: HttpTransport::new(),
        }
    }
}

impl<T: Transport> RpcClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call `method` with positional `args` and return the raw `result`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The method is not registered (`RpcError::UnknownMethod`)
    /// - Arity checking is on and the count is out of range (`RpcError::InvalidArity`)
    /// - The connection fails or times out (`RpcError::Transport`)
    /// - HTTP 4xx / 5xx (`RpcError::ClientError` / `RpcError::ServerError`)
    /// - The body is not a JSON-RPC object (`RpcError::Decode`)
    /// - The server returns a JSON-RPC error (`RpcError::Application`)
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, RpcError> {
        let method =
            Method::from_name(method).ok_or_else(|| RpcError::UnknownMethod(method.to_string()))?;
        self.call_method(method, args).await
    }

    /// Same as [`call`](Self::call) for an already-resolved [`Method`].
    pub async fn call_method(&self, method: Method, args: Vec<Value>) -> Result<Value, RpcError> {
        self.check_arity(method, args.len())?;

        let invocation = Invocation::new(method, args);
        let id = next_request_id();
        let body = encode(&invocation, &id)?;

        debug!(method = method.as_str(), id = %id, params = invocation.args.len(), "dispatching rpc call");

        let exchange = self
            .transport
            .send(body, self.config.credentials(), self.config.endpoint());
        // The configured limit applies to every transport, not just HTTP.
        let response = match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| TransportError::Timeout(limit))??,
            None => exchange.await?,
        };

        let result = classify(method.as_str(), response);
        if result.is_ok() {
            debug!(method = method.as_str(), id = %id, "rpc call succeeded");
        }
        result
    }

    /// Call and deserialize the result into `R`.
    ///
    /// A result that does not fit `R` is reported as `RpcError::Decode`
    /// carrying the JSON text of the result.
    pub async fn call_as<R>(&self, method: &str, args: Vec<Value>) -> Result<R, RpcError>
    where
        R: DeserializeOwned,
    {
        let value = self.call(method, args).await?;
        R::deserialize(&value).map_err(|e| RpcError::Decode {
            body: value.to_string().into_bytes(),
            reason: e.to_string(),
        })
    }

    /// Race one call against a timer.
    ///
    /// On expiry the in-flight exchange is dropped, which closes its
    /// connection, and `TransportError::Timeout` is returned.
    pub async fn call_with_timeout(
        &self,
        method: &str,
        args: Vec<Value>,
        limit: Duration,
    ) -> Result<Value, RpcError> {
        tokio::time::timeout(limit, self.call(method, args))
            .await
            .map_err(|_| RpcError::Transport(TransportError::Timeout(limit)))?
    }

    /// Start a call that can be cancelled from elsewhere.
    ///
    /// Calling `abort()` on the returned handle resolves the future with
    /// `RpcError::Aborted` and drops the exchange, releasing its connection.
    /// Aborting after completion has no effect.
    pub fn call_abortable<'a>(
        &'a self,
        method: &'a str,
        args: Vec<Value>,
    ) -> (impl Future<Output = Result<Value, RpcError>> + 'a, AbortHandle) {
        let (handle, registration) = AbortHandle::new_pair();
        let call = Abortable::new(self.call(method, args), registration);
        let future = async move {
            match call.await {
                Ok(result) => result,
                Err(_aborted) => Err(RpcError::Aborted),
            }
        };
        (future, handle)
    }

    /// Round-trip latency of a `ping` call.
    pub async fn ping(&self) -> Result<Duration, RpcError> {
        let started = Instant::now();
        self.call_method(Method::Ping, vec![]).await?;
        Ok(started.elapsed())
    }

    fn check_arity(&self, method: Method, count: usize) -> Result<(), RpcError> {
        if !self.config.arity_check() {
            return Ok(());
        }
        let descriptor = method.descriptor();
        if descriptor.accepts(count) {
            return Ok(());
        }
        Err(RpcError::InvalidArity {
            method: method.as_str().to_string(),
            min: descriptor.min_args(),
            max: descriptor.max_args(),
            actual: count,
        })
    }
}
