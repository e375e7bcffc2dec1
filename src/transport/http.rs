//! HTTP transport over a fresh TCP connection per call.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use super::framing::{read_response, write_request};
use super::{RawResponse, Transport, TransportError};
use crate::config::{Credentials, Endpoint};

/// Production transport: one `TcpStream` per call, released on every exit
/// path when the exchange future completes or is dropped.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    /// Upper bound for connect + write + read, if any.
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Connect, send the request, read the complete response (internal, no timeout).
    async fn exchange(
        &self,
        body: &[u8],
        credentials: &Credentials,
        endpoint: &Endpoint,
    ) -> Result<RawResponse, TransportError> {
        let stream = TcpStream::connect((endpoint.host(), endpoint.port()))
            .await
            .map_err(TransportError::ConnectionFailed)?;
        // Single request/response; Nagle only adds latency here.
        let _ = stream.set_nodelay(true);
        trace!(%endpoint, "connected");

        let (read_half, mut write_half) = stream.into_split();

        write_request(&mut write_half, endpoint, credentials, body).await?;

        let mut reader = BufReader::new(read_half);
        read_response(&mut reader).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        body: Vec<u8>,
        credentials: &Credentials,
        endpoint: &Endpoint,
    ) -> Result<RawResponse, TransportError> {
        let response = match self.timeout {
            Some(limit) => timeout(limit, self.exchange(&body, credentials, endpoint))
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => self.exchange(&body, credentials, endpoint).await,
        };

        if let Err(e) = &response {
            debug!(%endpoint, error = %e, "transport failure");
        }
        response
    }
}
