//! HTTP/1.1 message framing for JSON-RPC requests and responses.
//!
//! # Wire Format
//!
//! ```text
//! POST / HTTP/1.1\r\n
//! Host: 127.0.0.1:8332\r\n
//! Authorization: Basic dXNlcjpwYXNz\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 62\r\n
//! Connection: close\r\n
//! \r\n
//! {"jsonrpc":"1.0","id":"1","method":"getblockcount","params":[]}
//! ```
//!
//! Responses are delimited by `Transfer-Encoding: chunked`, `Content-Length`,
//! or the server closing the connection, in that order of precedence. The
//! body is always assembled completely before it is returned: a JSON document
//! split over several TCP segments or HTTP chunks is never handed out in
//! pieces.
//!
//! Header parsing is case-insensitive and handles both CRLF and LF line endings.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use super::{RawResponse, TransportError};
use crate::config::{Credentials, Endpoint};

/// Maximum response body size (100MB) to prevent OOM from malicious/buggy servers.
pub const MAX_BODY_SIZE: usize = 100 * 1024 * 1024;

/// Maximum length of the status line, a header line, or a chunk-size line.
const MAX_LINE_LEN: u64 = 16 * 1024;

fn protocol(msg: impl Into<String>) -> TransportError {
    TransportError::Protocol(msg.into())
}

/// Map a short read to a protocol error; keep other I/O failures as they are.
fn short_read(err: std::io::Error, what: &str) -> TransportError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        protocol(format!("Connection closed while reading {what}"))
    } else {
        TransportError::from(err)
    }
}

/// Write a complete POST request: head, then body, then flush.
///
/// `Connection: close` asks the server to close once it has answered, so a
/// response without a length still terminates.
pub async fn write_request<W>(
    writer: &mut W,
    endpoint: &Endpoint,
    credentials: &Credentials,
    body: &[u8],
) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    let head = format!(
        "POST {path} HTTP/1.1\r\n\
         Host: {host}\r\n\
         Authorization: {auth}\r\n\
         Content-Type: text/plain\r\n\
         Content-Length: {len}\r\n\
         Connection: close\r\n\
         \r\n",
        path = endpoint.path(),
        host = endpoint.authority(),
        auth = credentials.authorization_header(),
        len = body.len(),
    );

    writer.write_all(head.as_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await?;

    trace!(bytes = body.len(), "wrote request");
    Ok(())
}

/// Read one line, bounded by `MAX_LINE_LEN`. `None` on EOF.
async fn read_line<R>(reader: &mut R) -> Result<Option<String>, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let n = (&mut *reader)
        .take(MAX_LINE_LEN)
        .read_line(&mut line)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => protocol("Header line is not valid UTF-8"),
            _ => TransportError::from(e),
        })?;

    if n == 0 {
        return Ok(None);
    }
    if !line.ends_with('\n') && n as u64 >= MAX_LINE_LEN {
        return Err(protocol(format!(
            "Header line exceeds maximum {MAX_LINE_LEN} bytes"
        )));
    }
    Ok(Some(line))
}

/// Parse `HTTP/1.1 200 OK` into its status code.
fn parse_status_line(line: &str) -> Result<u16, TransportError> {
    let mut parts = line.trim().splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    let code = parts.next().unwrap_or_default();

    if !version.starts_with("HTTP/") {
        return Err(protocol(format!("Invalid status line: {:?}", line.trim())));
    }
    if code.len() != 3 {
        return Err(protocol(format!("Invalid status code: {code:?}")));
    }
    code.parse()
        .map_err(|_| protocol(format!("Invalid status code: {code:?}")))
}

/// Headers relevant to body framing.
#[derive(Debug, Default, PartialEq, Eq)]
struct BodyFraming {
    content_length: Option<usize>,
    chunked: bool,
}

/// Read headers until the blank line.
async fn read_headers<R>(reader: &mut R) -> Result<BodyFraming, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let mut framing = BodyFraming::default();

    loop {
        let line = read_line(reader)
            .await?
            .ok_or_else(|| protocol("Connection closed while reading headers"))?;

        // Trim both CRLF and LF line endings
        let trimmed = line.trim();

        // Empty line signals end of headers
        if trimmed.is_empty() {
            return Ok(framing);
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            return Err(protocol(format!("Malformed header line: {trimmed:?}")));
        };
        let key = key.trim();
        let value = value.trim();

        if key.eq_ignore_ascii_case("Content-Length") {
            let length: usize = value
                .parse()
                .map_err(|_| protocol(format!("Invalid Content-Length value: {value}")))?;
            if framing.content_length.is_some_and(|prev| prev != length) {
                return Err(protocol("Conflicting Content-Length headers"));
            }
            framing.content_length = Some(length);
        } else if key.eq_ignore_ascii_case("Transfer-Encoding") {
            framing.chunked = value
                .rsplit(',')
                .next()
                .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
        }
        // Ignore other headers (e.g., Content-Type, Date)
    }
}

/// Read a `Transfer-Encoding: chunked` body and concatenate every chunk.
async fn read_chunked_body<R>(reader: &mut R) -> Result<Vec<u8>, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::new();

    loop {
        let line = read_line(reader)
            .await?
            .ok_or_else(|| protocol("Connection closed before final chunk"))?;

        // Chunk extensions (";name=value") are ignored
        let size_field = line.trim().split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_field, 16)
            .map_err(|_| protocol(format!("Invalid chunk size: {size_field:?}")))?;

        if size == 0 {
            break;
        }
        if size > MAX_BODY_SIZE - body.len() {
            return Err(protocol(format!(
                "Response body exceeds maximum {MAX_BODY_SIZE} bytes"
            )));
        }

        let start = body.len();
        body.resize(start + size, 0);
        reader
            .read_exact(&mut body[start..])
            .await
            .map_err(|e| short_read(e, "chunk data"))?;

        match read_line(reader).await? {
            Some(crlf) if crlf.trim().is_empty() => {}
            _ => return Err(protocol("Missing CRLF after chunk data")),
        }

        trace!(chunk = size, total = body.len(), "read response chunk");
    }

    // Skip trailers up to the final blank line
    while let Some(line) = read_line(reader).await? {
        if line.trim().is_empty() {
            break;
        }
    }

    Ok(body)
}

/// Read a complete HTTP response.
///
/// # Protocol
///
/// 1. Read the status line (interim `1xx` responses are skipped)
/// 2. Read headers until an empty line
/// 3. Read the body: chunked, exactly Content-Length bytes, or until EOF
///
/// # Errors
///
/// Returns `TransportError::Protocol` if:
/// - The stream closes before the status line, headers or body are complete
/// - The status line or a header is malformed
/// - The body exceeds `MAX_BODY_SIZE` (100MB)
pub async fn read_response<R>(reader: &mut R) -> Result<RawResponse, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let (status, framing) = loop {
        let line = read_line(reader)
            .await?
            .ok_or_else(|| protocol("Connection closed before response status line"))?;
        let status = parse_status_line(&line)?;
        let framing = read_headers(reader).await?;

        if (100..200).contains(&status) && status != 101 {
            trace!(status, "skipping interim response");
            continue;
        }
        break (status, framing);
    };

    let body = if framing.chunked {
        read_chunked_body(reader).await?
    } else if let Some(length) = framing.content_length {
        if length > MAX_BODY_SIZE {
            return Err(protocol(format!(
                "Response body size {length} exceeds maximum {MAX_BODY_SIZE} bytes"
            )));
        }
        let mut body = vec![0u8; length];
        reader
            .read_exact(&mut body)
            .await
            .map_err(|e| short_read(e, "response body"))?;
        body
    } else {
        let mut body = Vec::new();
        (&mut *reader)
            .take(MAX_BODY_SIZE as u64 + 1)
            .read_to_end(&mut body)
            .await?;
        if body.len() > MAX_BODY_SIZE {
            return Err(protocol(format!(
                "Response body exceeds maximum {MAX_BODY_SIZE} bytes"
            )));
        }
        body
    };

    trace!(status, bytes = body.len(), "read response");
    Ok(RawResponse { status, body })
}
