//! Maps a completed HTTP exchange to the call's value or a typed failure.
//!
//! ```text
//!            ┌─ 400..=499 ─► ClientError { method, status }
//! status ────┼─ 500..=599 ─► ServerError { method, status }
//!            └─ otherwise ─► parse body ─┬─ invalid JSON ─► Decode { body }
//!                                         ├─ error != null ─► Application { code, message }
//!                                         └─ result
//! ```
//!
//! Both range bounds are inclusive, so 400 and 500 are errors. bitcoind
//! reports most RPC failures as HTTP 500 or 404 with a JSON error body;
//! that body is attached to the error when it parses, but the status alone
//! decides the outcome.

use serde_json::Value;
use tracing::debug;

use crate::codec::decode_response;
use crate::error::{RemoteError, RpcError};
use crate::transport::RawResponse;

/// Status ranges treated as failures regardless of the body.
const CLIENT_ERROR: std::ops::RangeInclusive<u16> = 400..=499;
const SERVER_ERROR: std::ops::RangeInclusive<u16> = 500..=599;

/// Classify a response for `method`. Only ever called with a complete body.
pub fn classify(method: &str, response: RawResponse) -> Result<Value, RpcError> {
    let RawResponse { status, body } = response;

    if CLIENT_ERROR.contains(&status) {
        let remote = remote_error(&body);
        debug!(method, status, code = ?remote.as_ref().map(|r| r.code), "client error");
        return Err(RpcError::ClientError {
            method: method.to_string(),
            status,
            remote,
        });
    }

    if SERVER_ERROR.contains(&status) {
        let remote = remote_error(&body);
        debug!(method, status, code = ?remote.as_ref().map(|r| r.code), "server error");
        return Err(RpcError::ServerError {
            method: method.to_string(),
            status,
            remote,
        });
    }

    let envelope = match decode_response(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(method, status, bytes = body.len(), "undecodable response body");
            return Err(RpcError::Decode {
                body,
                reason: e.to_string(),
            });
        }
    };

    if let Some(error) = envelope.error {
        let remote = RemoteError::from_value(error);
        debug!(method, code = remote.code, message = %remote.message, "application error");
        return Err(RpcError::Application {
            method: method.to_string(),
            code: remote.code,
            message: remote.message,
            data: remote.data,
        });
    }

    Ok(envelope.result)
}

/// JSON-RPC error object from an error body, if it carries one.
fn remote_error(body: &[u8]) -> Option<RemoteError> {
    decode_response(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(RemoteError::from_value)
}
