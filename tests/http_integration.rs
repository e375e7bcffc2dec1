//! Integration tests for the full call path over real TCP.
//!
//! Each test starts a scripted stand-in for bitcoind on `127.0.0.1:0`,
//! records every request it receives, and answers according to a handler.
//! Responses can be framed with Content-Length, chunked (with pauses between
//! chunks), or delimited by closing the connection.
//!
//! # Running
//!
//! ```bash
//! cargo test --test http_integration -- --nocapture
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bitcoin_rpc_client::{ClientConfig, RpcClient, RpcError, TransportError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{ReadHalf, WriteHalf};
use tokio::net::TcpListener;

/// Upper bound for any single test.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Mock node
// =============================================================================

#[derive(Debug, Clone)]
struct RecordedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Debug, Clone)]
enum Framing {
    ContentLength,
    /// Body split into pieces of these sizes, flushed separately.
    Chunked(Vec<usize>),
    CloseDelimited,
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: Vec<u8>,
    framing: Framing,
    delay: Duration,
}

impl Reply {
    fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            framing: Framing::ContentLength,
            delay: Duration::ZERO,
        }
    }

    /// A well-formed JSON-RPC response echoing the request id.
    fn result(request: &RecordedRequest, result: Value) -> Self {
        let id = request.json()["id"].clone();
        Self::new(
            200,
            json!({"result": result, "error": null, "id": id}).to_string(),
        )
    }

    fn chunked(mut self, pieces: Vec<usize>) -> Self {
        self.framing = Framing::Chunked(pieces);
        self
    }

    fn close_delimited(mut self) -> Self {
        self.framing = Framing::CloseDelimited;
        self
    }

    fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> Reply + Send + Sync>;

struct MockNode {
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockNode {
    async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Handler = Arc::new(handler);

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let handler = handler.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let mut socket = socket;
                    let (read_half, mut write_half) = socket.split();
                    if let Some(request) = read_request(read_half).await {
                        recorded.lock().unwrap().push(request.clone());
                        let reply = handler(&request);
                        write_reply(&mut write_half, reply).await;
                    }
                });
            }
        });

        Self { port, requests }
    }

    fn config(&self) -> ClientConfig {
        ClientConfig::new("127.0.0.1", self.port, "alice", "s3cret").unwrap()
    }

    fn client(&self) -> RpcClient {
        RpcClient::new(self.config())
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: ReadHalf<'_>) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(socket);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await.ok()?;
    if request_line.is_empty() {
        return None;
    }

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await.ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let (key, value) = line.split_once(':')?;
        headers.push((key.trim().to_string(), value.trim().to_string()));
    }

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await.ok()?;

    Some(RecordedRequest {
        request_line: request_line.trim_end().to_string(),
        headers,
        body,
    })
}

async fn write_reply(socket: &mut WriteHalf<'_>, reply: Reply) {
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let mut head = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nConnection: close\r\n",
        reply.status
    );
    match &reply.framing {
        Framing::ContentLength => {
            head.push_str(&format!("Content-Length: {}\r\n", reply.body.len()))
        }
        Framing::Chunked(_) => head.push_str("Transfer-Encoding: chunked\r\n"),
        Framing::CloseDelimited => {}
    }
    head.push_str("\r\n");

    if socket.write_all(head.as_bytes()).await.is_err() {
        return;
    }

    match reply.framing {
        Framing::ContentLength | Framing::CloseDelimited => {
            let _ = socket.write_all(&reply.body).await;
        }
        Framing::Chunked(pieces) => {
            let mut rest = reply.body.as_slice();
            for size in pieces {
                let size = size.min(rest.len());
                if size == 0 {
                    break;
                }
                let (chunk, tail) = rest.split_at(size);
                let framed = [format!("{size:x}\r\n").as_bytes(), chunk, &b"\r\n"[..]].concat();
                if socket.write_all(&framed).await.is_err() {
                    return;
                }
                let _ = socket.flush().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
                rest = tail;
            }
            if !rest.is_empty() {
                let framed = [format!("{:x}\r\n", rest.len()).as_bytes(), rest, &b"\r\n"[..]].concat();
                let _ = socket.write_all(&framed).await;
            }
            let _ = socket.write_all(b"0\r\n\r\n").await;
        }
    }

    let _ = socket.flush().await;
    let _ = socket.shutdown().await;
}

/// Echo the request's params back as the result.
fn echo(request: &RecordedRequest) -> Reply {
    Reply::result(request, request.json()["params"].clone())
}

async fn with_timeout<F: std::future::Future>(future: F) -> F::Output {
    tokio::time::timeout(TEST_TIMEOUT, future)
        .await
        .expect("test timed out")
}

// =============================================================================
// Round trips
// =============================================================================

#[tokio::test]
async fn test_round_trip_preserves_method_and_params() {
    let node = MockNode::start(echo).await;
    let client = node.client();

    let params = vec![
        json!("bcrt1qw508d6qejxtdg4y5r3zarvary0c5xw7kygt080"),
        json!(0.25),
        json!(""),
        json!(false),
        json!(null),
        json!({"replaceable": true, "conf_target": [6]}),
    ];

    let value = with_timeout(client.call("sendtoaddress", params.clone()))
        .await
        .unwrap();
    assert_eq!(value, Value::Array(params.clone()));

    let requests = node.requests();
    assert_eq!(requests.len(), 1);
    let sent = requests[0].json();
    assert_eq!(sent["jsonrpc"], json!("1.0"));
    assert_eq!(sent["method"], json!("sendtoaddress"));
    assert_eq!(sent["params"], Value::Array(params));
    assert!(sent["id"].is_string());
}

#[tokio::test]
async fn test_request_headers() {
    let node = MockNode::start(|req| Reply::result(req, json!(101))).await;

    let height = with_timeout(node.client().call("getblockcount", vec![]))
        .await
        .unwrap();
    assert_eq!(height, json!(101));

    let request = &node.requests()[0];
    assert_eq!(request.request_line, "POST / HTTP/1.1");
    // base64("alice:s3cret")
    assert_eq!(request.header("authorization"), Some("Basic YWxpY2U6czNjcmV0"));
    assert_eq!(request.header("content-type"), Some("text/plain"));
    assert_eq!(
        request.header("content-length"),
        Some(request.body.len().to_string().as_str())
    );
    assert_eq!(
        request.header("host"),
        Some(format!("127.0.0.1:{}", node.port).as_str())
    );
}

#[tokio::test]
async fn test_wallet_path() {
    let node = MockNode::start(|req| Reply::result(req, json!(1.5))).await;
    let client = RpcClient::new(node.config().with_wallet("cold storage"));

    let balance = with_timeout(client.call("getbalance", vec![]))
        .await
        .unwrap();
    assert_eq!(balance, json!(1.5));
    assert_eq!(
        node.requests()[0].request_line,
        "POST /wallet/cold%20storage HTTP/1.1"
    );
}

#[tokio::test]
async fn test_ping() {
    let node = MockNode::start(|req| Reply::result(req, Value::Null)).await;
    let latency = with_timeout(node.client().ping()).await.unwrap();
    assert!(latency < TEST_TIMEOUT);
    assert_eq!(node.requests()[0].json()["method"], json!("ping"));
}

// =============================================================================
// Body framing
// =============================================================================

#[tokio::test]
async fn test_chunked_body_is_fully_assembled() {
    let hex = "ab".repeat(40_000);
    let expected = hex.clone();
    let node = MockNode::start(move |req| {
        Reply::result(req, json!(hex)).chunked(vec![1, 7, 4096, 3, 20_000])
    })
    .await;

    let value = with_timeout(node.client().call("getrawtransaction", vec![json!("00")]))
        .await
        .unwrap();
    assert_eq!(value, json!(expected));
}

#[tokio::test]
async fn test_close_delimited_body() {
    let node =
        MockNode::start(|req| Reply::result(req, json!({"chain": "regtest"})).close_delimited())
            .await;

    let info = with_timeout(node.client().call("getblockchaininfo", vec![]))
        .await
        .unwrap();
    assert_eq!(info, json!({"chain": "regtest"}));
}

#[tokio::test]
async fn test_typed_result() {
    let node = MockNode::start(|req| Reply::result(req, json!("00000000deadbeef"))).await;
    let hash: String = with_timeout(node.client().call_as("getblockhash", vec![json!(0)]))
        .await
        .unwrap();
    assert_eq!(hash, "00000000deadbeef");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_http_client_error() {
    let node = MockNode::start(|_| Reply::new(404, "")).await;
    match with_timeout(node.client().call("getblock", vec![json!("00")])).await {
        Err(RpcError::ClientError {
            method,
            status,
            remote,
        }) => {
            assert_eq!(method, "getblock");
            assert_eq!(status, 404);
            assert!(remote.is_none());
        }
        other => panic!("Expected ClientError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_server_error() {
    let node = MockNode::start(|_| Reply::new(503, "Work queue depth exceeded")).await;
    assert!(matches!(
        with_timeout(node.client().call("getblockcount", vec![])).await,
        Err(RpcError::ServerError { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_server_error_with_bitcoind_error_body() {
    let node = MockNode::start(|req| {
        let id = req.json()["id"].clone();
        Reply::new(
            500,
            json!({
                "result": null,
                "error": {"code": -8, "message": "Block height out of range"},
                "id": id,
            })
            .to_string(),
        )
    })
    .await;

    let err = with_timeout(node.client().call("getblockhash", vec![json!(99_999_999)]))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.remote_code(), Some(-8));
    match err {
        RpcError::ServerError {
            remote: Some(remote),
            ..
        } => assert_eq!(remote.message, "Block height out of range"),
        other => panic!("Expected ServerError with remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_application_error() {
    let node = MockNode::start(|req| {
        let id = req.json()["id"].clone();
        Reply::new(
            200,
            json!({
                "result": null,
                "error": {"code": -5, "message": "Block not found"},
                "id": id,
            })
            .to_string(),
        )
    })
    .await;

    match with_timeout(node.client().call("getblock", vec![json!("ff")])).await {
        Err(RpcError::Application {
            method,
            code,
            message,
            ..
        }) => {
            assert_eq!(method, "getblock");
            assert_eq!(code, -5);
            assert_eq!(message, "Block not found");
        }
        other => panic!("Expected Application error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_undecodable_body() {
    let node = MockNode::start(|_| Reply::new(200, "not-json").chunked(vec![3, 5])).await;
    match with_timeout(node.client().call("getblockcount", vec![])).await {
        Err(RpcError::Decode { body, .. }) => assert_eq!(body, b"not-json"),
        other => panic!("Expected Decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_method_never_connects() {
    let node = MockNode::start(echo).await;
    let err = with_timeout(node.client().call("getfoo", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::UnknownMethod(ref name) if name == "getfoo"));
    assert!(node.requests().is_empty());
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig::new("127.0.0.1", port, "alice", "s3cret").unwrap();
    let err = with_timeout(RpcClient::new(config).call("getblockcount", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RpcError::Transport(TransportError::ConnectionFailed(_))
    ));
}

// =============================================================================
// Timeouts, aborts, concurrency
// =============================================================================

#[tokio::test]
async fn test_configured_timeout() {
    let node =
        MockNode::start(|req| Reply::result(req, json!(1)).after(Duration::from_secs(5))).await;
    let client = RpcClient::new(node.config().with_timeout(Duration::from_millis(100)));

    let err = with_timeout(client.call("getblockcount", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RpcError::Transport(TransportError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_abort_in_flight_call() {
    let node =
        MockNode::start(|req| Reply::result(req, json!(1)).after(Duration::from_secs(5))).await;
    let client = node.client();

    let (call, handle) = client.call_abortable("getblockcount", vec![]);
    let aborter = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();
    };

    let (result, ()) = with_timeout(async { tokio::join!(call, aborter) }).await;
    assert!(matches!(result, Err(RpcError::Aborted)));
}

#[tokio::test]
async fn test_concurrent_calls_get_their_own_responses() {
    // Earlier heights answer later, so completions arrive out of order.
    let node = MockNode::start(|req| {
        let height = req.json()["params"][0].as_u64().unwrap_or(0);
        Reply::result(req, json!(format!("hash-{height}")))
            .after(Duration::from_millis(20 * (8 - height.min(8))))
    })
    .await;
    let client = node.client();

    let calls = (0..8u64).map(|height| client.call("getblockhash", vec![json!(height)]));
    let results = with_timeout(futures::future::join_all(calls)).await;

    for (height, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap(), json!(format!("hash-{height}")));
    }
    assert_eq!(node.requests().len(), 8);
}
