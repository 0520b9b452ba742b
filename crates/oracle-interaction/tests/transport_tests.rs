use oracle_core::OracleError;
use oracle_interaction::transport::UNREADABLE_ERROR_BODY;
use oracle_interaction::{HttpRequest, HttpTransport, NoDelay, RequestExecutor, ReqwestTransport};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Promises 100 bytes of body, sends 5, then hangs up.
const TRUNCATED_500: &str =
    "HTTP/1.1 500 Internal Server Error\r\nContent-Type: text/plain\r\nContent-Length: 100\r\n\r\nshort";

/// Reads one request (headers plus `content-length` bytes of body).
async fn drain_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + content_length {
            return;
        }
    }
}

/// Serves `raw` to every connection and counts them.
async fn spawn_server(raw: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));

    let counter = connections.clone();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drain_request(&mut stream).await;
            let _ = stream.write_all(raw.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://{addr}/v1beta/models/m:generateContent"), connections)
}

fn request(url: &str) -> HttpRequest {
    HttpRequest {
        url: url.to_string(),
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body: b"{}".to_vec(),
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_unreadable_error_body_is_still_a_response() {
    let (url, _) = spawn_server(TRUNCATED_500).await;

    let response = ReqwestTransport::new()
        .post(&request(&url))
        .await
        .expect("The server answered, so this is a response");

    assert_eq!(response.status, 500);
    assert_eq!(response.body, UNREADABLE_ERROR_BODY);
}

#[tokio::test]
async fn test_unreadable_error_body_is_not_retried() {
    let (url, connections) = spawn_server(TRUNCATED_500).await;
    let executor =
        RequestExecutor::new(Arc::new(ReqwestTransport::new())).with_delay(Arc::new(NoDelay));

    let err = executor
        .execute(&url, "key", &json!({}), Duration::from_secs(5), 3)
        .await
        .expect_err("Should fail");

    assert_eq!(err, OracleError::api(500, "Internal Server Error"));
    assert_eq!(connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_complete_error_body_is_passed_through() {
    const FORBIDDEN: &str =
        "HTTP/1.1 403 Forbidden\r\nContent-Type: text/plain\r\nContent-Length: 6\r\n\r\nnope!!";
    let (url, _) = spawn_server(FORBIDDEN).await;

    let response = ReqwestTransport::new().post(&request(&url)).await.unwrap();

    assert_eq!(response.status, 403);
    assert_eq!(response.body, "nope!!");
}
