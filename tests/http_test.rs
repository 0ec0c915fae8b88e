//! reqwest経由のエンドツーエンドテスト
//!
//! ループバックに1回だけ応答するHTTPサーバーを立てて検証

mod common;

use common::{jpeg_bytes, PLOV_RESPONSE};
use food_detect::error::FoodDetectError;
use food_detect::submit::Submitter;
use food_detect::transport::ReqwestTransport;
use food_detect::workflow::Workflow;
use serde_json::Value;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

async fn read_request(socket: &mut TcpStream) -> (String, Vec<u8>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                let body = buf[end + 4..end + 4 + content_length].to_vec();
                return (head, body);
            }
        }
    }
    (String::new(), Vec::new())
}

/// 1回だけ応答するサーバー。受信したヘッダとボディを返す
async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<(String, Vec<u8>)>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{}/prod/predict", addr), handle)
}

fn transport() -> ReqwestTransport {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    ReqwestTransport::with_client(client)
}

#[tokio::test]
async fn test_end_to_end_plov() {
    let (url, server) = serve_once("200 OK", PLOV_RESPONSE.to_string()).await;

    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("plov.jpg");
    let bytes = jpeg_bytes(16, 16);
    std::fs::write(&path, &bytes).unwrap();

    let mut workflow = Workflow::new(Submitter::new(transport(), Some(url)));
    workflow.select(&path, None).await.unwrap();
    let response = workflow.submit().await.unwrap();

    let detection = &response.detections()[0];
    assert_eq!(detection.class, "plov");
    assert_eq!(detection.top_confidence, 0.92);
    assert_eq!(detection.bbox, [10.0, 20.0, 100.0, 120.0]);
    assert_eq!(workflow.state().response(), Some(&response));

    let (head, body) = server.await.unwrap();
    assert!(head.starts_with("post /prod/predict"));
    assert!(head.contains("content-type: application/json"));

    let payload: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["image_name"], "plov.jpg");
    assert_eq!(payload["content_type"], "jpeg");
    use base64::Engine as _;
    let sent = base64::engine::general_purpose::STANDARD
        .decode(payload["image_data"].as_str().unwrap())
        .unwrap();
    assert_eq!(sent, bytes);
}

#[tokio::test]
async fn test_end_to_end_server_error() {
    let (url, server) = serve_once("500 Internal Server Error", "server error".to_string()).await;

    let submitter = Submitter::new(transport(), Some(url));
    let image = common::selected("plov.jpg", "image/jpeg", &jpeg_bytes(4, 4));
    let err = submitter.submit(&image).await.unwrap_err();

    assert!(matches!(err, FoodDetectError::Request { status: 500, .. }));
    assert_eq!(err.to_string(), "API returned 500: server error");
    server.await.unwrap();
}

#[tokio::test]
async fn test_connection_refused() {
    // 一度バインドして閉じたポートには誰もいない
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let submitter = Submitter::new(transport(), Some(format!("http://{}/", addr)));
    let image = common::selected("plov.jpg", "image/jpeg", &jpeg_bytes(4, 4));
    let err = submitter.submit(&image).await.unwrap_err();
    assert!(matches!(err, FoodDetectError::ApiCall(_)));
}
