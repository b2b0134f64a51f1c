//! Per-connection limits and protocol selection.

use std::time::Duration;

use bricks_backend::ServiceConfig;
use reqwest::{StatusCode, Version};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

mod common;

fn short_timeouts() -> ServiceConfig {
    ServiceConfig {
        http_server_timeout: Duration::from_millis(300),
        ..common::test_config()
    }
}

#[tokio::test]
async fn stalled_request_head_is_closed() {
    let server = common::start(short_timeouts()).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    // No blank line: the head never completes.
    stream
        .write_all(b"GET /healthz HTTP/1.1\r\nHost: test\r\n")
        .await
        .unwrap();

    let closed = common::read_until_closed(&mut stream, Duration::from_secs(3)).await;
    assert!(closed.is_some(), "connection still open after 3s");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn idle_keep_alive_connection_is_closed() {
    let server = common::start(short_timeouts()).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream
        .write_all(b"GET /healthz HTTP/1.1\r\nHost: test\r\n\r\n")
        .await
        .unwrap();

    let received = common::read_until_closed(&mut stream, Duration::from_secs(3))
        .await
        .expect("idle connection was kept open");
    assert!(received.starts_with("HTTP/1.1 200 OK"), "{received}");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn h2c_serves_prior_knowledge() {
    let config = ServiceConfig {
        h2c: true,
        ..common::test_config()
    };
    let server = common::start(config).await;

    let client = reqwest::Client::builder()
        .http2_prior_knowledge()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let response = client.get(server.url("/healthz")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.version(), Version::HTTP_2);

    // HTTP/1.1 keeps working next to it.
    let response = common::client().get(server.url("/readyz")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.version(), Version::HTTP_11);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn prior_knowledge_is_refused_without_h2c() {
    let server = common::start(common::test_config()).await;

    let client = reqwest::Client::builder()
        .http2_prior_knowledge()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let result = client.get(server.url("/healthz")).send().await;
    assert!(result.is_err());

    server.shutdown().await.unwrap();
}
