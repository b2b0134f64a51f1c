//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bricks_backend::net::Listener;
use bricks_backend::{
    BuildInfo, CloseSignal, HttpServer, LifecycleState, ServerError, ServerPhase, ServiceConfig,
};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const TEST_VERSION: &str = "0.1.0-test";
pub const TEST_REVISION: &str = "abc1234";

/// A server bound to an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub close: CloseSignal,
    pub lifecycle: Arc<LifecycleState>,
    pub phase: watch::Receiver<ServerPhase>,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Fire the close signal and wait for the server to return.
    pub async fn shutdown(self) -> Result<(), ServerError> {
        self.close.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("server did not stop")
            .expect("server task panicked")
    }
}

pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        host: "127.0.0.1".into(),
        http_server_shutdown_timeout: Duration::from_secs(2),
        hostname: "test-host".into(),
        ..ServiceConfig::default()
    }
}

pub async fn start(config: ServiceConfig) -> TestServer {
    let listener = Listener::bind(&config.host, 0).await.unwrap();
    let addr = listener.local_addr();

    let server = HttpServer::new(config, BuildInfo::new(TEST_VERSION, TEST_REVISION));
    let lifecycle = server.lifecycle();
    let mut phase = server.phase();
    let close = CloseSignal::new();
    let handle = tokio::spawn(server.serve(listener, close.clone()));

    wait_for_phase(&mut phase, ServerPhase::Serving).await;
    TestServer {
        addr,
        close,
        lifecycle,
        phase,
        handle,
    }
}

pub async fn wait_for_phase(rx: &mut watch::Receiver<ServerPhase>, phase: ServerPhase) {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|p| *p == phase))
        .await
        .unwrap_or_else(|_| panic!("server never reached {phase:?}"))
        .unwrap_or_else(|_| panic!("server dropped before {phase:?}"));
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Read until the peer closes, or give up after `within`.
///
/// Returns what was received, or `None` if the connection stayed open.
#[allow(dead_code)]
pub async fn read_until_closed(stream: &mut TcpStream, within: Duration) -> Option<String> {
    let mut buf = Vec::new();
    match tokio::time::timeout(within, stream.read_to_end(&mut buf)).await {
        // A reset still means the server let go of the connection.
        Ok(_) => Some(String::from_utf8_lossy(&buf).into_owned()),
        Err(_) => None,
    }
}
