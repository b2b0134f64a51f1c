//! HTTP server wrapper.
//!
//! # Responsibilities
//! - Build the router and middleware stack
//! - Own the listener and run the accept loop in the background
//! - Raise the lifecycle flags once serving, drop them on close
//! - Drain open connections within the shutdown deadline
//!
//! # States
//! ```text
//! Created → Starting → Serving → ShuttingDown → Stopped
//! Created → Disabled                    (port 0, nothing is bound)
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::Router;
use hyper::body::Incoming;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tower::Service;

use crate::build_info::BuildInfo;
use crate::config::ServiceConfig;
use crate::http::middleware;
use crate::lifecycle::{CloseSignal, LifecycleState};
use crate::net::{ConnectionGuard, ConnectionTracker, Listener, ListenerError};
use crate::routing::{self, build_router};
use crate::security::TokenIssuer;

/// Pause after a failed accept so a full file table does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Limits applied to every accepted connection.
#[derive(Debug, Clone, Copy)]
struct ConnectionSettings {
    h2c: bool,
    /// Time allowed for a request head to arrive.
    header_read_timeout: Duration,
    /// Time a connection may sit without a request in flight.
    idle_timeout: Duration,
}

impl ConnectionSettings {
    fn from_config(config: &ServiceConfig) -> Self {
        Self {
            h2c: config.h2c,
            header_read_timeout: config.http_server_timeout,
            idle_timeout: config.http_server_timeout * 2,
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<LifecycleState>,
    pub build: Arc<BuildInfo>,
    pub tokens: Arc<TokenIssuer>,
    pub hostname: Arc<str>,
}

impl AppState {
    pub fn new(config: &ServiceConfig, build: BuildInfo) -> Self {
        Self {
            lifecycle: Arc::new(LifecycleState::new()),
            build: Arc::new(build),
            tokens: Arc::new(TokenIssuer::new(&config.jwt_secret)),
            hostname: Arc::from(config.hostname.as_str()),
        }
    }
}

/// Fatal server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Bind(#[from] ListenerError),

    #[error("accept loop stopped unexpectedly: {0}")]
    AcceptLoop(String),
}

/// Where the server is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPhase {
    Created,
    Starting,
    Serving,
    ShuttingDown,
    Stopped,
    Disabled,
}

/// HTTP server owning the listener and the lifecycle flags.
pub struct HttpServer {
    config: Arc<ServiceConfig>,
    state: AppState,
    phase: watch::Sender<ServerPhase>,
}

impl HttpServer {
    pub fn new(config: ServiceConfig, build: BuildInfo) -> Self {
        let state = AppState::new(&config, build);
        let (phase, _) = watch::channel(ServerPhase::Created);
        Self {
            config: Arc::new(config),
            state,
            phase,
        }
    }

    /// Shared handle on the liveness/readiness flags.
    pub fn lifecycle(&self) -> Arc<LifecycleState> {
        Arc::clone(&self.state.lifecycle)
    }

    /// Watch the server phase. The last phase stays readable after the
    /// server has been dropped.
    pub fn phase(&self) -> watch::Receiver<ServerPhase> {
        self.phase.subscribe()
    }

    /// The fully composed application, for in-process use.
    pub fn app(&self) -> Router {
        middleware::compose(
            build_router(self.state.clone()),
            &self.state,
            self.config.http_server_timeout,
        )
    }

    /// Bind the configured address and serve until `close` fires.
    ///
    /// With port `0` nothing is bound: the flags are still raised and the
    /// call returns once `close` fires.
    pub async fn listen_and_serve(self, close: CloseSignal) -> Result<(), ServerError> {
        if self.config.is_bind_disabled() {
            self.run_disabled(close).await;
            return Ok(());
        }

        self.enter(ServerPhase::Starting);
        let listener = match Listener::bind(self.config.bind_host(), self.config.port).await {
            Ok(listener) => listener,
            Err(e) => {
                self.enter(ServerPhase::Stopped);
                return Err(e.into());
            }
        };

        self.serve(listener, close).await
    }

    /// Serve on an already bound listener until `close` fires.
    pub async fn serve(self, listener: Listener, close: CloseSignal) -> Result<(), ServerError> {
        self.enter(ServerPhase::Starting);

        let app = self.app();
        routing::log_routes();

        let addr = listener.local_addr();
        let tracker = ConnectionTracker::new();
        let (drain_tx, drain_rx) = watch::channel(false);
        let mut accept = tokio::spawn(accept_loop(
            listener,
            app,
            tracker.clone(),
            drain_rx,
            ConnectionSettings::from_config(&self.config),
        ));

        self.raise_flags();
        self.enter(ServerPhase::Serving);
        tracing::info!(address = %addr, h2c = self.config.h2c, "HTTP server started");

        tokio::select! {
            _ = close.wait() => {}
            result = &mut accept => {
                self.state.lifecycle.mark_down();
                self.enter(ServerPhase::Stopped);
                let reason = match result {
                    Ok(()) => "listener closed".to_string(),
                    Err(e) => e.to_string(),
                };
                return Err(ServerError::AcceptLoop(reason));
            }
        }

        self.begin_shutdown();
        let _ = drain_tx.send(true);

        let deadline = self.config.http_server_shutdown_timeout;
        let drained = tokio::time::timeout(deadline, async {
            let _ = (&mut accept).await;
            tracker.wait_for_drain().await;
        })
        .await;

        match drained {
            Ok(()) => tracing::info!("All connections drained"),
            Err(_) => {
                accept.abort();
                tracing::warn!(
                    timeout = ?deadline,
                    open_connections = tracker.active_count(),
                    "HTTP server graceful shutdown timed out"
                );
            }
        }

        self.enter(ServerPhase::Stopped);
        tracing::info!(address = %addr, "HTTP server stopped");
        Ok(())
    }

    async fn run_disabled(self, close: CloseSignal) {
        self.enter(ServerPhase::Disabled);
        tracing::info!("Port 0 configured, HTTP listener disabled");

        self.raise_flags();
        close.wait().await;
        self.state.lifecycle.mark_down();
        tracing::info!("Close signal received, lifecycle flags cleared");
    }

    fn raise_flags(&self) {
        let lifecycle = &self.state.lifecycle;
        if self.config.unhealthy {
            tracing::warn!("Liveness withheld by configuration");
        } else {
            lifecycle.set_healthy(true);
        }
        if self.config.unready {
            tracing::warn!("Readiness withheld by configuration");
        } else {
            lifecycle.set_ready(true);
        }
    }

    /// Probes must fail before any connection is told to drain.
    fn begin_shutdown(&self) {
        self.state.lifecycle.mark_down();
        self.enter(ServerPhase::ShuttingDown);
        tracing::info!(
            timeout = ?self.config.http_server_shutdown_timeout,
            "Shutting down HTTP server"
        );
    }

    fn enter(&self, phase: ServerPhase) {
        let previous = self.phase.send_replace(phase);
        if previous != phase {
            tracing::debug!(from = ?previous, to = ?phase, "Server phase changed");
        }
    }
}

/// Accept connections until drain is requested, then drop the listener.
async fn accept_loop(
    listener: Listener,
    app: Router,
    tracker: ConnectionTracker,
    mut drain: watch::Receiver<bool>,
    settings: ConnectionSettings,
) {
    let connection_drain = drain.clone();
    loop {
        tokio::select! {
            _ = drain.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let guard = tracker.track();
                    tokio::spawn(serve_connection(
                        stream,
                        peer,
                        app.clone(),
                        connection_drain.clone(),
                        settings,
                        guard,
                    ));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
    tracing::debug!(address = %listener.local_addr(), "Listener closed");
}

/// Serve one connection; on drain, finish the in-flight request and close.
///
/// Connections left idle past the idle timeout are asked to close, and
/// dropped if they are still open one idle period later.
async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    app: Router,
    mut drain: watch::Receiver<bool>,
    settings: ConnectionSettings,
    guard: ConnectionGuard,
) {
    let (active_tx, mut active) = watch::channel(0usize);
    let active_tx = Arc::new(active_tx);

    let io = TokioIo::new(stream);
    let service = hyper::service::service_fn(move |mut request: Request<Incoming>| {
        request.extensions_mut().insert(ConnectInfo(peer));
        let in_flight = InFlight::start(&active_tx);
        let response = app.clone().call(request);
        async move {
            let response = response.await;
            drop(in_flight);
            response
        }
    });

    let mut builder = Builder::new(TokioExecutor::new());
    if !settings.h2c {
        builder = builder.http1_only();
    }
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(settings.header_read_timeout);

    let conn = builder.serve_connection(io, service);
    tokio::pin!(conn);

    let mut draining = *drain.borrow_and_update();
    if draining {
        conn.as_mut().graceful_shutdown();
    }

    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!(connection_id = %guard.id(), peer = %peer, error = %e, "Connection error");
                }
                break;
            }
            _ = drain.changed(), if !draining => {
                draining = true;
                conn.as_mut().graceful_shutdown();
            }
            _ = idle_for(&mut active, settings.idle_timeout) => {
                if draining {
                    tracing::debug!(connection_id = %guard.id(), peer = %peer, "Dropping connection that ignored close");
                    break;
                }
                tracing::debug!(connection_id = %guard.id(), peer = %peer, "Closing idle connection");
                draining = true;
                conn.as_mut().graceful_shutdown();
            }
        }
    }
}

/// Marks one request as being answered on its connection.
struct InFlight(Arc<watch::Sender<usize>>);

impl InFlight {
    fn start(active: &Arc<watch::Sender<usize>>) -> Self {
        active.send_modify(|count| *count += 1);
        Self(Arc::clone(active))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.send_modify(|count| *count = count.saturating_sub(1));
    }
}

/// Resolve once no request has been in flight for `idle`.
async fn idle_for(active: &mut watch::Receiver<usize>, idle: Duration) {
    loop {
        let busy = *active.borrow_and_update() > 0;
        if busy {
            if active.changed().await.is_err() {
                break;
            }
            continue;
        }
        tokio::select! {
            _ = tokio::time::sleep(idle) => return,
            changed = active.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    // The service is gone, so the connection is finishing on its own.
    std::future::pending::<()>().await;
}
