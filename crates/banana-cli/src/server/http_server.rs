//! HTTP server startup, signal handling and graceful shutdown.

use std::future::{Future, IntoFuture, pending};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Notify;

use super::{ServerError, ServerResult};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Starts an HTTP server and runs it until SIGINT or SIGTERM.
///
/// After a signal the server stops accepting connections and waits up to the
/// configured shutdown timeout for in-flight requests.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the address cannot be
/// bound, or the server fails while running.
pub async fn serve_http(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    if let Err(validation_error) = server_config.validate() {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            error = %validation_error,
            "Invalid server configuration"
        );

        return Err(ServerError::invalid_config(&validation_error));
    }

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|bind_err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %bind_err,
            "Failed to bind to address"
        );
        ServerError::bind_error(server_addr, bind_err)
    })?;

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server bound to all interfaces, ensure firewall is configured"
        );
    }

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    let started = Instant::now();
    let result = run_until(
        listener,
        app,
        shutdown_signal(),
        server_config.shutdown_timeout(),
    )
    .await;

    match &result {
        Ok(()) => tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            uptime_secs = started.elapsed().as_secs(),
            "Shutdown completed"
        ),
        Err(err) => tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %err,
            uptime_secs = started.elapsed().as_secs(),
            "Server stopped with a fatal error"
        ),
    }

    result.map_err(ServerError::Runtime)
}

/// Serves `app` until `shutdown` resolves, then drains for at most `drain_timeout`.
async fn run_until<S>(
    listener: TcpListener,
    app: Router,
    shutdown: S,
    drain_timeout: Duration,
) -> io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let signalled = Arc::new(Notify::new());
    let on_signal = {
        let signalled = signalled.clone();
        async move {
            shutdown.await;
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                timeout_secs = drain_timeout.as_secs(),
                "Graceful shutdown initiated"
            );
            signalled.notify_one();
        }
    };

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(on_signal)
    .into_future();

    tokio::select! {
        result = server => result,
        () = async {
            signalled.notified().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                timeout_secs = drain_timeout.as_secs(),
                "Shutdown timeout elapsed, dropping in-flight requests"
            );
            Ok(())
        }
    }
}

/// Resolves on the first SIGINT (Ctrl+C) or SIGTERM.
///
/// A handler that cannot be installed never fires.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %err,
                "Ctrl+C handler unavailable"
            );
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %err,
                    "SIGTERM handler unavailable"
                );
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    let received = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal = received,
        "Shutdown signal received"
    );
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;
    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn idle_server_stops_on_signal() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let app = Router::new().route("/", get(|| async { "ok" }));

        let result = timeout(
            Duration::from_secs(5),
            run_until(listener, app, async {}, Duration::from_secs(30)),
        )
        .await?;

        assert!(result.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn stalled_request_is_dropped_after_drain_timeout() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let in_flight = Arc::new(Notify::new());
        let app = {
            let in_flight = in_flight.clone();
            Router::new().route(
                "/slow",
                get(move || {
                    let in_flight = in_flight.clone();
                    async move {
                        in_flight.notify_one();
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        "late"
                    }
                }),
            )
        };
        let shutdown = {
            let in_flight = in_flight.clone();
            async move { in_flight.notified().await }
        };

        let server = tokio::spawn(run_until(
            listener,
            app,
            shutdown,
            Duration::from_millis(50),
        ));

        let mut stream = TcpStream::connect(addr).await?;
        stream
            .write_all(b"GET /slow HTTP/1.1\r\nhost: localhost\r\n\r\n")
            .await?;

        let result = timeout(Duration::from_secs(5), server).await??;
        assert!(result.is_ok());
        Ok(())
    }
}
