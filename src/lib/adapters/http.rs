use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{Json, Router, http::StatusCode, routing::get};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net;

use crate::config::ServerConfig;
use crate::core::ErrorBody;
use crate::storage::TodoStore;
use crate::transport::configure_tls;

use super::todos::{self, AppState};
use super::view;

#[cfg(feature = "tracing")]
use tower_http::trace::TraceLayer;
#[cfg(feature = "tracing")]
use tracing::info;

/// Builds the full application: landing view at `/`, Todo routes under
/// `prefix`, and a JSON 404 for everything else.
pub fn router(store: Arc<dyn TodoStore>, prefix: &str) -> Router {
    let prefix = prefix.trim_end_matches('/');
    let app = Router::new().route("/", get(view::index));
    let app = if prefix.is_empty() {
        app.merge(todos::routes())
    } else {
        app.nest(prefix, todos::routes())
    };
    let app = app.fallback(not_found).with_state(AppState { store });

    #[cfg(feature = "tracing")]
    let app = app.layer(TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        },
    ));

    app
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            status_code: 404,
            error: Some("Not Found"),
            message: "Not Found".to_string(),
        }),
    )
}

enum Listener {
    Plain(net::TcpListener),
    Tls(SocketAddr, RustlsConfig),
}

pub struct HttpServer {
    router: Router,
    listener: Listener,
}

impl HttpServer {
    pub async fn new(config: &ServerConfig, store: Arc<dyn TodoStore>) -> anyhow::Result<Self> {
        let router = router(store, &config.todos_prefix);
        let addr = config.addr();

        let listener = match &config.tls {
            Some(tls) => {
                let socket = net::lookup_host(&addr)
                    .await
                    .with_context(|| format!("failed to resolve {addr}"))?
                    .next()
                    .with_context(|| format!("no address found for {addr}"))?;
                Listener::Tls(socket, configure_tls(tls).await?)
            }
            None => Listener::Plain(
                net::TcpListener::bind(&addr)
                    .await
                    .with_context(|| format!("failed to listen on {addr}"))?,
            ),
        };

        Ok(Self { router, listener })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        match &self.listener {
            Listener::Plain(listener) => Ok(listener.local_addr()?),
            Listener::Tls(addr, _) => Ok(*addr),
        }
    }

    /// Serves until Ctrl-C or SIGTERM, then lets in-flight requests finish.
    pub async fn run(self) -> anyhow::Result<()> {
        #[cfg(feature = "tracing")]
        info!(addr = %self.local_addr()?, "Server running");

        match self.listener {
            Listener::Plain(listener) => {
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(shutdown_signal())
                    .await
                    .context("received error from running server")?;
            }
            Listener::Tls(addr, tls) => {
                let handle = axum_server::Handle::new();
                let shutdown = handle.clone();
                tokio::spawn(async move {
                    shutdown_signal().await;
                    shutdown.graceful_shutdown(Some(Duration::from_secs(10)));
                });
                axum_server::bind_rustls(addr, tls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await
                    .context("received error from running server")?;
            }
        }

        #[cfg(feature = "tracing")]
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
