//! # HTTP Server
//!
//! Main HTTP server combining the user and health routers.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::resolution::ResolutionService;

use super::config::{HttpConfigError, HttpServerConfig};
use super::health_routes::health_routes;
use super::user_routes::user_routes;

/// HTTP server for the user service
pub struct HttpServer {
    addr: SocketAddr,
    router: Router,
}

impl HttpServer {
    /// Create a server around an already wired service
    pub fn new(config: &HttpServerConfig, service: Arc<ResolutionService>) -> io::Result<Self> {
        let invalid = |e: HttpConfigError| io::Error::new(io::ErrorKind::InvalidInput, e.to_string());

        let addr = config.bind_addr().map_err(invalid)?;
        let router = build_router(config, service).map_err(invalid)?;
        Ok(Self { addr, router })
    }

    /// Address the server binds to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        info!(event = "HTTP_LISTENING", addr = %self.addr, "serving /users and /health");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!(event = "HTTP_STOPPED", "server stopped");
        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router(
    config: &HttpServerConfig,
    service: Arc<ResolutionService>,
) -> Result<Router, HttpConfigError> {
    let cors = match config.allowed_origins()? {
        None => CorsLayer::new().allow_origin(Any),
        Some(origins) => CorsLayer::new().allow_origin(AllowOrigin::list(origins)),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Ok(Router::new()
        .merge(health_routes())
        .merge(user_routes(service))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(event = "SHUTDOWN_REQUESTED", "shutting down");
}
