//! # HTTP Server
//!
//! Combines the agent's routers and serves them with axum.

use std::io;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::observability_routes::{health_routes, observability_routes};
use super::run_routes::run_routes;
use crate::config::ConfigResult;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::orchestrator::Orchestrator;

/// HTTP server for the governance agent
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server around an already-wired orchestrator.
    ///
    /// Fails if any configured CORS origin is malformed.
    pub fn with_config(
        config: HttpServerConfig,
        orchestrator: Arc<Orchestrator>,
    ) -> ConfigResult<Self> {
        let router = Self::build_router(&config, orchestrator)?;
        Ok(Self { config, router })
    }

    fn build_router(
        config: &HttpServerConfig,
        orchestrator: Arc<Orchestrator>,
    ) -> ConfigResult<Router> {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.allowed_origins()?))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let metrics = Arc::clone(orchestrator.metrics());

        Ok(Router::new()
            .merge(health_routes())
            .merge(run_routes(orchestrator))
            .merge(observability_routes(metrics))
            .layer(cors))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the configured host and port. Host names are resolved.
    pub async fn bind(&self) -> io::Result<TcpListener> {
        TcpListener::bind((self.config.host.as_str(), self.config.port)).await
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let listener = self.bind().await?;
        let bound = listener.local_addr()?.to_string();
        log_event_with_fields(Event::Serving, &[("addr", &bound)]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

async fn shutdown_signal() {
    // If the handler cannot be installed, serve until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
