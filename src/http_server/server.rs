//! # HTTP Server
//!
//! Main HTTP server combining the marketplace surface with the
//! observability endpoints.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::observability::{log_event_with_fields, Event};

use super::addon_routes::{addon_routes, AddonState};
use super::config::HttpServerConfig;
use super::observability_routes::observability_routes;

/// HTTP server for the add-on provider
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the shared add-on state
    pub fn new(config: HttpServerConfig, state: Arc<AddonState>) -> Self {
        let router = Self::build_router(state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(state: Arc<AddonState>) -> Router {
        Router::new()
            // Health and metrics at root level
            .merge(observability_routes(state.metrics.clone()))
            // Marketplace resource lifecycle under /heroku
            .nest("/heroku", addon_routes(state))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let address = listener.local_addr()?.to_string();

        log_event_with_fields(Event::Serving, &[("address", address.as_str())]);

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
