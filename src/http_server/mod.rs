//! # HTTP Server Module
//!
//! Marketplace-facing HTTP server for the add-on provider. Combines
//! the resource lifecycle endpoints with health and metrics routes
//! into a unified Axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/metrics` - Counter snapshot
//! - `/heroku/resources` - Provision
//! - `/heroku/resources/:id` - Plan change and deprovision

pub mod addon_routes;
pub mod config;
pub mod observability_routes;
pub mod server;

pub use addon_routes::AddonState;
pub use config::HttpServerConfig;
pub use server::HttpServer;
