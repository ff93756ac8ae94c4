//! herokusql - Heroku add-on provider for Google Cloud SQL
//!
//! Receives provision, deprovision, and plan-change calls from the
//! Heroku add-on marketplace and drives the Cloud SQL administration
//! API to satisfy them.

pub mod addon;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod sqladmin;
