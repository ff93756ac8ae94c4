//! # Add-on Surface
//!
//! Everything the marketplace sees: credential checking, the plan
//! catalog, request and response shapes, the error taxonomy, and the
//! provisioning orchestrator that ties them to the upstream API.

mod auth;
mod errors;
mod plans;
mod request;
mod response;
mod service;

pub use auth::{constant_time_eq, AuthGate, AuthOutcome};
pub use errors::{AddonError, AddonResult};
pub use plans::resolve_tier;
pub use request::{InstanceName, PlanChangeRequest, ProvisionRequest};
pub use response::{ResponseEnvelope, PLAN_CHANGE_SUCCESS, PROVISION_SUCCESS};
pub use service::ProvisionService;
