//! Cloud SQL administration client
//!
//! Typed access to the v1beta3 instance API: creation, state fetch,
//! tier change, deletion, plus the readiness poll that bridges the gap
//! between "creation accepted" and "instance usable". Bearer tokens
//! come from a pluggable [`TokenSource`].

mod client;
mod errors;
mod poller;
mod token;
mod types;

pub use client::SqlAdminClient;
pub use errors::{ApiError, PollError, TokenError};
pub use poller::{InstanceSource, ReadinessPoller};
pub use token::{MetadataTokenSource, StaticTokenSource, TokenSource, AUTH_SCOPE};
pub use types::{DatabaseInstance, InstanceState, IpMapping};
