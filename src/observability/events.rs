//! Observability events
//!
//! Every observable moment in the add-on lifecycle has an explicit,
//! typed event. Free-form log messages are not allowed.

use std::fmt;

use super::Severity;

/// Observable events
///
/// Grouped by subsystem:
/// - Boot & lifecycle
/// - Provisioning
/// - Deprovisioning
/// - Plan changes
/// - Readiness polling
/// - Upstream API
/// - Request handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    StartupBegin,
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Server bound, ready for requests
    Serving,

    // Provisioning
    /// Provision request accepted, instance creation starting
    ProvisionBegin,
    /// Instance created and reachable
    ProvisionComplete,
    /// Instance already existed upstream
    ProvisionConflict,
    /// Instance creation failed
    ProvisionFailed,

    // Deprovisioning
    /// Deprovision request accepted
    DeprovisionBegin,
    /// Instance deleted upstream
    DeprovisionComplete,
    /// Instance deletion failed
    DeprovisionFailed,

    // Plan changes
    /// Plan change request accepted
    PlanChangeBegin,
    /// Tier updated and instance reachable again
    PlanChangeComplete,
    /// Tier update failed
    PlanChangeFailed,

    // Readiness polling
    /// One readiness fetch against the upstream API
    PollAttempt,
    /// Attempt budget exhausted without the instance becoming reachable
    PollTimeout,
    /// Instance reported runnable but exposes no address
    InstanceInconsistent,

    // Upstream API
    /// An upstream API call returned an error
    ApiCallFailed,
    /// Access-token acquisition failed
    TokenFetchFailed,

    // Request handling
    /// Request rejected by the auth gate
    AuthRejected,
    /// Request rejected before reaching the upstream API (bad body, unknown plan)
    RequestRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            // Boot & Lifecycle
            Event::StartupBegin => "HEROKUSQL_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "HEROKUSQL_SERVING",

            // Provisioning
            Event::ProvisionBegin => "PROVISION_BEGIN",
            Event::ProvisionComplete => "PROVISION_COMPLETE",
            Event::ProvisionConflict => "PROVISION_CONFLICT",
            Event::ProvisionFailed => "PROVISION_FAILED",

            // Deprovisioning
            Event::DeprovisionBegin => "DEPROVISION_BEGIN",
            Event::DeprovisionComplete => "DEPROVISION_COMPLETE",
            Event::DeprovisionFailed => "DEPROVISION_FAILED",

            // Plan changes
            Event::PlanChangeBegin => "PLAN_CHANGE_BEGIN",
            Event::PlanChangeComplete => "PLAN_CHANGE_COMPLETE",
            Event::PlanChangeFailed => "PLAN_CHANGE_FAILED",

            // Polling
            Event::PollAttempt => "POLL_ATTEMPT",
            Event::PollTimeout => "POLL_TIMEOUT",
            Event::InstanceInconsistent => "INSTANCE_INCONSISTENT",

            // Upstream API
            Event::ApiCallFailed => "API_CALL_FAILED",
            Event::TokenFetchFailed => "TOKEN_FETCH_FAILED",

            // Request handling
            Event::AuthRejected => "AUTH_REJECTED",
            Event::RequestRejected => "REQUEST_REJECTED",
        }
    }

    /// Default severity for the event
    pub fn severity(&self) -> Severity {
        match self {
            Event::PollAttempt => Severity::Trace,

            Event::StartupBegin
            | Event::ConfigLoaded
            | Event::Serving
            | Event::ProvisionBegin
            | Event::ProvisionComplete
            | Event::DeprovisionBegin
            | Event::DeprovisionComplete
            | Event::PlanChangeBegin
            | Event::PlanChangeComplete => Severity::Info,

            Event::ProvisionConflict
            | Event::PollTimeout
            | Event::AuthRejected
            | Event::RequestRejected => Severity::Warn,

            Event::ProvisionFailed
            | Event::DeprovisionFailed
            | Event::PlanChangeFailed
            | Event::InstanceInconsistent
            | Event::ApiCallFailed
            | Event::TokenFetchFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
