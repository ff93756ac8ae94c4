//! # Add-on Errors
//!
//! Error taxonomy for the marketplace-facing surface. The Display
//! string of each variant is the public message; upstream detail stays
//! in the `source` chain and only ever reaches server-side logs.

use thiserror::Error;

use crate::sqladmin::{ApiError, PollError};

/// Result type for add-on operations
pub type AddonResult<T> = Result<T, AddonError>;

/// Failures surfaced to the marketplace
#[derive(Debug, Error)]
pub enum AddonError {
    // ==================
    // Caller Errors
    // ==================

    /// Resource identifier carries no instance name
    #[error("Invalid resource identifier")]
    MalformedIdentifier { heroku_id: String },

    /// Plan has no tier mapping
    #[error("Invalid plan {plan}")]
    UnknownPlan { plan: String },

    /// Request body was not valid JSON
    #[error("Invalid JSON")]
    InvalidBody,

    // ==================
    // Conflict
    // ==================

    /// Instance already exists upstream
    #[error("App is already provisioned")]
    AlreadyProvisioned { instance: String },

    // ==================
    // Upstream Failures
    // ==================

    /// Instance creation failed upstream
    #[error("Error creating instance")]
    CreateFailed {
        instance: String,
        #[source]
        source: ApiError,
    },

    /// Instance deletion failed upstream
    #[error("Error deleting instance")]
    DeleteFailed {
        instance: String,
        #[source]
        source: ApiError,
    },

    /// Tier update failed upstream
    #[error("Error changing plan")]
    PlanChangeFailed {
        instance: String,
        #[source]
        source: ApiError,
    },

    /// Instance never became usable within the poll budget, or came up
    /// without an address
    #[error("Instance did not become available")]
    NotRunnable {
        instance: String,
        #[source]
        source: PollError,
    },
}

impl AddonError {
    /// Resource identifier with no extractable instance name
    pub fn malformed_identifier(heroku_id: impl Into<String>) -> Self {
        AddonError::MalformedIdentifier {
            heroku_id: heroku_id.into(),
        }
    }

    /// Plan outside the catalog
    pub fn unknown_plan(plan: impl Into<String>) -> Self {
        AddonError::UnknownPlan { plan: plan.into() }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            AddonError::MalformedIdentifier { .. } => 400,
            AddonError::UnknownPlan { .. } => 400,
            AddonError::InvalidBody => 400,

            // 409 Conflict
            AddonError::AlreadyProvisioned { .. } => 409,

            // 500 Internal Server Error
            AddonError::CreateFailed { .. } => 500,
            AddonError::DeleteFailed { .. } => 500,
            AddonError::PlanChangeFailed { .. } => 500,
            AddonError::NotRunnable { .. } => 500,
        }
    }

    /// Returns whether the caller, not the upstream, caused this error
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AddonError::malformed_identifier("x").status_code(), 400);
        assert_eq!(AddonError::unknown_plan("ocean").status_code(), 400);
        assert_eq!(AddonError::InvalidBody.status_code(), 400);
        assert_eq!(
            AddonError::AlreadyProvisioned {
                instance: "app123".to_string()
            }
            .status_code(),
            409
        );
        assert_eq!(
            AddonError::CreateFailed {
                instance: "app123".to_string(),
                source: ApiError::Status {
                    status: 503,
                    body: "down".to_string()
                },
            }
            .status_code(),
            500
        );
        assert_eq!(
            AddonError::NotRunnable {
                instance: "app123".to_string(),
                source: PollError::Timeout { attempts: 20 },
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AddonError::unknown_plan("ocean").is_client_error());
        assert!(AddonError::AlreadyProvisioned {
            instance: "a".to_string()
        }
        .is_client_error());
        assert!(!AddonError::DeleteFailed {
            instance: "a".to_string(),
            source: ApiError::Status {
                status: 500,
                body: String::new()
            },
        }
        .is_client_error());
    }

    #[test]
    fn test_unknown_plan_echoes_plan_name() {
        let err = AddonError::unknown_plan("ocean");
        assert_eq!(err.to_string(), "Invalid plan ocean");
    }

    #[test]
    fn test_upstream_messages_do_not_leak_detail() {
        let err = AddonError::CreateFailed {
            instance: "app123".to_string(),
            source: ApiError::Status {
                status: 503,
                body: "quota exceeded for project internal-name".to_string(),
            },
        };

        // Public message is generic; the body stays in the source chain
        assert_eq!(err.to_string(), "Error creating instance");
        assert!(!err.to_string().contains("quota"));
    }

    #[test]
    fn test_messages_match_marketplace_contract() {
        assert_eq!(
            AddonError::AlreadyProvisioned {
                instance: "a".to_string()
            }
            .to_string(),
            "App is already provisioned"
        );
        assert_eq!(AddonError::InvalidBody.to_string(), "Invalid JSON");
    }
}
