//! Readiness polling
//!
//! Instance creation and tier changes return before the instance is
//! usable. The poller re-fetches the instance until it reports runnable
//! and exposes an address, within a fixed attempt budget.

use std::time::Duration;

use tokio::time::sleep;

use crate::observability::{log_event_with_fields, Event};

use super::client::SqlAdminClient;
use super::errors::{ApiError, PollError};
use super::types::{DatabaseInstance, InstanceState};

/// Source of instance snapshots for readiness checks
pub trait InstanceSource: Send + Sync {
    /// Fetch the current state of the instance
    fn fetch_instance(
        &self,
        instance: &str,
    ) -> impl std::future::Future<Output = Result<DatabaseInstance, ApiError>> + Send;
}

impl InstanceSource for SqlAdminClient {
    fn fetch_instance(
        &self,
        instance: &str,
    ) -> impl std::future::Future<Output = Result<DatabaseInstance, ApiError>> + Send {
        self.get(instance)
    }
}

/// Waits for an instance to become runnable and addressable
///
/// Exactly one condition retries: the instance not being ready yet.
/// Fetch errors are terminal, and a runnable instance without an
/// address is reported immediately as inconsistent rather than retried.
pub struct ReadinessPoller {
    max_attempts: u32,
    interval: Duration,
}

impl ReadinessPoller {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Poll until the instance is runnable, returning its address
    pub async fn await_runnable<S: InstanceSource>(
        &self,
        source: &S,
        instance: &str,
    ) -> Result<String, PollError> {
        for attempt in 1..=self.max_attempts {
            let attempt_str = attempt.to_string();
            let budget_str = self.max_attempts.to_string();
            log_event_with_fields(
                Event::PollAttempt,
                &[
                    ("attempt", attempt_str.as_str()),
                    ("budget", budget_str.as_str()),
                    ("instance", instance),
                ],
            );

            let snapshot = source.fetch_instance(instance).await?;

            if snapshot.state == InstanceState::Runnable {
                return snapshot
                    .endpoint()
                    .map(str::to_owned)
                    .ok_or(PollError::MissingAddress);
            }

            // No sleep after the final attempt
            if attempt < self.max_attempts {
                sleep(self.interval).await;
            }
        }

        Err(PollError::Timeout {
            attempts: self.max_attempts,
        })
    }
}
