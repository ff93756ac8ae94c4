//! # Provisioning Orchestration
//!
//! Coordinates one add-on lifecycle operation end to end: identifier
//! and plan validation, the upstream instance call, and the readiness
//! poll, ending in the envelope the marketplace expects.

use crate::config::Config;
use crate::observability::{log_event_with_fields, Event};
use crate::sqladmin::{
    ApiError, MetadataTokenSource, PollError, ReadinessPoller, SqlAdminClient, StaticTokenSource,
    TokenSource,
};

use super::errors::{AddonError, AddonResult};
use super::plans::resolve_tier;
use super::request::{InstanceName, PlanChangeRequest, ProvisionRequest};
use super::response::{ResponseEnvelope, PLAN_CHANGE_SUCCESS, PROVISION_SUCCESS};

/// Provisioning orchestrator
pub struct ProvisionService {
    /// Upstream instance API
    client: SqlAdminClient,
    /// Readiness poll budget
    poller: ReadinessPoller,
    /// Config var name carrying the instance address
    config_url_var: String,
    /// Applications granted access to new instances
    authorized_apps: Vec<String>,
    /// Billing plan for new instances
    pricing_plan: String,
}

impl ProvisionService {
    /// Create a new provisioning service
    pub fn new(
        client: SqlAdminClient,
        poller: ReadinessPoller,
        config_url_var: impl Into<String>,
        authorized_apps: Vec<String>,
        pricing_plan: impl Into<String>,
    ) -> Self {
        Self {
            client,
            poller,
            config_url_var: config_url_var.into(),
            authorized_apps,
            pricing_plan: pricing_plan.into(),
        }
    }

    /// Assemble the service from a loaded configuration
    ///
    /// A configured `access_token` selects the static token source;
    /// otherwise tokens come from the metadata server of the host.
    pub fn from_config(config: &Config) -> Self {
        let tokens: Box<dyn TokenSource> = match &config.control_plane.access_token {
            Some(token) => Box::new(StaticTokenSource::new(token.clone())),
            None => Box::new(MetadataTokenSource::new(reqwest::Client::new())),
        };

        let client = SqlAdminClient::new(
            config.control_plane.base_url.clone(),
            config.control_plane.project.clone(),
            tokens,
        );
        let poller = ReadinessPoller::new(config.poll.max_attempts, config.poll.interval());

        Self::new(
            client,
            poller,
            config.addon.config_url_var.clone(),
            config.control_plane.authorized_apps.clone(),
            config.control_plane.pricing_plan.clone(),
        )
    }

    /// Create an instance and wait for it to become reachable
    pub async fn provision(&self, request: &ProvisionRequest) -> AddonResult<ResponseEnvelope> {
        let instance = InstanceName::parse(&request.heroku_id)?;
        let tier =
            resolve_tier(&request.plan).ok_or_else(|| AddonError::unknown_plan(&request.plan))?;

        log_event_with_fields(
            Event::ProvisionBegin,
            &[
                ("instance", instance.as_str()),
                ("plan", &request.plan),
                ("tier", tier),
            ],
        );

        match self
            .client
            .insert(
                instance.as_str(),
                tier,
                &self.authorized_apps,
                &self.pricing_plan,
            )
            .await
        {
            Ok(()) => {}
            Err(ApiError::AlreadyExists) => {
                log_event_with_fields(
                    Event::ProvisionConflict,
                    &[("instance", instance.as_str())],
                );
                return Err(AddonError::AlreadyProvisioned {
                    instance: instance.as_str().to_string(),
                });
            }
            Err(source) => {
                self.log_api_failure(instance.as_str(), "insert", &source);
                log_event_with_fields(Event::ProvisionFailed, &[("instance", instance.as_str())]);
                return Err(AddonError::CreateFailed {
                    instance: instance.as_str().to_string(),
                    source,
                });
            }
        }

        let address = match self.await_address(instance.as_str()).await {
            Ok(address) => address,
            Err(err) => {
                log_event_with_fields(Event::ProvisionFailed, &[("instance", instance.as_str())]);
                return Err(err);
            }
        };

        log_event_with_fields(
            Event::ProvisionComplete,
            &[("address", address.as_str()), ("instance", instance.as_str())],
        );

        Ok(ResponseEnvelope::new(instance.as_str(), PROVISION_SUCCESS)
            .with_config_var(&self.config_url_var, address))
    }

    /// Delete an instance
    ///
    /// The identifier is the one the provision envelope reported, used
    /// as the upstream instance name as is.
    pub async fn deprovision(&self, instance: &str) -> AddonResult<()> {
        log_event_with_fields(Event::DeprovisionBegin, &[("instance", instance)]);

        if let Err(source) = self.client.delete(instance).await {
            self.log_api_failure(instance, "delete", &source);
            log_event_with_fields(Event::DeprovisionFailed, &[("instance", instance)]);
            return Err(AddonError::DeleteFailed {
                instance: instance.to_string(),
                source,
            });
        }

        log_event_with_fields(Event::DeprovisionComplete, &[("instance", instance)]);

        Ok(())
    }

    /// Move an instance to a different tier and wait for it to settle
    ///
    /// Takes the provisioned identifier like [`Self::deprovision`].
    pub async fn change_plan(
        &self,
        instance: &str,
        request: &PlanChangeRequest,
    ) -> AddonResult<ResponseEnvelope> {
        let tier =
            resolve_tier(&request.plan).ok_or_else(|| AddonError::unknown_plan(&request.plan))?;

        log_event_with_fields(
            Event::PlanChangeBegin,
            &[
                ("instance", instance),
                ("plan", &request.plan),
                ("tier", tier),
            ],
        );

        if let Err(source) = self.client.update(instance, tier).await {
            self.log_api_failure(instance, "update", &source);
            log_event_with_fields(Event::PlanChangeFailed, &[("instance", instance)]);
            return Err(AddonError::PlanChangeFailed {
                instance: instance.to_string(),
                source,
            });
        }

        let address = match self.await_address(instance).await {
            Ok(address) => address,
            Err(err) => {
                log_event_with_fields(Event::PlanChangeFailed, &[("instance", instance)]);
                return Err(err);
            }
        };

        log_event_with_fields(
            Event::PlanChangeComplete,
            &[("address", address.as_str()), ("instance", instance)],
        );

        Ok(ResponseEnvelope::new(instance, PLAN_CHANGE_SUCCESS)
            .with_config_var(&self.config_url_var, address))
    }

    /// Run the readiness poll and fold its failures into the taxonomy
    async fn await_address(&self, instance: &str) -> AddonResult<String> {
        match self.poller.await_runnable(&self.client, instance).await {
            Ok(address) => Ok(address),
            Err(source) => {
                match &source {
                    PollError::Timeout { attempts } => {
                        let attempts_str = attempts.to_string();
                        log_event_with_fields(
                            Event::PollTimeout,
                            &[("attempts", attempts_str.as_str()), ("instance", instance)],
                        );
                    }
                    PollError::MissingAddress => {
                        log_event_with_fields(
                            Event::InstanceInconsistent,
                            &[("instance", instance)],
                        );
                    }
                    PollError::Api(api_err) => {
                        self.log_api_failure(instance, "get", api_err);
                    }
                }
                Err(AddonError::NotRunnable {
                    instance: instance.to_string(),
                    source,
                })
            }
        }
    }

    fn log_api_failure(&self, instance: &str, operation: &str, err: &ApiError) {
        let detail = err.to_string();
        let event = match err {
            ApiError::Token(_) => Event::TokenFetchFailed,
            _ => Event::ApiCallFailed,
        };
        log_event_with_fields(
            event,
            &[
                ("error", detail.as_str()),
                ("instance", instance),
                ("operation", operation),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AddonConfig, ControlPlaneConfig, PollConfig};
    use crate::http_server::HttpServerConfig;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::json;

    fn test_config(base_url: &str, max_attempts: u32) -> Config {
        Config {
            http: HttpServerConfig::default(),
            addon: AddonConfig {
                secret: "hunter2".to_string(),
                config_url_var: "GOOGLECLOUDSQL_URL".to_string(),
            },
            control_plane: ControlPlaneConfig {
                project: "acme-dbs".to_string(),
                base_url: base_url.to_string(),
                authorized_apps: vec![],
                pricing_plan: "PER_USE".to_string(),
                access_token: Some("test-token".to_string()),
            },
            poll: PollConfig {
                max_attempts,
                interval_ms: 0,
            },
        }
    }

    fn provision_request(heroku_id: &str, plan: &str) -> ProvisionRequest {
        ProvisionRequest {
            heroku_id: heroku_id.to_string(),
            plan: plan.to_string(),
            callback_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_provision_rejects_unknown_plan_before_any_call() {
        // Unroutable endpoint: a network call would fail loudly
        let service = ProvisionService::from_config(&test_config("http://127.0.0.1:1", 1));

        let err = service
            .provision(&provision_request("app123@heroku.com", "ocean"))
            .await
            .unwrap_err();

        assert!(matches!(err, AddonError::UnknownPlan { .. }));
    }

    #[tokio::test]
    async fn test_provision_rejects_malformed_identifier_before_any_call() {
        let service = ProvisionService::from_config(&test_config("http://127.0.0.1:1", 1));

        let err = service
            .provision(&provision_request("no-delimiter", "stream"))
            .await
            .unwrap_err();

        assert!(matches!(err, AddonError::MalformedIdentifier { .. }));
    }

    #[tokio::test]
    async fn test_provision_happy_path_builds_envelope() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST)
                .path("/sql/projects/acme-dbs/instances");
            then.status(200).json_body(json!({ "state": "PENDING" }));
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/sql/projects/acme-dbs/instances/app123");
            then.status(200).json_body(json!({
                "state": "RUNNABLE",
                "ipAddresses": [{ "ipAddress": "10.0.0.5" }]
            }));
        });

        let service = ProvisionService::from_config(&test_config(&server.url("/sql"), 3));
        let envelope = service
            .provision(&provision_request("app123@heroku.com", "stream"))
            .await
            .unwrap();

        assert_eq!(envelope.id, "app123");
        assert_eq!(envelope.message, PROVISION_SUCCESS);
        assert_eq!(
            envelope.config.get("GOOGLECLOUDSQL_URL").map(String::as_str),
            Some("10.0.0.5")
        );
    }

    #[tokio::test]
    async fn test_provision_conflict_maps_to_already_provisioned() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/sql/projects/acme-dbs/instances");
            then.status(409);
        });
        let get_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/sql/projects/acme-dbs/instances/app123");
            then.status(200).json_body(json!({ "state": "RUNNABLE" }));
        });

        let service = ProvisionService::from_config(&test_config(&server.url("/sql"), 3));
        let err = service
            .provision(&provision_request("app123@heroku.com", "stream"))
            .await
            .unwrap_err();

        assert!(matches!(err, AddonError::AlreadyProvisioned { .. }));
        // A conflict must not trigger the readiness poll
        get_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_provision_poll_timeout_is_not_runnable() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/sql/projects/acme-dbs/instances");
            then.status(200).json_body(json!({ "state": "PENDING" }));
        });
        let get_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/sql/projects/acme-dbs/instances/app123");
            then.status(200).json_body(json!({ "state": "PENDING" }));
        });

        let service = ProvisionService::from_config(&test_config(&server.url("/sql"), 2));
        let err = service
            .provision(&provision_request("app123@heroku.com", "stream"))
            .await
            .unwrap_err();

        match err {
            AddonError::NotRunnable { source, .. } => assert!(source.is_timeout()),
            other => panic!("expected NotRunnable, got {:?}", other),
        }
        get_mock.assert_hits(2);
    }

    #[tokio::test]
    async fn test_deprovision_deletes_upstream() {
        let server = MockServer::start();

        let delete_mock = server.mock(|when, then| {
            when.method(DELETE)
                .path("/sql/projects/acme-dbs/instances/app123");
            then.status(200);
        });

        let service = ProvisionService::from_config(&test_config(&server.url("/sql"), 1));
        service.deprovision("app123").await.unwrap();

        delete_mock.assert();
    }

    #[tokio::test]
    async fn test_change_plan_patches_and_polls() {
        let server = MockServer::start();

        let patch_mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/sql/projects/acme-dbs/instances/app123")
                .json_body(json!({ "settings": { "tier": "D4" } }));
            then.status(200);
        });
        server.mock(|when, then| {
            when.method(GET)
                .path("/sql/projects/acme-dbs/instances/app123");
            then.status(200).json_body(json!({
                "state": "RUNNABLE",
                "ipAddresses": [{ "ipAddress": "10.0.0.5" }]
            }));
        });

        let service = ProvisionService::from_config(&test_config(&server.url("/sql"), 3));
        let envelope = service
            .change_plan(
                "app123",
                &PlanChangeRequest {
                    plan: "river".to_string(),
                },
            )
            .await
            .unwrap();

        patch_mock.assert();
        assert_eq!(envelope.message, PLAN_CHANGE_SUCCESS);
        assert_eq!(
            envelope.config.get("GOOGLECLOUDSQL_URL").map(String::as_str),
            Some("10.0.0.5")
        );
    }
}
