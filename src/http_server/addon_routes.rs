//! Add-on HTTP Routes
//!
//! HTTP endpoints for the marketplace resource lifecycle: provision,
//! deprovision, and plan change. Every handler runs the credential
//! gate before the body is touched, so bad credentials always win
//! over bad JSON.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::addon::{
    AddonError, AuthGate, AuthOutcome, PlanChangeRequest, ProvisionRequest, ProvisionService,
    ResponseEnvelope,
};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

/// Shared add-on state
pub struct AddonState {
    pub service: ProvisionService,
    pub gate: AuthGate,
    pub metrics: Arc<MetricsRegistry>,
}

impl AddonState {
    /// Create new add-on state
    pub fn new(service: ProvisionService, gate: AuthGate, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            service,
            gate,
            metrics,
        }
    }
}

/// Add-on routes with shared state
pub fn addon_routes(state: Arc<AddonState>) -> Router {
    Router::new()
        .route("/resources", post(provision_handler))
        .route(
            "/resources/:id",
            post(plan_change_handler).delete(deprovision_handler),
        )
        .with_state(state)
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<AddonError> for ErrorResponse {
    fn from(err: AddonError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code(),
        }
    }
}

// ==================
// Handlers
// ==================

/// Provision handler
async fn provision_handler(
    State(state): State<Arc<AddonState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ResponseEnvelope>, (StatusCode, Json<ErrorResponse>)> {
    check_auth(&state, &headers)?;
    let request: ProvisionRequest = parse_body(&state, &body)?;

    match state.service.provision(&request).await {
        Ok(envelope) => {
            state.metrics.increment_provisions_completed();
            Ok(Json(envelope))
        }
        Err(err) => {
            match &err {
                AddonError::AlreadyProvisioned { .. } => {
                    state.metrics.increment_provisions_conflicted();
                }
                _ if err.is_client_error() => reject_request(&state, &err),
                AddonError::NotRunnable { source, .. } if source.is_timeout() => {
                    state.metrics.increment_poll_timeouts();
                    state.metrics.increment_provisions_failed();
                }
                _ => {
                    state.metrics.increment_upstream_errors();
                    state.metrics.increment_provisions_failed();
                }
            }
            Err(error_response(err))
        }
    }
}

/// Deprovision handler
async fn deprovision_handler(
    State(state): State<Arc<AddonState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    check_auth(&state, &headers)?;

    match state.service.deprovision(&id).await {
        Ok(()) => {
            state.metrics.increment_deprovisions_completed();
            Ok(StatusCode::OK)
        }
        Err(err) => {
            if err.is_client_error() {
                reject_request(&state, &err);
            } else {
                state.metrics.increment_upstream_errors();
                state.metrics.increment_deprovisions_failed();
            }
            Err(error_response(err))
        }
    }
}

/// Plan change handler
async fn plan_change_handler(
    State(state): State<Arc<AddonState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ResponseEnvelope>, (StatusCode, Json<ErrorResponse>)> {
    check_auth(&state, &headers)?;
    let request: PlanChangeRequest = parse_body(&state, &body)?;

    match state.service.change_plan(&id, &request).await {
        Ok(envelope) => {
            state.metrics.increment_plan_changes_completed();
            Ok(Json(envelope))
        }
        Err(err) => {
            match &err {
                _ if err.is_client_error() => reject_request(&state, &err),
                AddonError::NotRunnable { source, .. } if source.is_timeout() => {
                    state.metrics.increment_poll_timeouts();
                    state.metrics.increment_plan_changes_failed();
                }
                _ => {
                    state.metrics.increment_upstream_errors();
                    state.metrics.increment_plan_changes_failed();
                }
            }
            Err(error_response(err))
        }
    }
}

// ==================
// Gate and Error Plumbing
// ==================

/// Run the credential gate; rejections are logged and counted here,
/// never inside the gate itself
fn check_auth(
    state: &AddonState,
    headers: &HeaderMap,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    match state.gate.authenticate(headers) {
        AuthOutcome::Authenticated => Ok(()),
        AuthOutcome::Unauthenticated => {
            state.metrics.increment_auth_rejections();
            log_event_with_fields(Event::AuthRejected, &[("reason", "no_credentials")]);
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Unauthorized".to_string(),
                    code: 401,
                }),
            ))
        }
        AuthOutcome::Forbidden => {
            state.metrics.increment_auth_rejections();
            log_event_with_fields(Event::AuthRejected, &[("reason", "bad_secret")]);
            Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: "Forbidden".to_string(),
                    code: 403,
                }),
            ))
        }
    }
}

/// Decode a request body, mapping parse failures to the public message
fn parse_body<T: serde::de::DeserializeOwned>(
    state: &AddonState,
    body: &str,
) -> Result<T, (StatusCode, Json<ErrorResponse>)> {
    serde_json::from_str(body).map_err(|_| {
        let err = AddonError::InvalidBody;
        reject_request(state, &err);
        error_response(err)
    })
}

/// Record a caller-side rejection
fn reject_request(state: &AddonState, err: &AddonError) {
    state.metrics.increment_requests_rejected();
    let reason = err.to_string();
    log_event_with_fields(Event::RequestRejected, &[("reason", reason.as_str())]);
}

/// Map an add-on error onto the wire
fn error_response(err: AddonError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AddonConfig, Config, ControlPlaneConfig, PollConfig};
    use crate::http_server::HttpServerConfig;
    use axum::body::Body;
    use axum::http::Request;
    use base64::Engine;
    use tower::ServiceExt;

    fn test_state(base_url: &str) -> Arc<AddonState> {
        let config = Config {
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
                max_attempts: 2,
                interval_ms: 0,
            },
        };
        Arc::new(AddonState::new(
            ProvisionService::from_config(&config),
            AuthGate::new(&config.addon.secret),
            Arc::new(MetricsRegistry::new()),
        ))
    }

    fn basic_auth(user: &str, password: &str) -> String {
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, password))
        )
    }

    #[tokio::test]
    async fn test_missing_credentials_win_over_bad_json() {
        let state = test_state("http://127.0.0.1:1");
        let app = addon_routes(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/resources")
                    .body(Body::from("this is not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(state.metrics.snapshot().auth_rejections, 1);
        assert_eq!(state.metrics.snapshot().requests_rejected, 0);
    }

    #[tokio::test]
    async fn test_wrong_secret_is_forbidden() {
        let state = test_state("http://127.0.0.1:1");
        let app = addon_routes(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/resources")
                    .header("authorization", basic_auth("heroku", "wrong"))
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(state.metrics.snapshot().auth_rejections, 1);
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let state = test_state("http://127.0.0.1:1");
        let app = addon_routes(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/resources")
                    .header("authorization", basic_auth("heroku", "hunter2"))
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["error"], "Invalid JSON");
        assert_eq!(parsed["code"], 400);
        assert_eq!(state.metrics.snapshot().requests_rejected, 1);
    }

    #[tokio::test]
    async fn test_unknown_plan_counts_as_rejected_request() {
        let state = test_state("http://127.0.0.1:1");
        let app = addon_routes(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/resources")
                    .header("authorization", basic_auth("heroku", "hunter2"))
                    .body(Body::from(
                        r#"{"heroku_id": "app123@heroku.com", "plan": "ocean"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["error"], "Invalid plan ocean");
        assert_eq!(state.metrics.snapshot().requests_rejected, 1);
        assert_eq!(state.metrics.snapshot().provisions_failed, 0);
    }

    #[test]
    fn test_error_response_from_addon_error() {
        let response = ErrorResponse::from(AddonError::unknown_plan("ocean"));
        assert_eq!(response.error, "Invalid plan ocean");
        assert_eq!(response.code, 400);
    }
}
