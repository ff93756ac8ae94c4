//! Client for the instance administration API

use reqwest::StatusCode;

use super::errors::ApiError;
use super::token::{TokenSource, AUTH_SCOPE};
use super::types::{DatabaseInstance, InsertInstanceRequest, PatchInstanceRequest};

/// Client for one project's instances
///
/// Holds no state beyond its connections; every call fetches a fresh
/// token and maps the response by status code. The only status with
/// dedicated meaning is 409 on creation, which signals that the
/// instance already exists.
pub struct SqlAdminClient {
    http: reqwest::Client,
    base_url: String,
    project: String,
    tokens: Box<dyn TokenSource>,
}

impl SqlAdminClient {
    pub fn new(
        base_url: impl Into<String>,
        project: impl Into<String>,
        tokens: Box<dyn TokenSource>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            project: project.into(),
            tokens,
        }
    }

    /// Project that owns the instances
    pub fn project(&self) -> &str {
        &self.project
    }

    fn instances_url(&self) -> String {
        format!("{}/projects/{}/instances", self.base_url, self.project)
    }

    fn instance_url(&self, instance: &str) -> String {
        format!("{}/{}", self.instances_url(), instance)
    }

    async fn bearer(&self) -> Result<String, ApiError> {
        Ok(self.tokens.access_token(AUTH_SCOPE).await?)
    }

    /// Create an instance
    ///
    /// 409 from upstream becomes `ApiError::AlreadyExists`.
    pub async fn insert(
        &self,
        instance: &str,
        tier: &str,
        authorized_apps: &[String],
        pricing_plan: &str,
    ) -> Result<(), ApiError> {
        let token = self.bearer().await?;
        let body =
            InsertInstanceRequest::new(instance, &self.project, tier, authorized_apps, pricing_plan);

        let response = self
            .http
            .post(self.instances_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::CONFLICT => Err(ApiError::AlreadyExists),
            status => Err(Self::status_error(status, response).await),
        }
    }

    /// Fetch the current state of an instance
    pub async fn get(&self, instance: &str) -> Result<DatabaseInstance, ApiError> {
        let token = self.bearer().await?;

        let response = self
            .http
            .get(self.instance_url(instance))
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Self::status_error(response.status(), response).await);
        }

        let body = response.text().await?;
        let snapshot: DatabaseInstance = serde_json::from_str(&body)?;
        Ok(snapshot)
    }

    /// Change an instance's tier
    pub async fn update(&self, instance: &str, tier: &str) -> Result<(), ApiError> {
        let token = self.bearer().await?;
        let body = PatchInstanceRequest::new(tier);

        let response = self
            .http
            .patch(self.instance_url(instance))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(Self::status_error(status, response).await),
        }
    }

    /// Delete an instance
    pub async fn delete(&self, instance: &str) -> Result<(), ApiError> {
        let token = self.bearer().await?;

        let response = self
            .http
            .delete(self.instance_url(instance))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(Self::status_error(status, response).await),
        }
    }

    /// Capture a non-success response, body included, for server-side logs
    async fn status_error(status: StatusCode, response: reqwest::Response) -> ApiError {
        let body = response.text().await.unwrap_or_default();
        ApiError::Status {
            status: status.as_u16(),
            body,
        }
    }
}
