//! Access-token acquisition
//!
//! Every administration call carries a bearer token scoped to instance
//! management. Tokens are fetched per call; nothing is cached, so an
//! expired credential can never outlive a request.

use async_trait::async_trait;
use serde::Deserialize;

use super::errors::TokenError;

/// OAuth scope required for instance administration
pub const AUTH_SCOPE: &str = "https://www.googleapis.com/auth/sqlservice.admin";

/// Token endpoint of the GCE metadata server
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Source of bearer tokens for the administration API
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch a token valid for the given scope
    async fn access_token(&self, scope: &str) -> Result<String, TokenError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Fetches tokens from the metadata server of the host machine
///
/// This is the production source when running inside Google Cloud.
pub struct MetadataTokenSource {
    http: reqwest::Client,
    url: String,
}

impl MetadataTokenSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            url: METADATA_TOKEN_URL.to_string(),
        }
    }

    /// Use a different token endpoint (tests)
    pub fn with_url(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl TokenSource for MetadataTokenSource {
    async fn access_token(&self, scope: &str) -> Result<String, TokenError> {
        let response = self
            .http
            .get(&self.url)
            .header("Metadata-Flavor", "Google")
            .query(&[("scopes", scope)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        Ok(token.access_token)
    }
}

/// Fixed token from configuration (development and tests)
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn access_token(&self, _scope: &str) -> Result<String, TokenError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_metadata_source_fetches_token() {
        let server = MockServer::start();

        let token_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/token")
                .header("Metadata-Flavor", "Google")
                .query_param("scopes", AUTH_SCOPE);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "access_token": "ya29.test-token",
                    "expires_in": 3599,
                    "token_type": "Bearer"
                }));
        });

        let source = MetadataTokenSource::with_url(reqwest::Client::new(), server.url("/token"));
        let token = source.access_token(AUTH_SCOPE).await.unwrap();

        token_mock.assert();
        assert_eq!(token, "ya29.test-token");
    }

    #[tokio::test]
    async fn test_metadata_source_surfaces_status() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/token");
            then.status(403);
        });

        let source = MetadataTokenSource::with_url(reqwest::Client::new(), server.url("/token"));
        let err = source.access_token(AUTH_SCOPE).await.unwrap_err();

        assert!(matches!(err, TokenError::Status(403)));
    }

    #[tokio::test]
    async fn test_metadata_source_rejects_bad_body() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/token");
            then.status(200).body("not json");
        });

        let source = MetadataTokenSource::with_url(reqwest::Client::new(), server.url("/token"));
        let err = source.access_token(AUTH_SCOPE).await.unwrap_err();

        assert!(matches!(err, TokenError::Decode(_)));
    }

    #[tokio::test]
    async fn test_static_source_returns_configured_token() {
        let source = StaticTokenSource::new("fixed");
        let token = source.access_token(AUTH_SCOPE).await.unwrap();
        assert_eq!(token, "fixed");
    }
}
