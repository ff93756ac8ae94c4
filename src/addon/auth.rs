//! Request authentication
//!
//! The marketplace authenticates with HTTP Basic credentials whose
//! password half is a shared secret. The user-name half carries no
//! meaning and is ignored.

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

/// Outcome of inspecting a request's credentials
///
/// `Unauthenticated` covers everything short of a parseable Basic
/// credential; `Forbidden` is reserved for a well-formed credential
/// with the wrong secret. The two map to 401 and 403 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated,
    Unauthenticated,
    Forbidden,
}

/// Shared-secret gate run before any request body is read
pub struct AuthGate {
    secret: String,
}

impl AuthGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Classify a request by its Authorization header
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthOutcome {
        let header = match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some(h) => h,
            None => return AuthOutcome::Unauthenticated,
        };

        // Scheme match is case-sensitive, like the marketplace sends it
        let payload = match header.strip_prefix("Basic ") {
            Some(p) => p,
            None => return AuthOutcome::Unauthenticated,
        };

        let decoded =
            match base64::Engine::decode(&base64::engine::general_purpose::STANDARD, payload) {
                Ok(bytes) => bytes,
                Err(_) => return AuthOutcome::Unauthenticated,
            };

        // user:password, split at the first colon
        let colon = match decoded.iter().position(|&b| b == b':') {
            Some(i) => i,
            None => return AuthOutcome::Unauthenticated,
        };
        let password = &decoded[colon + 1..];

        if constant_time_eq(password, self.secret.as_bytes()) {
            AuthOutcome::Authenticated
        } else {
            AuthOutcome::Forbidden
        }
    }
}

/// Constant-time comparison of two byte slices
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
