//! Inbound payloads from the marketplace

use std::fmt;

use serde::Deserialize;

use super::errors::AddonError;

/// Body of a provision request
///
/// Absent fields decode to empty strings; validation happens against
/// the values, not against field presence. `callback_url` is part of
/// the marketplace contract but unused here.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionRequest {
    #[serde(default)]
    pub heroku_id: String,

    #[serde(default)]
    pub plan: String,

    #[serde(default)]
    pub callback_url: String,
}

/// Body of a plan-change request
#[derive(Debug, Clone, Deserialize)]
pub struct PlanChangeRequest {
    #[serde(default)]
    pub plan: String,
}

/// Instance name derived from a marketplace resource identifier
///
/// Identifiers look like `app123@heroku.com`; the upstream instance
/// key is everything before the first `@`. An identifier without a
/// delimiter, or with nothing before it, has no usable key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceName(String);

impl InstanceName {
    /// Extract the instance name from a resource identifier
    pub fn parse(heroku_id: &str) -> Result<Self, AddonError> {
        let name = match heroku_id.find('@') {
            Some(i) => &heroku_id[..i],
            None => return Err(AddonError::malformed_identifier(heroku_id)),
        };

        if name.is_empty() {
            return Err(AddonError::malformed_identifier(heroku_id));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
