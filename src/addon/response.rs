//! Outbound payloads to the marketplace

use std::collections::BTreeMap;

use serde::Serialize;

/// Message on a successful provision
pub const PROVISION_SUCCESS: &str = "Provision successful!";

/// Message on a successful plan change
pub const PLAN_CHANGE_SUCCESS: &str = "Plan change successful!";

/// Envelope returned for successful provision and plan-change calls
///
/// `config` carries the config vars the marketplace sets on the app;
/// this service always sends exactly one, the instance address under
/// the deployment's configured variable name.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub id: String,
    pub config: BTreeMap<String, String>,
    pub message: String,
}

impl ResponseEnvelope {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            config: BTreeMap::new(),
            message: message.into(),
        }
    }

    /// Attach a config var to the envelope
    pub fn with_config_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_wire_shape() {
        let envelope = ResponseEnvelope::new("app123", PROVISION_SUCCESS)
            .with_config_var("GOOGLECLOUDSQL_URL", "10.0.0.5");

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "app123",
                "config": { "GOOGLECLOUDSQL_URL": "10.0.0.5" },
                "message": "Provision successful!"
            })
        );
    }

    #[test]
    fn test_config_var_name_is_caller_chosen() {
        let envelope =
            ResponseEnvelope::new("app123", PLAN_CHANGE_SUCCESS).with_config_var("DB_URL", "addr");

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["config"], json!({ "DB_URL": "addr" }));
    }
}
