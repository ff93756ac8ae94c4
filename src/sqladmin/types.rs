//! Wire types for the v1beta3 instance API

use serde::{Deserialize, Serialize};

/// Activation policy applied to every instance this service creates
pub const ACTIVATION_POLICY: &str = "ON_DEMAND";

/// Replication type applied to every instance this service creates
pub const REPLICATION_TYPE: &str = "ASYNCHRONOUS";

/// Body of an instance-creation call
#[derive(Debug, Clone, Serialize)]
pub struct InsertInstanceRequest {
    pub instance: String,
    pub project: String,
    pub settings: InstanceSettings,
}

impl InsertInstanceRequest {
    /// Build the creation body for one instance
    pub fn new(
        instance: &str,
        project: &str,
        tier: &str,
        authorized_apps: &[String],
        pricing_plan: &str,
    ) -> Self {
        Self {
            instance: instance.to_string(),
            project: project.to_string(),
            settings: InstanceSettings {
                tier: tier.to_string(),
                activation_policy: ACTIVATION_POLICY.to_string(),
                authorized_gae_applications: authorized_apps.to_vec(),
                pricing_plan: pricing_plan.to_string(),
                replication_type: REPLICATION_TYPE.to_string(),
                ip_configuration: IpConfiguration { enabled: true },
            },
        }
    }
}

/// Instance settings sent on creation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSettings {
    pub tier: String,
    pub activation_policy: String,
    pub authorized_gae_applications: Vec<String>,
    pub pricing_plan: String,
    pub replication_type: String,
    pub ip_configuration: IpConfiguration,
}

/// IP access block; instances are always created reachable
#[derive(Debug, Clone, Serialize)]
pub struct IpConfiguration {
    pub enabled: bool,
}

/// Body of a tier-change call
#[derive(Debug, Clone, Serialize)]
pub struct PatchInstanceRequest {
    pub settings: PatchSettings,
}

impl PatchInstanceRequest {
    /// Build the tier-change body
    pub fn new(tier: &str) -> Self {
        Self {
            settings: PatchSettings {
                tier: tier.to_string(),
            },
        }
    }
}

/// Settings subset sent on tier change
#[derive(Debug, Clone, Serialize)]
pub struct PatchSettings {
    pub tier: String,
}

/// Instance snapshot as returned by the API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInstance {
    #[serde(default)]
    pub instance: String,

    pub state: InstanceState,

    #[serde(default)]
    pub ip_addresses: Vec<IpMapping>,
}

impl DatabaseInstance {
    /// First usable address, if the instance exposes one
    pub fn endpoint(&self) -> Option<&str> {
        self.ip_addresses
            .iter()
            .map(|m| m.ip_address.as_str())
            .find(|addr| !addr.is_empty())
    }
}

/// Lifecycle state of an instance
///
/// The API has grown states over time; anything this service does not
/// act on decodes as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    /// Creation or reconfiguration still in progress
    #[serde(alias = "PENDING_CREATE")]
    Pending,
    /// Instance is up and serving
    Runnable,
    /// Any state this service does not act on
    #[serde(other)]
    Other,
}

/// One address assigned to an instance
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpMapping {
    pub ip_address: String,
}
