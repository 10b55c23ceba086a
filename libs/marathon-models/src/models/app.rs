//! Application models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::container::Container;

/// Definition of a Marathon application
///
/// Fields the control plane adds on read (task counts, version info) are not
/// modelled and are dropped on deserialization, so a definition read from the
/// server can be written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppDefinition {
    /// Hierarchical path, e.g. `/infra/redis-1`
    pub id: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accepted_resource_roles: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_factor: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_seconds: Option<u32>,

    pub container: Container,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Vec<String>>,

    pub cpus: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<f64>,

    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fetch: Vec<Fetch>,

    /// Health checks are passed through untouched
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub health_checks: Vec<serde_json::Value>,

    pub instances: u32,

    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_launch_delay_seconds: Option<u32>,

    pub mem: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpus: Option<u32>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<Network>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_ports: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_strategy: Option<UpgradeStrategy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kill_selection: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unreachable_strategy: Option<UnreachableStrategy>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
}

/// Artifact fetched into the sandbox before launch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fetch {
    pub uri: String,
    #[serde(default)]
    pub extract: bool,
    #[serde(default)]
    pub executable: bool,
    #[serde(default)]
    pub cache: bool,
}

/// Network attachment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub mode: String,
}

/// Rolling upgrade capacity bounds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeStrategy {
    pub maximum_over_capacity: f64,
    pub minimum_health_capacity: f64,
}

/// Handling of tasks on unreachable agents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreachableStrategy {
    pub inactive_after_seconds: u32,
    pub expunge_after_seconds: u32,
}

/// `GET /v2/apps/{id}` response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppEnvelope {
    pub app: AppDefinition,
}

/// `GET /v2/apps` response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppList {
    #[serde(default)]
    pub apps: Vec<AppDefinition>,
}

/// `GET /v2/apps/{id}/versions` response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVersions {
    #[serde(default)]
    pub versions: Vec<String>,
}
