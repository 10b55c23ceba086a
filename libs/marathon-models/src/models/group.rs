//! Group models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::app::AppDefinition;

/// A node of the group tree
///
/// `apps` holds only the applications directly under `id`; nested groups
/// are self-contained subtrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    pub id: String,

    pub apps: Vec<AppDefinition>,

    pub groups: Vec<Group>,

    pub pods: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_role: Option<bool>,
}

impl Group {
    /// Create an empty group node
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Add a directly owned application
    pub fn with_app(mut self, app: AppDefinition) -> Self {
        self.apps.push(app);
        self
    }

    /// Add a child group
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }
}
