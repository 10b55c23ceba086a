//! Error body

use serde::{Deserialize, Serialize};

/// Body of a failed request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureMessage {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
