//! Error types for the Marathon client

use std::time::Duration;

use thiserror::Error;

/// Main error type for the Marathon client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Operation attempted on an unset application or group (empty id)
    #[error("{0} cannot be null nor empty")]
    EmptyEntity(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The control plane rejected a request. A 409 here means another
    /// deployment is in flight and the write was not forced.
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed image reference: {0:?}")]
    MalformedImageReference(String),

    #[error("Deployment {id} still executing, timeout of {timeout:?} reached")]
    DeploymentStillInProgress { id: String, timeout: Duration },

    #[error("Unsupported file extension: {0:?}")]
    UnsupportedFileExtension(String),

    #[error("Parameter {key} does not exist in app {app}")]
    ParameterNotFound { key: String, app: String },

    #[error("App {0} has no docker parameters")]
    NoParameters(String),

    #[error("{0} was called with an empty set")]
    EmptySet(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// HTTP status carried by a remote rejection, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            ClientError::NotFound(_) => Some(404),
            ClientError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the write was refused because a deployment is in progress
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::Internal(err.to_string())
    }
}
