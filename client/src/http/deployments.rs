//! Deployment API calls

use marathon_models::{Deployment, DeploymentResponse};

use crate::errors::ClientError;
use crate::http::paths::{self, API_DEPLOYMENTS};
use crate::http::{call, Request, Transport};

/// List the deployments currently in progress
pub async fn list_deployments(transport: &dyn Transport) -> Result<Vec<Deployment>, ClientError> {
    let deployments: Option<Vec<Deployment>> =
        call(transport, Request::get(API_DEPLOYMENTS)).await?;
    Ok(deployments.unwrap_or_default())
}

/// Cancel a deployment, rolling the affected resources back
pub async fn rollback_deployment(
    transport: &dyn Transport,
    id: &str,
    force: bool,
) -> Result<Option<DeploymentResponse>, ClientError> {
    let request = Request::delete(paths::deployment(id)).with_force(force);
    call(transport, request).await
}
