//! Deployments entity

use std::sync::Arc;
use std::time::Duration;

use marathon_models::{Deployment, DeploymentResponse};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::deploy::fsm::TrackerState;
use crate::deploy::tracker::{self, Options};
use crate::errors::ClientError;
use crate::http::deployments::{list_deployments, rollback_deployment};
use crate::http::Transport;

const ENTITY: &str = "deployment id";

/// Access to the deployments in progress on the control plane
#[derive(Clone)]
pub struct Deployments {
    transport: Arc<dyn Transport>,
    options: Options,
}

impl Deployments {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_options(transport, Options::default())
    }

    pub fn with_options(transport: Arc<dyn Transport>, options: Options) -> Self {
        Self { transport, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub async fn list(&self) -> Result<Vec<Deployment>, ClientError> {
        list_deployments(self.transport.as_ref()).await
    }

    /// True when `id` is listed; a failed fetch counts as absent
    pub async fn exists(&self, id: &str) -> bool {
        match self.list().await {
            Ok(deployments) => deployments.iter().any(|d| d.id == id),
            Err(e) => {
                debug!("Deployments: Exists {}: {}", id, e);
                false
            }
        }
    }

    /// Cancel a deployment; the server starts a new one reverting it
    pub async fn rollback(&self, id: &str, force: bool) -> Result<Option<DeploymentResponse>, ClientError> {
        if id.is_empty() {
            return Err(ClientError::EmptyEntity(ENTITY));
        }
        debug!("Deployments: Rollback {} force={}", id, force);
        rollback_deployment(self.transport.as_ref(), id, force).await
    }

    /// Poll until `id` converges, times out or the server is unreachable
    pub async fn track(&self, id: &str, timeout: Duration) -> TrackerState {
        tracker::track(
            self.transport.as_ref(),
            id,
            timeout,
            &self.options,
            tokio::time::sleep,
        )
        .await
    }

    /// Wait for `id` to converge
    ///
    /// An unreachable server is reported as success, same as convergence.
    pub async fn await_deployment(&self, id: &str, timeout: Duration) -> Result<(), ClientError> {
        match self.track(id, timeout).await {
            TrackerState::Converged => Ok(()),
            TrackerState::Unreachable(reason) => {
                warn!(
                    "Deployments: {} treated as finished, list unavailable: {}",
                    id, reason
                );
                Ok(())
            }
            TrackerState::TimedOut | TrackerState::Polling => {
                Err(ClientError::DeploymentStillInProgress {
                    id: id.to_string(),
                    timeout,
                })
            }
        }
    }

    /// Run [`Deployments::await_deployment`] on its own task
    pub fn spawn_await(
        &self,
        id: impl Into<String>,
        timeout: Duration,
    ) -> oneshot::Receiver<Result<(), ClientError>> {
        let (tx, rx) = oneshot::channel();
        let deployments = self.clone();
        let id = id.into();

        tokio::spawn(async move {
            let result = deployments.await_deployment(&id, timeout).await;
            if tx.send(result).is_err() {
                debug!("Deployments: await of {} dropped by caller", id);
            }
        });
        rx
    }
}
