//! Group entity and tree-wide bulk operations
//!
//! Bulk operations walk the held tree with [`crate::traverse`] and delegate
//! each application to a fresh [`Application`]. Writes are issued one at a
//! time in traversal order and are not transactional: a failure part way
//! leaves earlier applications changed.

use std::path::Path;
use std::sync::Arc;

use futures::FutureExt;
use marathon_models::{DeploymentResponse, Group};
use tracing::{debug, info};

use crate::errors::ClientError;
use crate::filesys::file::File;
use crate::http::{call, paths, Request, Transport};
use crate::resources::application::Application;
use crate::resources::bulk::BulkOp;
use crate::traverse::{self, BulkReport};

const ENTITY: &str = "group";

/// A Marathon group subtree
pub struct Groups {
    transport: Arc<dyn Transport>,
    group: Group,
    deployment: Option<DeploymentResponse>,
}

impl Groups {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            group: Group::default(),
            deployment: None,
        }
    }

    pub fn is_set(&self) -> bool {
        !self.group.id.is_empty()
    }

    pub fn id(&self) -> &str {
        &self.group.id
    }

    /// Response of the last group-level write
    pub fn deployment(&self) -> Option<&DeploymentResponse> {
        self.deployment.as_ref()
    }

    fn ensure_set(&self) -> Result<(), ClientError> {
        if self.is_set() {
            Ok(())
        } else {
            Err(ClientError::EmptyEntity(ENTITY))
        }
    }

    fn clear(&mut self) {
        self.group = Group::default();
    }

    // =============================== LIFECYCLE ================================== //

    /// Hydrate the subtree rooted at `id`, reset on failure
    pub async fn get(&mut self, id: &str) -> Result<&mut Self, ClientError> {
        self.clear();
        if id.is_empty() {
            return Err(ClientError::EmptyEntity(ENTITY));
        }
        debug!("Groups: Get {}", id);

        let result = call::<Group>(self.transport.as_ref(), Request::get(paths::group(id))).await;
        match result {
            Ok(group) => {
                self.group = group;
                Ok(self)
            }
            Err(e) => {
                debug!("Groups: Get {} failed: {}", id, e);
                self.clear();
                Err(e)
            }
        }
    }

    /// Hydrate from a definition without any network call
    pub fn set(&mut self, group: Group) -> &mut Self {
        if !group.id.is_empty() {
            self.group = group;
        }
        self
    }

    /// Create the group on the server, holding it on success
    pub async fn create(&mut self, group: Group) -> Result<(), ClientError> {
        self.write(Request::post(paths::group(&group.id)), group).await
    }

    /// Replace the group on the server, holding it on success
    pub async fn update(&mut self, group: Group) -> Result<(), ClientError> {
        self.write(Request::put(paths::group(&group.id)), group).await
    }

    async fn write(&mut self, request: Request, group: Group) -> Result<(), ClientError> {
        if group.id.is_empty() {
            return Err(ClientError::EmptyEntity(ENTITY));
        }
        let request = request.with_body(&group)?;
        debug!("Groups: {} {}", request.method, request.path);

        self.deployment = call(self.transport.as_ref(), request).await?;
        self.group = group;
        Ok(())
    }

    /// Delete the whole subtree from the server
    pub async fn destroy(&mut self) -> Result<(), ClientError> {
        self.ensure_set()?;
        debug!("Groups: Destroy id = {}", self.group.id);
        let request = Request::delete(paths::group(&self.group.id));

        self.deployment = call(self.transport.as_ref(), request).await?;
        self.clear();
        Ok(())
    }

    /// Copy of the held tree (default when unset)
    pub fn as_raw(&self) -> Group {
        self.group.clone()
    }

    // =============================== BULK ================================== //

    pub async fn scale(&self, instances: u32, force: bool) -> Result<(), ClientError> {
        self.bulk_report(BulkOp::Scale(instances), force).await?.into_last_error()
    }

    pub async fn scale_report(&self, instances: u32, force: bool) -> Result<BulkReport, ClientError> {
        self.bulk_report(BulkOp::Scale(instances), force).await
    }

    pub async fn start(&self, instances: u32, force: bool) -> Result<(), ClientError> {
        self.bulk_report(BulkOp::Start(instances), force).await?.into_last_error()
    }

    pub async fn start_report(&self, instances: u32, force: bool) -> Result<BulkReport, ClientError> {
        self.bulk_report(BulkOp::Start(instances), force).await
    }

    pub async fn stop(&self, force: bool) -> Result<(), ClientError> {
        self.bulk_report(BulkOp::Stop, force).await?.into_last_error()
    }

    pub async fn stop_report(&self, force: bool) -> Result<BulkReport, ClientError> {
        self.bulk_report(BulkOp::Stop, force).await
    }

    /// Alias for [`Groups::stop`]
    pub async fn suspend(&self, force: bool) -> Result<(), ClientError> {
        self.bulk_report(BulkOp::Suspend, force).await?.into_last_error()
    }

    pub async fn suspend_report(&self, force: bool) -> Result<BulkReport, ClientError> {
        self.bulk_report(BulkOp::Suspend, force).await
    }

    pub async fn restart(&self, force: bool) -> Result<(), ClientError> {
        self.bulk_report(BulkOp::Restart, force).await?.into_last_error()
    }

    pub async fn restart_report(&self, force: bool) -> Result<BulkReport, ClientError> {
        self.bulk_report(BulkOp::Restart, force).await
    }

    /// Write every held application definition back to the server
    pub async fn apply(&self, force: bool) -> Result<(), ClientError> {
        self.apply_report(force).await?.into_last_error()
    }

    pub async fn apply_report(&self, force: bool) -> Result<BulkReport, ClientError> {
        self.ensure_set()?;
        let report = traverse::traverse_async(&self.group, |definition| {
            let mut app = Application::new(self.transport.clone());
            async move { app.set(definition.clone()).apply(force).await }.boxed()
        })
        .await;

        self.log_report("Apply", &report);
        Ok(report)
    }

    /// Fetch every application of the held tree by id and run `op` on it
    pub async fn bulk_report(&self, op: BulkOp, force: bool) -> Result<BulkReport, ClientError> {
        self.ensure_set()?;
        debug!("Groups: {} on {} force={}", op, self.group.id, force);

        let report = traverse::traverse_async(&self.group, |definition| {
            let mut app = Application::new(self.transport.clone());
            async move { op.run_on(&mut app, &definition.id, force).await }.boxed()
        })
        .await;

        self.log_report(op.name(), &report);
        Ok(report)
    }

    fn log_report(&self, op: &str, report: &BulkReport) {
        info!(
            "Groups: {} on {} done, {} ok, {} failed",
            op,
            self.group.id,
            report.succeeded(),
            report.failures.len()
        );
    }

    // =============================== FILES ================================== //

    /// Hydrate from a `.json` or `.yaml` file, reset on failure
    pub async fn load(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ClientError> {
        self.clear();
        let result = File::new(path.as_ref()).read_as::<Group>().await;
        match result {
            Ok(group) => {
                self.group = group;
                Ok(self)
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    pub async fn dump(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        self.ensure_set()?;
        File::new(path.as_ref()).write_as(&self.group).await
    }
}
