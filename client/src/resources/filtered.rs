//! Flat application sets selected by id prefix or predicate

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use marathon_models::{AppDefinition, AppList};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::errors::ClientError;
use crate::filesys::file::{File, Format};
use crate::http::{call, paths, Request, Transport};
use crate::resources::application::Application;
use crate::resources::bulk::BulkOp;
use crate::traverse::BulkReport;
use crate::utils::base_name;

/// Condensed view of an application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSummary {
    pub id: String,
    pub cpus: f64,
    pub mem: f64,
    pub env: HashMap<String, String>,
    pub labels: HashMap<String, String>,
    pub image: String,
}

impl From<&AppDefinition> for AppSummary {
    fn from(app: &AppDefinition) -> Self {
        Self {
            id: app.id.clone(),
            cpus: app.cpus,
            mem: app.mem,
            env: app.env.clone(),
            labels: app.labels.clone(),
            image: app.container.docker.image.clone(),
        }
    }
}

/// Snapshot of the applications matching a filter
pub struct FilteredApps {
    transport: Arc<dyn Transport>,
    apps: Vec<AppDefinition>,
}

impl FilteredApps {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            apps: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Replace the snapshot with every application whose id starts with `prefix`
    ///
    /// An empty prefix is a no-op: the snapshot is kept and nothing is
    /// fetched. A failed fetch leaves the set empty.
    pub async fn get(&mut self, prefix: &str) -> Result<&mut Self, ClientError> {
        if prefix.is_empty() {
            return Ok(self);
        }
        self.apps.clear();
        debug!("FilteredApps: Get ({})", prefix);

        let list: AppList = call(self.transport.as_ref(), Request::get(paths::API_APPS)).await?;
        self.apps = select(list.apps, prefix);

        debug!("FilteredApps: Get ({}) found {} apps", prefix, self.apps.len());
        Ok(self)
    }

    /// Keep only the applications matching `predicate`
    pub fn filter_by<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&AppDefinition) -> bool,
    {
        self.apps.retain(|app| predicate(app));
        self
    }

    // =============================== BULK ================================== //

    pub async fn scale(&mut self, instances: u32, force: bool) -> Result<(), ClientError> {
        self.bulk_report(BulkOp::Scale(instances), force).await?.into_last_error()
    }

    pub async fn start(&mut self, instances: u32, force: bool) -> Result<(), ClientError> {
        self.bulk_report(BulkOp::Start(instances), force).await?.into_last_error()
    }

    pub async fn stop(&mut self, force: bool) -> Result<(), ClientError> {
        self.bulk_report(BulkOp::Stop, force).await?.into_last_error()
    }

    pub async fn suspend(&mut self, force: bool) -> Result<(), ClientError> {
        self.bulk_report(BulkOp::Suspend, force).await?.into_last_error()
    }

    pub async fn restart(&mut self, force: bool) -> Result<(), ClientError> {
        self.bulk_report(BulkOp::Restart, force).await?.into_last_error()
    }

    /// Run `op` on every application of the set, one after the other
    ///
    /// Successful scale-class calls update the cached instance count so the
    /// snapshot reflects the change without a re-fetch.
    pub async fn bulk_report(&mut self, op: BulkOp, force: bool) -> Result<BulkReport, ClientError> {
        if self.apps.is_empty() {
            return Err(ClientError::EmptySet(op.name()));
        }
        debug!("FilteredApps: {} force={} on {} apps", op, force, self.apps.len());

        let mut handler = Application::new(self.transport.clone());
        let mut report = BulkReport::default();
        for app in self.apps.iter_mut() {
            let result = op.run_on(&mut handler, &app.id, force).await;
            if result.is_ok() {
                if let Some(instances) = op.instances() {
                    app.instances = instances;
                }
            }
            report.record(&app.id, result);
        }

        info!(
            "FilteredApps: {} done, {} ok, {} failed",
            op,
            report.succeeded(),
            report.failures.len()
        );
        Ok(report)
    }

    // =============================== VIEWS ================================== //

    /// Summaries keyed by application id
    pub fn as_map(&self) -> HashMap<String, AppSummary> {
        self.apps
            .iter()
            .map(|app| (app.id.clone(), AppSummary::from(app)))
            .collect()
    }

    pub fn as_raw(&self) -> &[AppDefinition] {
        &self.apps
    }

    // =============================== FILES ================================== //

    /// Append the applications of an `{"apps": [...]}` file matching `prefix`
    ///
    /// A failed read empties the set.
    pub async fn load(&mut self, path: impl AsRef<Path>, prefix: &str) -> Result<&mut Self, ClientError> {
        let result = File::new(path.as_ref()).read_as::<AppList>().await;
        match result {
            Ok(list) => {
                self.apps.extend(select(list.apps, prefix));
                debug!("FilteredApps: Load ({}) found {} apps", prefix, self.apps.len());
                Ok(self)
            }
            Err(e) => {
                self.apps.clear();
                Err(e)
            }
        }
    }

    /// Write the whole set to one file
    pub async fn dump(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        if self.apps.is_empty() {
            return Err(ClientError::EmptySet("Dump"));
        }
        let list = AppList {
            apps: self.apps.clone(),
        };
        File::new(path.as_ref()).write_as(&list).await
    }

    /// Write one file per application next to `base`
    ///
    /// `out/apps.json` with `/infra/redis-1` yields `out/appsredis-1.json`.
    /// Every application is attempted; the last failure is returned.
    pub async fn dump_singly(&self, base: impl AsRef<Path>) -> Result<(), ClientError> {
        if self.apps.is_empty() {
            return Err(ClientError::EmptySet("DumpSingly"));
        }
        let base = base.as_ref();
        let format = Format::from_path(base)?;

        let mut report = BulkReport::default();
        for app in &self.apps {
            let path = single_path(base, &app.id, format);
            let result = File::new(&path).write_as(app).await;
            if let Err(e) = &result {
                error!("FilteredApps: writing app {} to {}: {}", app.id, path.display(), e);
            }
            report.record(&app.id, result);
        }
        report.into_last_error()
    }
}

fn select(apps: Vec<AppDefinition>, prefix: &str) -> Vec<AppDefinition> {
    apps.into_iter()
        .filter(|app| app.id.starts_with(prefix))
        .inspect(|app| debug!("FilteredApps: {} match", app.id))
        .collect()
}

fn single_path(base: &Path, id: &str, format: Format) -> PathBuf {
    let stem = base.with_extension("");
    let mut name = stem.into_os_string();
    name.push(base_name(id));
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}
