//! Application entity and apply protocol
//!
//! An [`Application`] holds one in-memory [`AppDefinition`]. Every setter
//! mutates that copy and immediately writes the whole definition back with
//! [`Application::apply`], so each setter is its own remote round trip.
//! Callers wanting several fields changed atomically should [`Application::set`]
//! a full definition and call `apply` once.
//!
//! An empty id is the "unset" state: accessors return sentinels (`-1`, `""`,
//! `None`) and every operation that needs an id fails with
//! [`ClientError::EmptyEntity`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use marathon_models::{
    AppDefinition, AppEnvelope, AppVersions, Container, DeploymentResponse, DockerParameter,
};
use tracing::debug;

use crate::errors::ClientError;
use crate::filesys::file::File;
use crate::http::{call, paths, Request, Transport};
use crate::resources::image;

const ENTITY: &str = "app";

/// A Marathon application
pub struct Application {
    transport: Arc<dyn Transport>,
    app: AppDefinition,
    deployment: Option<DeploymentResponse>,
}

impl Application {
    /// Create an unset application bound to a transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            app: AppDefinition::default(),
            deployment: None,
        }
    }

    /// True when the entity holds a definition
    pub fn is_set(&self) -> bool {
        !self.app.id.is_empty()
    }

    pub fn id(&self) -> &str {
        &self.app.id
    }

    /// Response of the last write that changed desired state
    pub fn deployment(&self) -> Option<&DeploymentResponse> {
        self.deployment.as_ref()
    }

    /// Id of the deployment started by the last write
    pub fn deployment_id(&self) -> Option<&str> {
        self.deployment.as_ref().map(|d| d.id.as_str())
    }

    fn ensure_set(&self) -> Result<(), ClientError> {
        if self.is_set() {
            Ok(())
        } else {
            Err(ClientError::EmptyEntity(ENTITY))
        }
    }

    fn clear(&mut self) {
        self.app = AppDefinition::default();
    }

    // =============================== LIFECYCLE ================================== //

    /// Hydrate from the control plane
    ///
    /// On failure the entity is reset so stale data is never exposed.
    pub async fn get(&mut self, id: &str) -> Result<&mut Self, ClientError> {
        self.clear();
        if id.is_empty() {
            return Err(ClientError::EmptyEntity(ENTITY));
        }
        debug!("Application: Get {}", id);

        let result = call::<AppEnvelope>(self.transport.as_ref(), Request::get(paths::app(id))).await;
        match result {
            Ok(envelope) => {
                self.app = envelope.app;
                Ok(self)
            }
            Err(e) => {
                debug!("Application: Get {} failed: {}", id, e);
                self.clear();
                Err(e)
            }
        }
    }

    /// Hydrate from a definition without any network call
    ///
    /// A definition without id leaves the entity untouched.
    pub fn set(&mut self, app: AppDefinition) -> &mut Self {
        if !app.id.is_empty() {
            debug!("Application: Set id = {}", app.id);
            self.app = app;
        }
        self
    }

    /// Hydrate and write the definition to the server
    pub async fn create(&mut self, app: AppDefinition) -> Result<&mut Self, ClientError> {
        if app.id.is_empty() {
            return Err(ClientError::EmptyEntity(ENTITY));
        }
        debug!("Application: Create id = {}", app.id);
        self.app = app;
        self.apply(true).await?;
        Ok(self)
    }

    /// Replace the definition and force-apply it
    pub async fn update(&mut self, app: AppDefinition) -> Result<(), ClientError> {
        if app.id.is_empty() {
            return Err(ClientError::EmptyEntity(ENTITY));
        }
        debug!("Application: Update id = {}", app.id);
        self.app = app;
        self.apply(true).await
    }

    /// Delete the application from the server
    ///
    /// The in-memory copy is cleared whether or not the server accepts.
    pub async fn destroy(&mut self) -> Result<(), ClientError> {
        self.ensure_set()?;
        let path = paths::app(&self.app.id);
        debug!("Application: Destroy id = {}", self.app.id);
        self.clear();

        let response = call(self.transport.as_ref(), Request::delete(path)).await?;
        self.deployment = response;
        Ok(())
    }

    /// Write the whole current definition to the server
    ///
    /// With `force` the write supersedes any deployment in progress for this
    /// application. Without it such a write is rejected with a 409, which is
    /// returned as is.
    pub async fn apply(&mut self, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        let request = Request::put(paths::app(&self.app.id))
            .with_force(force)
            .with_body(&self.app)?;
        debug!("Application: Apply({}) {}", force, request.path);

        let response: Option<DeploymentResponse> =
            call(self.transport.as_ref(), request).await.inspect_err(|e| {
                debug!("Application: Apply {} failed: {}", self.app.id, e);
            })?;

        if let Some(deploy) = &response {
            debug!(
                "Application: Apply {} => deployment {} ({:?})",
                self.app.id, deploy.id, deploy.version
            );
        }
        self.deployment = response;
        Ok(())
    }

    /// Copy of the current definition (default when unset)
    pub fn as_raw(&self) -> AppDefinition {
        self.app.clone()
    }

    // =============================== SCALING ================================== //

    /// Current instance count, `-1` when unset
    pub fn instances(&self) -> i64 {
        if self.is_set() {
            i64::from(self.app.instances)
        } else {
            -1
        }
    }

    pub async fn scale(&mut self, instances: u32, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        debug!(
            "Application: Scale {} to {} force={}",
            self.app.id, instances, force
        );
        self.app.instances = instances;
        self.apply(force).await
    }

    pub async fn start(&mut self, instances: u32, force: bool) -> Result<(), ClientError> {
        self.scale(instances, force).await
    }

    pub async fn stop(&mut self, force: bool) -> Result<(), ClientError> {
        self.scale(0, force).await
    }

    /// Alias for [`Application::stop`]
    pub async fn suspend(&mut self, force: bool) -> Result<(), ClientError> {
        self.stop(force).await
    }

    /// Trigger a rolling restart through the dedicated endpoint
    ///
    /// Leaves the local instance count untouched.
    pub async fn restart(&mut self, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        debug!("Application: Restart id = {} force = {}", self.app.id, force);
        let request = Request::post(paths::app_restart(&self.app.id)).with_force(force);
        self.deployment = call(self.transport.as_ref(), request).await?;
        Ok(())
    }

    // =============================== IMAGE ================================== //

    /// Tag of the docker image
    pub fn get_tag(&self) -> Result<String, ClientError> {
        self.ensure_set()?;
        image::tag_of(&self.app.container.docker.image).map(str::to_string)
    }

    /// Change the tag of the docker image, keeping registry and repository
    pub async fn set_tag(&mut self, tag: &str, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        self.app.container.docker.image = image::retag(&self.app.container.docker.image, tag)?;
        self.apply(force).await
    }

    // =============================== ENV ================================== //

    pub fn env(&self) -> Option<&HashMap<String, String>> {
        self.is_set().then_some(&self.app.env)
    }

    pub async fn set_env(&mut self, name: &str, value: &str, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        self.app.env.insert(name.to_string(), value.to_string());
        self.apply(force).await
    }

    pub async fn del_env(&mut self, name: &str, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        self.app.env.remove(name);
        self.apply(force).await
    }

    // =============================== RESOURCES ================================== //

    /// CPU shares, `-1` when unset
    pub fn cpus(&self) -> f64 {
        if self.is_set() {
            self.app.cpus
        } else {
            -1.0
        }
    }

    pub async fn set_cpus(&mut self, to: f64, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        self.app.cpus = to;
        self.apply(force).await
    }

    /// Memory in MiB, `-1` when unset
    pub fn memory(&self) -> f64 {
        if self.is_set() {
            self.app.mem
        } else {
            -1.0
        }
    }

    pub async fn set_memory(&mut self, to: f64, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        self.app.mem = to;
        self.apply(force).await
    }

    pub fn role(&self) -> &str {
        if self.is_set() {
            &self.app.role
        } else {
            ""
        }
    }

    pub async fn set_role(&mut self, to: &str, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        self.app.role = to.to_string();
        self.apply(force).await
    }

    // =============================== CONTAINER ================================== //

    pub fn container(&self) -> Option<&Container> {
        self.is_set().then_some(&self.app.container)
    }

    pub async fn set_container(&mut self, to: Container, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        self.app.container = to;
        self.apply(force).await
    }

    /// Docker exec parameters keyed by name
    pub fn parameters(&self) -> Result<HashMap<String, String>, ClientError> {
        self.ensure_set()?;
        let params = &self.app.container.docker.parameters;
        if params.is_empty() {
            return Err(ClientError::NoParameters(self.app.id.clone()));
        }
        Ok(params
            .iter()
            .map(|p| (p.key.clone(), p.value.clone()))
            .collect())
    }

    /// Update the parameter in place when the key exists, append otherwise
    pub async fn add_parameter(&mut self, key: &str, value: &str, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        let params = &mut self.app.container.docker.parameters;
        match params.iter().position(|p| p.key == key) {
            Some(index) => params[index].value = value.to_string(),
            None => params.push(DockerParameter::new(key, value)),
        }
        self.apply(force).await
    }

    /// Remove a parameter by key
    ///
    /// The last parameter takes the removed one's slot, so order is not kept.
    pub async fn del_parameter(&mut self, key: &str, force: bool) -> Result<(), ClientError> {
        self.ensure_set()?;
        let params = &mut self.app.container.docker.parameters;
        let Some(index) = params.iter().position(|p| p.key == key) else {
            return Err(ClientError::ParameterNotFound {
                key: key.to_string(),
                app: self.app.id.clone(),
            });
        };
        params.swap_remove(index);
        self.apply(force).await
    }

    // =============================== VERSIONS ================================== //

    /// All stored configuration versions
    pub async fn versions(&self) -> Result<Vec<String>, ClientError> {
        self.ensure_set()?;
        let versions: AppVersions = call(
            self.transport.as_ref(),
            Request::get(paths::app_versions(&self.app.id)),
        )
        .await?;
        Ok(versions.versions)
    }

    /// Most recent configuration version, `""` when there is none
    pub async fn last_version(&self) -> Result<String, ClientError> {
        Ok(self.versions().await?.into_iter().max().unwrap_or_default())
    }

    /// Rehydrate with the definition stored under `version`
    pub async fn config(&mut self, version: &str) -> Result<&mut Self, ClientError> {
        self.ensure_set()?;
        let request = Request::get(paths::app_version(&self.app.id, version));
        debug!("Application: Config {}", request.path);

        let result = call::<AppDefinition>(self.transport.as_ref(), request).await;
        match result {
            Ok(app) => {
                self.app = app;
                Ok(self)
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    // =============================== FILES ================================== //

    /// Hydrate from a `.json` or `.yaml` file
    pub async fn load(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ClientError> {
        self.clear();
        let result = File::new(path.as_ref()).read_as::<AppDefinition>().await;
        match result {
            Ok(app) => {
                self.app = app;
                Ok(self)
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Write the definition to a `.json` or `.yaml` file
    pub async fn dump(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        self.ensure_set()?;
        File::new(path.as_ref()).write_as(&self.app).await
    }
}
