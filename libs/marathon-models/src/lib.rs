//! Marathon wire models
//!
//! Serde representations of the payloads exchanged with the Marathon REST
//! control plane. These types carry no behavior beyond (de)serialization.

pub mod models;

pub use models::app::{
    AppDefinition, AppEnvelope, AppList, AppVersions, Fetch, Network, UnreachableStrategy,
    UpgradeStrategy,
};
pub use models::container::{Container, Docker, DockerParameter, PortMapping, Volume};
pub use models::deployment::{
    Action, CurrentAction, Deployment, DeploymentResponse, LastResponse, ReadinessCheckResult, Step,
};
pub use models::failure::FailureMessage;
pub use models::group::Group;
