//! Per-application operations shared by group and filtered bulk calls

use std::fmt;

use crate::errors::ClientError;
use crate::resources::application::Application;

/// Lifecycle operation applied to every application of a set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOp {
    Scale(u32),
    Start(u32),
    Stop,
    Suspend,
    Restart,
}

impl BulkOp {
    /// Instance count the operation leaves behind, if it changes it
    pub fn instances(&self) -> Option<u32> {
        match self {
            BulkOp::Scale(n) | BulkOp::Start(n) => Some(*n),
            BulkOp::Stop | BulkOp::Suspend => Some(0),
            BulkOp::Restart => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BulkOp::Scale(_) => "Scale",
            BulkOp::Start(_) => "Start",
            BulkOp::Stop => "Stop",
            BulkOp::Suspend => "Suspend",
            BulkOp::Restart => "Restart",
        }
    }

    /// Run the operation on a hydrated application
    pub async fn run(&self, app: &mut Application, force: bool) -> Result<(), ClientError> {
        match *self {
            BulkOp::Scale(n) => app.scale(n, force).await,
            BulkOp::Start(n) => app.start(n, force).await,
            BulkOp::Stop => app.stop(force).await,
            BulkOp::Suspend => app.suspend(force).await,
            BulkOp::Restart => app.restart(force).await,
        }
    }

    /// Fetch `id` into `app`, then run the operation on it
    pub async fn run_on(&self, app: &mut Application, id: &str, force: bool) -> Result<(), ClientError> {
        app.get(id).await?;
        self.run(app, force).await
    }
}

impl fmt::Display for BulkOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkOp::Scale(n) | BulkOp::Start(n) => write!(f, "{}({})", self.name(), n),
            _ => f.write_str(self.name()),
        }
    }
}
