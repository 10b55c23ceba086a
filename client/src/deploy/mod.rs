//! Deployment lifecycle: listing, rollback and convergence tracking

pub mod deployments;
pub mod fsm;
pub mod tracker;

pub use deployments::Deployments;
pub use fsm::{TrackerEvent, TrackerFsm, TrackerState};
