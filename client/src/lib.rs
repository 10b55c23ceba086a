//! Marathon Client Library
//!
//! Orchestration core over a Marathon-style scheduler control plane:
//! application and group resources, tree-wide bulk operations and
//! deployment tracking.

pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod resources;
pub mod storage;
pub mod traverse;
pub mod utils;

pub use marathon_models as models;
