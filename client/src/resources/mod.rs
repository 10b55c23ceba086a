//! Resource tree model: applications, groups and filtered application sets

pub mod application;
pub mod bulk;
pub mod filtered;
pub mod group;
pub mod image;

pub use application::Application;
pub use bulk::BulkOp;
pub use filtered::{AppSummary, FilteredApps};
pub use group::Groups;
