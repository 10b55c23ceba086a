//! API models

pub mod app;
pub mod container;
pub mod deployment;
pub mod failure;
pub mod group;
