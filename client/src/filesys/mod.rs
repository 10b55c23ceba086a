//! File load/dump helpers

pub mod file;
