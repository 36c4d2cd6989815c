//! Shared utilities for the sigrelay workspace.

pub mod logger;
pub mod time;
