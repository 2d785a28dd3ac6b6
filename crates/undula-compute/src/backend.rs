//! Device description and backend errors.

use thiserror::Error;

/// Errors originating from compute backends.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(String),
}

/// Describes the execution resources a backend provides.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub compute_units: usize,
}
