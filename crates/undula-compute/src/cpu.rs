//! CPU backend: a sized Rayon thread pool with static work partitioning.

use rayon::ThreadPool;

use crate::backend::{ComputeError, DeviceInfo};

/// CPU backend that runs the stencil sweeps across a dedicated thread pool.
pub struct CpuBackend {
    num_threads: usize,
}

impl CpuBackend {
    /// Create a backend using all available threads.
    pub fn new() -> Self {
        Self {
            num_threads: rayon::current_num_threads(),
        }
    }

    /// Create a backend with a specified thread count.
    pub fn with_threads(num_threads: usize) -> Self {
        Self { num_threads }
    }

    /// Return information about the device.
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: format!("CPU ({} threads)", self.num_threads),
            compute_units: self.num_threads,
        }
    }

    /// Build the dedicated pool. Closures run under
    /// [`ThreadPool::install`] so every parallel iterator inside them uses
    /// this pool rather than the global one.
    pub fn build_pool(&self) -> Result<ThreadPool, ComputeError> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
            .map_err(|e| ComputeError::PoolBuild(e.to_string()))
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}
