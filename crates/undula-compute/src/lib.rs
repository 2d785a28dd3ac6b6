//! # Undula Compute
//!
//! Worker-pool management for the Undula stencil kernels. The physics code
//! in `undula-core` parallelises its cell sweeps over whatever Rayon pool
//! is installed at the call site; this crate builds and describes that
//! pool so runners can size it explicitly instead of inheriting the global
//! default.

pub mod backend;
pub mod cpu;

pub use backend::{ComputeError, DeviceInfo};
pub use cpu::CpuBackend;
