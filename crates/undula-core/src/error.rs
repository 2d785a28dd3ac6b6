//! Errors surfaced at the engine boundary.
//!
//! All four kinds are fatal: the run aborts, the prefix of the recording
//! written up to the last good step is retained, and the error carries
//! enough context to locate the offending cell or step. There is no retry
//! and no partial recovery.

use thiserror::Error;

/// Errors that can occur while building or running a simulation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A material or recording array disagrees with the grid dimensions.
    #[error("{what}: expected shape {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A scalar or array parameter is outside its admissible range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A source injection index lies outside the grid.
    #[error("Source {index} injects at ({x}, {y}), outside the {nx}x{ny} grid")]
    SourceOutOfBounds {
        index: usize,
        x: usize,
        y: usize,
        nx: usize,
        ny: usize,
    },

    /// A non-finite value appeared in a field array; the run is unstable.
    #[error("Non-finite {field} at cell ({x}, {y}) after step {step}")]
    NumericalInstability {
        step: usize,
        field: &'static str,
        x: usize,
        y: usize,
    },
}
