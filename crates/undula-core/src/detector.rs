//! Point probes over a finished recording.
//!
//! Detectors post-process the `(n_steps, nx, ny)` recording produced by
//! the engine; they take no part in the stepping loop itself.

use ndarray::{s, Array1, ArrayView3};

use crate::error::EngineError;

/// A probe reading the recorded $E_z$ trace at one cell.
#[derive(Debug, Clone, Copy)]
pub struct PointDetector {
    /// Cell x-index.
    pub i: usize,
    /// Cell y-index.
    pub j: usize,
}

impl PointDetector {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    /// Extract the time series `ez_time[:, i, j]`.
    pub fn time_series(&self, ez_time: ArrayView3<'_, f64>) -> Result<Array1<f64>, EngineError> {
        let (_, nx, ny) = ez_time.dim();
        if self.i >= nx || self.j >= ny {
            return Err(EngineError::InvalidParameter(format!(
                "detector at ({}, {}) lies outside the {nx}x{ny} grid",
                self.i, self.j
            )));
        }
        Ok(ez_time.slice(s![.., self.i, self.j]).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_extracts_trace() {
        let mut ez_time = Array3::zeros((4, 3, 3));
        for k in 0..4 {
            ez_time[[k, 1, 2]] = k as f64 + 0.5;
        }
        let detector = PointDetector::new(1, 2);
        let trace = detector.time_series(ez_time.view()).unwrap();
        assert_eq!(trace.to_vec(), vec![0.5, 1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_rejects_out_of_grid_probe() {
        let ez_time = Array3::zeros((4, 3, 3));
        let detector = PointDetector::new(3, 0);
        assert!(detector.time_series(ez_time.view()).is_err());
    }
}
