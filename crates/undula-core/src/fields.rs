//! The mutable field state advanced by the stepper.

use ndarray::Array2;

use crate::config::Config;

/// Working state of one simulation: $E_z$, $H_x$, $H_y$.
///
/// All three arrays have the grid shape `(nx, ny)` and start at zero. Only
/// `[0, nx) x [0, ny-1)` of `hx` and `[0, nx-1) x [0, ny)` of `hy` carry
/// meaningful values; the outermost column/row is padding the kernels never
/// touch, so it stays zero.
#[derive(Debug, Clone)]
pub struct FieldSet {
    /// Out-of-plane electric field (V/m).
    pub ez: Array2<f64>,
    /// In-plane magnetic field along x (A/m).
    pub hx: Array2<f64>,
    /// In-plane magnetic field along y (A/m).
    pub hy: Array2<f64>,
}

impl FieldSet {
    /// Zero-initialised fields for the given grid.
    pub fn new(config: &Config) -> Self {
        let shape = config.shape();
        Self {
            ez: Array2::zeros(shape),
            hx: Array2::zeros(shape),
            hy: Array2::zeros(shape),
        }
    }

    /// Reset all three fields to zero.
    pub fn zero(&mut self) {
        self.ez.fill(0.0);
        self.hx.fill(0.0);
        self.hy.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let config = Config::new(1e-7, 1e-7, 1e-16, 6, 4, vec![0.0]).unwrap();
        let fields = FieldSet::new(&config);
        assert_eq!(fields.ez.dim(), (6, 4));
        assert!(fields.ez.iter().all(|&v| v == 0.0));
        assert!(fields.hx.iter().all(|&v| v == 0.0));
        assert!(fields.hy.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_resets() {
        let config = Config::new(1e-7, 1e-7, 1e-16, 6, 4, vec![0.0]).unwrap();
        let mut fields = FieldSet::new(&config);
        fields.ez[[2, 2]] = 1.0;
        fields.hx[[1, 1]] = -3.0;
        fields.zero();
        assert!(fields.ez.iter().all(|&v| v == 0.0));
        assert!(fields.hx.iter().all(|&v| v == 0.0));
    }
}
