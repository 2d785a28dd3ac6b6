//! Polynomial conductivity profiles for the perfectly matched layer.
//!
//! The absorbing bands along each edge of the domain carry a conductivity
//! that ramps from zero at the inner edge to `sigma_max` at the outermost
//! cell:
//!
//! $$ \sigma(d) = \sigma_{max} \left( \frac{d}{W} \right)^p $$
//!
//! where $d$ is the distance in cells into the band of width $W$ and $p$ is
//! the polynomial order. This is the first-order uniaxial formulation: the
//! profiles feed a multiplicative per-step loss factor rather than
//! Berenger's auxiliary split fields, which is accurate for modest
//! $\sigma_{max} \Delta t / 2\mu$ and degrades over very long runs.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Parameters of the absorbing bands enclosing the domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PmlLayer {
    /// Band width in cells.
    #[serde(default = "default_width")]
    pub width: usize,
    /// Conductivity at the outermost cell (S/m).
    #[serde(default = "default_sigma_max")]
    pub sigma_max: f64,
    /// Polynomial order of the ramp.
    #[serde(default = "default_order")]
    pub order: u32,
}

fn default_width() -> usize {
    10
}
fn default_sigma_max() -> f64 {
    0.045
}
fn default_order() -> u32 {
    3
}

impl Default for PmlLayer {
    fn default() -> Self {
        Self {
            width: default_width(),
            sigma_max: default_sigma_max(),
            order: default_order(),
        }
    }
}

impl PmlLayer {
    /// A layer whose width is a fraction of the smaller grid dimension.
    pub fn from_fraction(fraction: f64, config: &Config, sigma_max: f64, order: u32) -> Self {
        let cells = config.nx.min(config.ny) as f64 * fraction;
        Self {
            width: cells.round() as usize,
            sigma_max,
            order,
        }
    }

    /// Build the `sigma_x` and `sigma_y` maps for the four bands.
    ///
    /// `sigma_x` ramps in the left/right bands, `sigma_y` in the
    /// bottom/top bands; both vanish in the interior. Corner cells carry
    /// both components.
    pub fn sigma_profiles(&self, config: &Config) -> (Array2<f64>, Array2<f64>) {
        let (nx, ny) = config.shape();
        let mut sigma_x = Array2::zeros((nx, ny));
        let mut sigma_y = Array2::zeros((nx, ny));

        if self.width == 0 {
            return (sigma_x, sigma_y);
        }
        let w = self.width as f64;
        let p = self.order as i32;

        for i in 0..nx {
            for j in 0..ny {
                if i < self.width {
                    sigma_x[[i, j]] = self.sigma_max * ((w - i as f64) / w).powi(p);
                } else if i >= nx - self.width {
                    sigma_x[[i, j]] =
                        self.sigma_max * ((i - (nx - self.width - 1)) as f64 / w).powi(p);
                }

                if j < self.width {
                    sigma_y[[i, j]] = self.sigma_max * ((w - j as f64) / w).powi(p);
                } else if j >= ny - self.width {
                    sigma_y[[i, j]] =
                        self.sigma_max * ((j - (ny - self.width - 1)) as f64 / w).powi(p);
                }
            }
        }

        (sigma_x, sigma_y)
    }
}
