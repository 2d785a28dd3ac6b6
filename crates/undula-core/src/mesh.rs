//! Material maps on the $E_z$ grid.
//!
//! A [`MeshSet`] holds the spatially varying permittivity, the Kerr and SHG
//! nonlinear coefficients, the PML conductivity components, and the scalar
//! permeability. Construction validates every invariant the kernels rely
//! on; after that the mesh is read-only for the duration of the run.

use ndarray::Array2;

use crate::config::Config;
use crate::error::EngineError;
use crate::physics::EPSILON_0;
use crate::pml::PmlLayer;

/// Immutable material distribution for one simulation.
///
/// All arrays share the grid shape `(nx, ny)` and are collocated with
/// $E_z$. The permittivity is *absolute* (F/m); callers working in relative
/// units scale by $\epsilon_0$ before construction, or use
/// [`MeshSet::uniform`] which does so.
#[derive(Debug, Clone)]
pub struct MeshSet {
    epsilon: Array2<f64>,
    n2: Array2<f64>,
    gamma: Array2<f64>,
    sigma_x: Array2<f64>,
    sigma_y: Array2<f64>,
    mu: f64,
}

impl MeshSet {
    /// Build a mesh from fully populated material arrays.
    ///
    /// Validates: shapes match the grid; $\epsilon > 0$ and finite
    /// everywhere; $\mu > 0$; $\sigma_x, \sigma_y \ge 0$; and the magnetic
    /// loss term $\sigma_{max} \Delta t / 2\mu \le 1$, so the H-update
    /// attenuation factor can never flip sign.
    pub fn new(
        config: &Config,
        epsilon: Array2<f64>,
        n2: Array2<f64>,
        gamma: Array2<f64>,
        mu: f64,
        sigma_x: Array2<f64>,
        sigma_y: Array2<f64>,
    ) -> Result<Self, EngineError> {
        let shape = config.shape();
        check_shape("epsilon map", &epsilon, shape)?;
        check_shape("n2 map", &n2, shape)?;
        check_shape("gamma map", &gamma, shape)?;
        check_shape("sigma_x map", &sigma_x, shape)?;
        check_shape("sigma_y map", &sigma_y, shape)?;

        if !(mu > 0.0) || !mu.is_finite() {
            return Err(EngineError::InvalidParameter(format!(
                "permeability must be positive and finite, got {mu:e}"
            )));
        }
        if let Some(((i, j), &value)) = epsilon
            .indexed_iter()
            .find(|(_, v)| !(**v > 0.0) || !v.is_finite())
        {
            return Err(EngineError::InvalidParameter(format!(
                "permittivity must be positive and finite, got {value:e} at ({i}, {j})"
            )));
        }

        let mut sigma_max = 0.0f64;
        for sigma in [&sigma_x, &sigma_y] {
            if let Some(((i, j), &value)) = sigma
                .indexed_iter()
                .find(|(_, v)| !(**v >= 0.0) || !v.is_finite())
            {
                return Err(EngineError::InvalidParameter(format!(
                    "conductivity must be non-negative and finite, got {value:e} at ({i}, {j})"
                )));
            }
            sigma_max = sigma.iter().copied().fold(sigma_max, f64::max);
        }
        let loss_term = sigma_max * config.dt / (2.0 * mu);
        if loss_term > 1.0 {
            return Err(EngineError::InvalidParameter(format!(
                "sigma_max * dt / 2mu = {loss_term:.3e} exceeds 1; the H-field \
                 attenuation factor would change sign"
            )));
        }

        Ok(Self {
            epsilon,
            n2,
            gamma,
            sigma_x,
            sigma_y,
            mu,
        })
    }

    /// A lossless homogeneous medium of relative permittivity `epsilon_r`.
    ///
    /// The nonlinear coefficients and conductivities are zero; `mu` is
    /// absolute (H/m), typically [`crate::physics::MU_0`].
    pub fn uniform(config: &Config, epsilon_r: f64, mu: f64) -> Result<Self, EngineError> {
        let shape = config.shape();
        Self::new(
            config,
            Array2::from_elem(shape, epsilon_r * EPSILON_0),
            Array2::zeros(shape),
            Array2::zeros(shape),
            mu,
            Array2::zeros(shape),
            Array2::zeros(shape),
        )
    }

    /// Replace the conductivity maps with the profiles of `layer`.
    ///
    /// Consumes and returns the mesh so the loss-term bound is re-validated
    /// against the new profiles.
    pub fn with_pml(self, config: &Config, layer: &PmlLayer) -> Result<Self, EngineError> {
        let (sigma_x, sigma_y) = layer.sigma_profiles(config);
        Self::new(
            config,
            self.epsilon,
            self.n2,
            self.gamma,
            self.mu,
            sigma_x,
            sigma_y,
        )
    }

    /// Absolute permittivity map (F/m).
    pub fn epsilon(&self) -> &Array2<f64> {
        &self.epsilon
    }

    /// Kerr coefficient map.
    pub fn n2(&self) -> &Array2<f64> {
        &self.n2
    }

    /// SHG coefficient map.
    pub fn gamma(&self) -> &Array2<f64> {
        &self.gamma
    }

    /// PML conductivity along x (S/m).
    pub fn sigma_x(&self) -> &Array2<f64> {
        &self.sigma_x
    }

    /// PML conductivity along y (S/m).
    pub fn sigma_y(&self) -> &Array2<f64> {
        &self.sigma_y
    }

    /// Scalar permeability (H/m).
    pub fn mu(&self) -> f64 {
        self.mu
    }
}

fn check_shape(
    what: &'static str,
    array: &Array2<f64>,
    shape: (usize, usize),
) -> Result<(), EngineError> {
    if array.dim() != shape {
        return Err(EngineError::ShapeMismatch {
            what,
            expected: vec![shape.0, shape.1],
            actual: array.shape().to_vec(),
        });
    }
    Ok(())
}
