//! Time-dependent excitations injected into $E_z$.
//!
//! Every variant obeys the same additive contract: `inject` adds a scalar
//! contribution to $E_z$ at each of its injection cells, evaluated at the
//! configuration's *current* simulated time. Sources never zero or scale
//! the field, so the contributions of several sources commute and sum.

use crate::config::Config;
use crate::error::EngineError;
use crate::fields::FieldSet;

/// A soft source driving $E_z$ at a fixed set of cells.
#[derive(Debug, Clone)]
pub enum Source {
    /// Superposition of continuous waves.
    MultiWavelength(MultiWavelength),
    /// Gaussian pulse in time.
    Impulsion(Impulsion),
}

impl Source {
    /// Continuous multi-wavelength source.
    ///
    /// At each injection cell, each step adds
    /// $\sum_k A_k \cos(\omega_k t + \phi_k)$.
    /// The `omega`, `amplitude`, and `delay` vectors must share a length.
    pub fn multi_wavelength(
        omega: Vec<f64>,
        amplitude: Vec<f64>,
        delay: Vec<f64>,
        cells: Vec<[usize; 2]>,
    ) -> Result<Self, EngineError> {
        MultiWavelength::new(omega, amplitude, delay, cells).map(Self::MultiWavelength)
    }

    /// Gaussian impulsion: each step adds
    /// $A \exp(-((t - t_0)/\tau)^2)$ at each injection cell.
    pub fn impulsion(
        amplitude: f64,
        duration: f64,
        delay: f64,
        cells: Vec<[usize; 2]>,
    ) -> Result<Self, EngineError> {
        Impulsion::new(amplitude, duration, delay, cells).map(Self::Impulsion)
    }

    /// Single-cell continuous source at angular frequency `omega`.
    pub fn point(omega: f64, amplitude: f64, cell: [usize; 2]) -> Result<Self, EngineError> {
        Self::multi_wavelength(vec![omega], vec![amplitude], vec![0.0], vec![cell])
    }

    /// Continuous source spanning the cells `(i, j0..=j1)` of one column.
    pub fn vertical_line(
        omega: f64,
        amplitude: f64,
        i: usize,
        j0: usize,
        j1: usize,
    ) -> Result<Self, EngineError> {
        let (lo, hi) = if j0 <= j1 { (j0, j1) } else { (j1, j0) };
        let cells = (lo..=hi).map(|j| [i, j]).collect();
        Self::multi_wavelength(vec![omega], vec![amplitude], vec![0.0], cells)
    }

    /// Add this source's contribution for the current time stamp.
    pub fn inject(&self, config: &Config, fields: &mut FieldSet) {
        match self {
            Self::MultiWavelength(source) => source.inject(config, fields),
            Self::Impulsion(source) => source.inject(config, fields),
        }
    }

    /// Injection cells, for bounds validation at run start.
    pub fn cells(&self) -> &[[usize; 2]] {
        match self {
            Self::MultiWavelength(source) => &source.cells,
            Self::Impulsion(source) => &source.cells,
        }
    }
}

/// Superposition of continuous waves, one (ω, A, φ) triple per component.
#[derive(Debug, Clone)]
pub struct MultiWavelength {
    omega: Vec<f64>,
    amplitude: Vec<f64>,
    delay: Vec<f64>,
    cells: Vec<[usize; 2]>,
}

impl MultiWavelength {
    pub fn new(
        omega: Vec<f64>,
        amplitude: Vec<f64>,
        delay: Vec<f64>,
        cells: Vec<[usize; 2]>,
    ) -> Result<Self, EngineError> {
        if omega.len() != amplitude.len() || omega.len() != delay.len() {
            return Err(EngineError::InvalidParameter(format!(
                "omega, amplitude, and delay must share a length, got {}, {}, {}",
                omega.len(),
                amplitude.len(),
                delay.len()
            )));
        }
        Ok(Self {
            omega,
            amplitude,
            delay,
            cells,
        })
    }

    fn inject(&self, config: &Config, fields: &mut FieldSet) {
        let t = config.time();
        let contribution: f64 = self
            .omega
            .iter()
            .zip(&self.amplitude)
            .zip(&self.delay)
            .map(|((&omega, &amplitude), &delay)| amplitude * (omega * t + delay).cos())
            .sum();
        for &[x, y] in &self.cells {
            fields.ez[[x, y]] += contribution;
        }
    }
}

/// Gaussian pulse in time, centred at `delay` with 1/e half-width `duration`.
#[derive(Debug, Clone)]
pub struct Impulsion {
    amplitude: f64,
    duration: f64,
    delay: f64,
    cells: Vec<[usize; 2]>,
}

impl Impulsion {
    pub fn new(
        amplitude: f64,
        duration: f64,
        delay: f64,
        cells: Vec<[usize; 2]>,
    ) -> Result<Self, EngineError> {
        if !(duration > 0.0) {
            return Err(EngineError::InvalidParameter(format!(
                "impulsion duration must be positive, got {duration:e}"
            )));
        }
        Ok(Self {
            amplitude,
            duration,
            delay,
            cells,
        })
    }

    fn inject(&self, config: &Config, fields: &mut FieldSet) {
        let argument = (config.time() - self.delay) / self.duration;
        let contribution = self.amplitude * (-argument * argument).exp();
        for &[x, y] in &self.cells {
            fields.ez[[x, y]] += contribution;
        }
    }
}
