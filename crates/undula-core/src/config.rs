//! Grid and time discretisation parameters.
//!
//! A [`Config`] is constructed once before a run. The spatial and temporal
//! parameters are immutable; the step cursor (`iteration`, `time`) is the
//! only state the engine advances.

use crate::error::EngineError;
use crate::physics;

/// Immutable grid/time parameters plus the mutable step cursor.
///
/// The domain spans `(nx - 1) * dx` by `(ny - 1) * dy` metres; integer
/// indices `(i, j)` address cell centres, with `i` (the x-index) as the
/// outer, row-major dimension.
#[derive(Debug, Clone)]
pub struct Config {
    /// Grid spacing along x (m).
    pub dx: f64,
    /// Grid spacing along y (m).
    pub dy: f64,
    /// Time step (s).
    pub dt: f64,
    /// Number of cells along x.
    pub nx: usize,
    /// Number of cells along y.
    pub ny: usize,
    time_stamps: Vec<f64>,
    iteration: usize,
    time: f64,
}

impl Config {
    /// Create a configuration from explicit discretisation parameters.
    ///
    /// `time_stamps[k]` is the physical time at which iteration `k` begins;
    /// the sequence must be non-empty and strictly increasing.
    pub fn new(
        dx: f64,
        dy: f64,
        dt: f64,
        nx: usize,
        ny: usize,
        time_stamps: Vec<f64>,
    ) -> Result<Self, EngineError> {
        if !(dx > 0.0) || !(dy > 0.0) || !(dt > 0.0) {
            return Err(EngineError::InvalidParameter(format!(
                "dx, dy, dt must be positive, got ({dx:e}, {dy:e}, {dt:e})"
            )));
        }
        if nx < 3 || ny < 3 {
            return Err(EngineError::InvalidParameter(format!(
                "grid must be at least 3x3 to have an interior, got {nx}x{ny}"
            )));
        }
        if time_stamps.is_empty() {
            return Err(EngineError::InvalidParameter(
                "time_stamps must not be empty".into(),
            ));
        }
        if time_stamps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(EngineError::InvalidParameter(
                "time_stamps must be strictly increasing".into(),
            ));
        }
        let time = time_stamps[0];
        Ok(Self {
            dx,
            dy,
            dt,
            nx,
            ny,
            time_stamps,
            iteration: 0,
            time,
        })
    }

    /// Derive a configuration from a target spatial resolution.
    ///
    /// The cell counts are chosen so the domain of extent
    /// `size_x` x `size_y` metres is spanned with spacing as close to
    /// `resolution` as possible, the time step is set to the vacuum Courant
    /// limit, and the stamps are `k * dt` for `k = 0..n_steps`.
    pub fn from_resolution(
        resolution: f64,
        size_x: f64,
        size_y: f64,
        n_steps: usize,
    ) -> Result<Self, EngineError> {
        if !(resolution > 0.0) || !(size_x > 0.0) || !(size_y > 0.0) {
            return Err(EngineError::InvalidParameter(format!(
                "resolution and domain sizes must be positive, got ({resolution:e}, {size_x:e}, {size_y:e})"
            )));
        }
        let nx = (size_x / resolution).round() as usize + 1;
        let ny = (size_y / resolution).round() as usize + 1;
        if nx < 3 || ny < 3 {
            return Err(EngineError::InvalidParameter(format!(
                "resolution {resolution:e} m is too coarse for a {size_x:e} x {size_y:e} m domain"
            )));
        }
        let dx = size_x / (nx - 1) as f64;
        let dy = size_y / (ny - 1) as f64;

        let c = physics::light_speed(physics::MU_0, physics::EPSILON_0);
        let dt = physics::courant_limit(dx, dy, c);
        let time_stamps = (0..n_steps).map(|k| k as f64 * dt).collect();

        Self::new(dx, dy, dt, nx, ny, time_stamps)
    }

    /// Number of time steps in the schedule.
    pub fn n_steps(&self) -> usize {
        self.time_stamps.len()
    }

    /// Grid dimensions `(nx, ny)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Index of the step currently being computed.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Physical time of the step currently being computed (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The full time schedule.
    pub fn time_stamps(&self) -> &[f64] {
        &self.time_stamps
    }

    /// Move the cursor to the next time stamp.
    ///
    /// # Panics
    ///
    /// Panics when advanced past the final stamp; the engine never does, so
    /// hitting this indicates a caller bug.
    pub fn advance(&mut self) {
        self.iteration += 1;
        assert!(
            self.iteration < self.time_stamps.len(),
            "advanced past the final time stamp ({} steps)",
            self.time_stamps.len()
        );
        self.time = self.time_stamps[self.iteration];
    }

    /// Rewind the cursor to the first stamp.
    pub fn rewind(&mut self) {
        self.iteration = 0;
        self.time = self.time_stamps[0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_resolution_spans_domain() {
        let config = Config::from_resolution(1e-7, 1e-5, 1e-5, 50).unwrap();
        assert_eq!(config.shape(), (101, 101));
        assert_relative_eq!(config.dx, 1e-7, max_relative = 1e-12);
        assert_relative_eq!(
            config.dx * (config.nx - 1) as f64,
            1e-5,
            max_relative = 1e-12
        );
        // dt sits exactly at the vacuum Courant limit.
        let c = physics::light_speed(physics::MU_0, physics::EPSILON_0);
        assert_relative_eq!(
            config.dt,
            physics::courant_limit(config.dx, config.dy, c),
            max_relative = 1e-15
        );
    }

    #[test]
    fn test_advance_follows_schedule() {
        let stamps = vec![0.0, 1e-15, 2.5e-15];
        let mut config = Config::new(1e-7, 1e-7, 1e-15, 5, 5, stamps).unwrap();
        assert_eq!(config.iteration(), 0);
        assert_eq!(config.time(), 0.0);
        config.advance();
        assert_eq!(config.iteration(), 1);
        assert_eq!(config.time(), 1e-15);
        config.advance();
        assert_eq!(config.time(), 2.5e-15);
        config.rewind();
        assert_eq!(config.iteration(), 0);
        assert_eq!(config.time(), 0.0);
    }

    #[test]
    #[should_panic(expected = "advanced past the final time stamp")]
    fn test_advance_past_end_panics() {
        let mut config = Config::new(1e-7, 1e-7, 1e-15, 5, 5, vec![0.0]).unwrap();
        config.advance();
    }

    #[test]
    fn test_rejects_bad_schedules() {
        assert!(Config::new(1e-7, 1e-7, 1e-15, 5, 5, vec![]).is_err());
        assert!(Config::new(1e-7, 1e-7, 1e-15, 5, 5, vec![0.0, 0.0]).is_err());
        assert!(Config::new(1e-7, 1e-7, 1e-15, 5, 5, vec![0.0, 2e-15, 1e-15]).is_err());
        assert!(Config::new(-1e-7, 1e-7, 1e-15, 5, 5, vec![0.0]).is_err());
        assert!(Config::new(1e-7, 1e-7, 1e-15, 2, 5, vec![0.0]).is_err());
    }
}
