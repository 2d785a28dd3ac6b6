//! The stepping loop: validation, recording, cancellation.
//!
//! The [`Engine`] owns the configuration, the material mesh, the working
//! fields, and the source list, and exposes one synchronous entry point:
//! [`Engine::run`]. Validation (shapes, source bounds, the Courant
//! criterion) happens before any step executes; the per-step finiteness
//! check is the only runtime guard. On any error the recording rows
//! already written are retained.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ndarray::{Array3, Axis};

use crate::config::Config;
use crate::error::EngineError;
use crate::fields::FieldSet;
use crate::mesh::MeshSet;
use crate::physics;
use crate::source::Source;
use crate::stepper::Stepper;

/// Orchestrates a full FDTD run over the configured time schedule.
pub struct Engine {
    config: Config,
    mesh: MeshSet,
    fields: FieldSet,
    sources: Vec<Source>,
    kerr_enabled: bool,
    cancel: Arc<AtomicBool>,
}

impl Engine {
    /// Assemble an engine and verify the Courant stability criterion
    /// against the background light speed $1/\sqrt{\mu \epsilon_0}$.
    pub fn new(config: Config, mesh: MeshSet) -> Result<Self, EngineError> {
        let c = physics::light_speed(mesh.mu(), physics::EPSILON_0);
        let limit = physics::courant_limit(config.dx, config.dy, c);
        if config.dt > limit {
            return Err(EngineError::InvalidParameter(format!(
                "dt = {:.6e} s violates the Courant criterion (limit {:.6e} s \
                 for dx = {:.3e} m, dy = {:.3e} m)",
                config.dt, limit, config.dx, config.dy
            )));
        }
        let fields = FieldSet::new(&config);
        Ok(Self {
            config,
            mesh,
            fields,
            sources: Vec::new(),
            kerr_enabled: false,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Append a source. Injection order within a step follows insertion
    /// order; contributions are additive, so the order is unobservable.
    pub fn add_source(&mut self, source: Source) {
        self.sources.push(source);
    }

    /// Opt in to the Kerr correction (off by default; the literal update
    /// formula is under review).
    pub fn enable_kerr(&mut self) {
        self.kerr_enabled = true;
    }

    /// Cooperative cancellation flag, checked at the top of every
    /// iteration. Setting it makes `run` return early with the count of
    /// steps already recorded; mid-step cancellation is not supported.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mesh(&self) -> &MeshSet {
        &self.mesh
    }

    /// Mutable access to the working fields, for seeding an initial state
    /// before the run. Fields start zeroed.
    pub fn fields_mut(&mut self) -> &mut FieldSet {
        &mut self.fields
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Zero the fields and rewind the time cursor so the engine can run
    /// again from scratch.
    pub fn reset(&mut self) {
        self.fields.zero();
        self.config.rewind();
    }

    /// Execute every step of the schedule, writing the $E_z$ snapshot of
    /// step `k` into `ez_time[k]`.
    ///
    /// `ez_time` must be caller-allocated with shape `(n_steps, nx, ny)`.
    /// After a complete run, `ez_time[k]` holds $E_z$ at `time_stamps[k]`
    /// immediately after source injection for step `k`.
    ///
    /// Returns the number of steps recorded: `n_steps` on completion,
    /// fewer only when cancelled. Errors abort the run and leave the
    /// recorded prefix intact.
    pub fn run(&mut self, ez_time: &mut Array3<f64>) -> Result<usize, EngineError> {
        let (nx, ny) = self.config.shape();
        let n_steps = self.config.n_steps();

        if self.config.iteration() != 0 {
            return Err(EngineError::InvalidParameter(
                "engine has already advanced; call reset() before running again".into(),
            ));
        }
        if ez_time.dim() != (n_steps, nx, ny) {
            return Err(EngineError::ShapeMismatch {
                what: "Ez recording array",
                expected: vec![n_steps, nx, ny],
                actual: ez_time.shape().to_vec(),
            });
        }
        for (index, source) in self.sources.iter().enumerate() {
            for &[x, y] in source.cells() {
                if x >= nx || y >= ny {
                    return Err(EngineError::SourceOutOfBounds { index, x, y, nx, ny });
                }
            }
        }

        let mut stepper = Stepper::new(&self.config, self.kerr_enabled);

        for k in 0..n_steps {
            if self.cancel.load(Ordering::Relaxed) {
                return Ok(k);
            }
            stepper.step(
                &self.config,
                &self.mesh,
                &mut self.fields,
                &self.sources,
                ez_time.index_axis_mut(Axis(0), k),
            )?;
            if k + 1 < n_steps {
                self.config.advance();
            }
        }
        Ok(n_steps)
    }
}
