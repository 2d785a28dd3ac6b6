//! The Yee update kernels: one full leapfrog iteration per call.
//!
//! E-components and H-components live half a cell apart in space and half a
//! step apart in time, so a step interleaves two curl evaluations:
//!
//! $$ H^{n+1/2} = H^{n-1/2} - \frac{\Delta t}{\mu} \nabla \times E^n $$
//! $$ E^{n+1} = E^n + \frac{\Delta t}{\epsilon} \nabla \times H^{n+1/2} $$
//!
//! followed by the nonlinear corrections, the PML absorption of $E_z$, the
//! source injections, and the snapshot recording. The sub-step order is
//! strict; each kernel reads the completed writes of the one before it.
//!
//! Every kernel is an independent sweep over cells with no loop-carried
//! dependency, parallelised with [`ndarray::Zip::par_for_each`] across the
//! Rayon pool installed by the caller. The four gradient buffers are
//! allocated once and reused across steps, keeping the hot path
//! allocation-free.

use ndarray::{s, Array2, ArrayViewMut2, Zip};

use crate::config::Config;
use crate::error::EngineError;
use crate::fields::FieldSet;
use crate::mesh::MeshSet;
use crate::source::Source;

/// One-step state machine over a [`FieldSet`].
///
/// The stepper itself is stateless between steps apart from its reusable
/// scratch buffers; the schedule cursor lives in [`Config`].
pub struct Stepper {
    /// $\partial E_z / \partial x$ at the $H_y$ points, shape `(nx-1, ny)`.
    dez_dx: Array2<f64>,
    /// $\partial E_z / \partial y$ at the $H_x$ points, shape `(nx, ny-1)`.
    dez_dy: Array2<f64>,
    /// $\partial H_y / \partial x$ on the strict interior, shape `(nx-2, ny-2)`.
    dhy_dx: Array2<f64>,
    /// $\partial H_x / \partial y$ on the strict interior, shape `(nx-2, ny-2)`.
    dhx_dy: Array2<f64>,
    kerr_enabled: bool,
}

impl Stepper {
    /// Allocate the gradient buffers for the given grid.
    ///
    /// `kerr_enabled` opts in to the intensity-dependent permittivity
    /// correction; see [`Stepper::apply_kerr`].
    pub fn new(config: &Config, kerr_enabled: bool) -> Self {
        let (nx, ny) = config.shape();
        Self {
            dez_dx: Array2::zeros((nx - 1, ny)),
            dez_dy: Array2::zeros((nx, ny - 1)),
            dhy_dx: Array2::zeros((nx - 2, ny - 2)),
            dhx_dy: Array2::zeros((nx - 2, ny - 2)),
            kerr_enabled,
        }
    }

    /// Advance the fields by one time step and record the result.
    ///
    /// Performs, in order: the H update from the curl of E, the E update
    /// from the curl of H, the optional Kerr correction, SHG, PML
    /// absorption, source injection, the $E_z$ snapshot into `record`, and
    /// the per-step finiteness check. The caller advances the config
    /// cursor afterwards.
    pub fn step(
        &mut self,
        config: &Config,
        mesh: &MeshSet,
        fields: &mut FieldSet,
        sources: &[Source],
        mut record: ArrayViewMut2<'_, f64>,
    ) -> Result<(), EngineError> {
        self.update_magnetic(config, mesh, fields);
        self.update_electric(config, mesh, fields);
        if self.kerr_enabled {
            self.apply_kerr(config, mesh, fields);
        }
        self.apply_shg(config, mesh, fields);
        self.apply_absorption(config, mesh, fields);

        for source in sources {
            source.inject(config, fields);
        }

        record.assign(&fields.ez);
        self.check_finite(config, fields)
    }

    /// H update: $H_x \mathrel{-}= \frac{\Delta t}{\mu} \partial_y E_z$,
    /// $H_y \mathrel{+}= \frac{\Delta t}{\mu} \partial_x E_z$, each damped
    /// by the first-order PML factor $1 - \sigma \Delta t / 2\mu$.
    ///
    /// The factor is collocated with $E_z$ and is never clamped; mesh
    /// construction guarantees it cannot change sign.
    fn update_magnetic(&mut self, config: &Config, mesh: &MeshSet, fields: &mut FieldSet) {
        let (nx, ny) = config.shape();
        let dx = config.dx;
        let dy = config.dy;
        let mu_factor = config.dt / mesh.mu();

        Zip::from(&mut self.dez_dx)
            .and(fields.ez.slice(s![1.., ..]))
            .and(fields.ez.slice(s![..nx - 1, ..]))
            .par_for_each(|g, &ahead, &here| *g = (ahead - here) / dx);

        Zip::from(&mut self.dez_dy)
            .and(fields.ez.slice(s![.., 1..]))
            .and(fields.ez.slice(s![.., ..ny - 1]))
            .par_for_each(|g, &ahead, &here| *g = (ahead - here) / dy);

        Zip::from(fields.hx.slice_mut(s![.., ..ny - 1]))
            .and(&self.dez_dy)
            .and(mesh.sigma_y().slice(s![.., ..ny - 1]))
            .par_for_each(|h, &g, &sigma| {
                *h -= mu_factor * g * (1.0 - sigma * mu_factor / 2.0);
            });

        Zip::from(fields.hy.slice_mut(s![..nx - 1, ..]))
            .and(&self.dez_dx)
            .and(mesh.sigma_x().slice(s![..nx - 1, ..]))
            .par_for_each(|h, &g, &sigma| {
                *h += mu_factor * g * (1.0 - sigma * mu_factor / 2.0);
            });
    }

    /// E update on the strict interior:
    /// $E_z \mathrel{+}= \frac{\Delta t}{\epsilon} (\partial_x H_y - \partial_y H_x)$.
    ///
    /// Boundary cells keep their $E_z$, which pins the outermost ring to
    /// zero for a run started from zeroed fields.
    fn update_electric(&mut self, config: &Config, mesh: &MeshSet, fields: &mut FieldSet) {
        let (nx, ny) = config.shape();
        let dx = config.dx;
        let dy = config.dy;
        let dt = config.dt;

        Zip::from(&mut self.dhy_dx)
            .and(fields.hy.slice(s![1..nx - 1, 1..ny - 1]))
            .and(fields.hy.slice(s![..nx - 2, 1..ny - 1]))
            .par_for_each(|g, &here, &behind| *g = (here - behind) / dx);

        Zip::from(&mut self.dhx_dy)
            .and(fields.hx.slice(s![1..nx - 1, 1..ny - 1]))
            .and(fields.hx.slice(s![1..nx - 1, ..ny - 2]))
            .par_for_each(|g, &here, &behind| *g = (here - behind) / dy);

        Zip::from(fields.ez.slice_mut(s![1..nx - 1, 1..ny - 1]))
            .and(&self.dhy_dx)
            .and(&self.dhx_dy)
            .and(mesh.epsilon().slice(s![1..nx - 1, 1..ny - 1]))
            .par_for_each(|e, &gx, &gy, &epsilon| *e += dt / epsilon * (gx - gy));
    }

    /// Kerr correction on the interior:
    /// $E_z \mathrel{*}= \Delta t / (\epsilon + n_2 E_z^2)$.
    ///
    /// Disabled by default: the literal formula is under review (it is not
    /// a standard Kerr update), so it only runs when the stepper was built
    /// with `kerr_enabled`.
    fn apply_kerr(&self, config: &Config, mesh: &MeshSet, fields: &mut FieldSet) {
        let (nx, ny) = config.shape();
        let dt = config.dt;

        Zip::from(fields.ez.slice_mut(s![1..nx - 1, 1..ny - 1]))
            .and(mesh.epsilon().slice(s![1..nx - 1, 1..ny - 1]))
            .and(mesh.n2().slice(s![1..nx - 1, 1..ny - 1]))
            .par_for_each(|e, &epsilon, &n2| {
                let intensity = *e * *e;
                *e *= dt / (epsilon + n2 * intensity);
            });
    }

    /// Second-harmonic generation over the whole grid:
    /// $E_z \mathrel{+}= \gamma E_z^2 \Delta t$. A no-op wherever γ is zero.
    fn apply_shg(&self, config: &Config, mesh: &MeshSet, fields: &mut FieldSet) {
        let dt = config.dt;

        Zip::from(&mut fields.ez)
            .and(mesh.gamma())
            .par_for_each(|e, &gamma| *e += gamma * *e * *e * dt);
    }

    /// PML absorption of $E_z$:
    /// $E_z \mathrel{*}= \mathrm{clamp}(1 - (\sigma_x + \sigma_y) \Delta t / 2\epsilon,\ 0,\ 1)$.
    ///
    /// The clamp is a safety net: a negative factor would flip the sign of
    /// the field and a factor above 1 would amplify it. Well-formed
    /// profiles stay inside the bounds.
    fn apply_absorption(&self, config: &Config, mesh: &MeshSet, fields: &mut FieldSet) {
        let dt = config.dt;

        Zip::from(&mut fields.ez)
            .and(mesh.sigma_x())
            .and(mesh.sigma_y())
            .and(mesh.epsilon())
            .par_for_each(|e, &sx, &sy, &epsilon| {
                let factor = 1.0 - (sx + sy) * dt / (2.0 * epsilon);
                *e *= factor.clamp(0.0, 1.0);
            });
    }

    /// Abort on the first non-finite value in any field array.
    fn check_finite(&self, config: &Config, fields: &FieldSet) -> Result<(), EngineError> {
        for (name, field) in [
            ("Ez", &fields.ez),
            ("Hx", &fields.hx),
            ("Hy", &fields.hy),
        ] {
            if let Some(((x, y), _)) = field.indexed_iter().find(|(_, v)| !v.is_finite()) {
                return Err(EngineError::NumericalInstability {
                    step: config.iteration(),
                    field: name,
                    x,
                    y,
                });
            }
        }
        Ok(())
    }
}
