//! Integration tests: physical behaviour of the Yee scheme.
//!
//! These exercise the solver end to end on vacuum and PML meshes and check
//! the quantified invariants a correct leapfrog integrator must satisfy:
//! bounded energy below the Courant limit, linearity in the linear regime,
//! the symmetry of a point-driven field, and PML absorption.

use ndarray::Array3;
use undula_core::config::Config;
use undula_core::engine::Engine;
use undula_core::mesh::MeshSet;
use undula_core::physics::{courant_limit, light_speed, EPSILON_0, MU_0};
use undula_core::pml::PmlLayer;
use undula_core::source::Source;

fn vacuum_config(n: usize, n_steps: usize, courant_fraction: f64) -> Config {
    let c = light_speed(MU_0, EPSILON_0);
    let dx = 1e-7;
    let dt = courant_fraction * courant_limit(dx, dx, c);
    let time_stamps = (0..n_steps).map(|k| k as f64 * dt).collect();
    Config::new(dx, dx, dt, n, n, time_stamps).unwrap()
}

fn ez_l2(ez_time: &Array3<f64>, k: usize) -> f64 {
    ez_time
        .index_axis(ndarray::Axis(0), k)
        .iter()
        .map(|&v| v * v)
        .sum::<f64>()
        .sqrt()
}

/// With no losses, no sources, and dt below the Courant limit, the scheme
/// must not amplify a seeded field.
#[test]
fn test_seeded_field_energy_stays_bounded() {
    let n = 41;
    let n_steps = 150;
    let config = vacuum_config(n, n_steps, 0.95);
    let mesh = MeshSet::uniform(&config, 1.0, MU_0).unwrap();
    let mut engine = Engine::new(config, mesh).unwrap();

    // Smooth Gaussian bump in Ez, centred in the box.
    let centre = (n / 2) as f64;
    {
        let fields = engine.fields_mut();
        for i in 0..n {
            for j in 0..n {
                let r2 = (i as f64 - centre).powi(2) + (j as f64 - centre).powi(2);
                fields.ez[[i, j]] = (-r2 / 36.0).exp();
            }
        }
    }

    let mut ez_time = Array3::zeros((n_steps, n, n));
    engine.run(&mut ez_time).unwrap();

    let initial = ez_l2(&ez_time, 0);
    let mut max_norm = 0.0f64;
    for k in 0..n_steps {
        max_norm = max_norm.max(ez_l2(&ez_time, k));
    }
    eprintln!("L2(Ez): initial = {initial:.6e}, max over run = {max_norm:.6e}");

    assert!(
        max_norm <= 2.0 * initial,
        "L2 norm grew from {initial:.3e} to {max_norm:.3e}; the scheme is amplifying"
    );
    // The final combined field energy stays of the initial order: nothing
    // leaves a lossless closed box.
    let fields = engine.fields();
    let e_energy: f64 = fields.ez.iter().map(|&v| EPSILON_0 * v * v).sum();
    let h_energy: f64 = fields
        .hx
        .iter()
        .chain(fields.hy.iter())
        .map(|&v| MU_0 * v * v)
        .sum();
    let initial_energy = EPSILON_0 * initial * initial;
    let ratio = (e_energy + h_energy) / initial_energy;
    eprintln!("energy ratio final/initial = {ratio:.4}");
    assert!(
        ratio > 0.4 && ratio < 1.6,
        "energy ratio {ratio:.3} outside the staggered-sampling band"
    );
}

/// Vacuum point impulse: the pulse radiates away from the injection cell
/// and the field it leaves behind is small.
#[test]
fn test_vacuum_point_impulse_decays_at_source() {
    let n = 101;
    let n_steps = 200;
    let config = vacuum_config(n, n_steps, 0.95);
    let dt = config.dt;
    let mesh = MeshSet::uniform(&config, 1.0, MU_0).unwrap();
    let mut engine = Engine::new(config, mesh).unwrap();
    engine.add_source(Source::impulsion(1.0, 2.0 * dt, 5.0 * dt, vec![[50, 50]]).unwrap());

    let mut ez_time = Array3::zeros((n_steps, n, n));
    engine.run(&mut ez_time).unwrap();

    let peak = (0..n_steps)
        .map(|k| ez_time[[k, 50, 50]].abs())
        .fold(0.0f64, f64::max);
    let last = ez_time[[n_steps - 1, 50, 50]].abs();
    eprintln!("source cell: peak |Ez| = {peak:.4}, final |Ez| = {last:.3e}");

    assert!(peak > 0.5, "the impulse should drive the source cell near its amplitude");
    assert!(
        last < 0.05,
        "|Ez| = {last:.3e} at the source cell after 200 steps; expected the \
         pulse to have radiated away"
    );
}

/// The discrete stencil treats x and y identically for dx = dy, so a
/// centred point source produces a four-fold symmetric field.
#[test]
fn test_point_impulse_is_radially_symmetric() {
    let n = 61;
    let n_steps = 40;
    let config = vacuum_config(n, n_steps, 0.95);
    let dt = config.dt;
    let mesh = MeshSet::uniform(&config, 1.0, MU_0).unwrap();
    let mut engine = Engine::new(config, mesh).unwrap();
    engine.add_source(Source::impulsion(1.0, 2.0 * dt, 5.0 * dt, vec![[30, 30]]).unwrap());

    let mut ez_time = Array3::zeros((n_steps, n, n));
    engine.run(&mut ez_time).unwrap();

    for k in [15, 25, 39] {
        for d in [4, 9, 14] {
            let east = ez_time[[k, 30 + d, 30]];
            let west = ez_time[[k, 30 - d, 30]];
            let north = ez_time[[k, 30, 30 + d]];
            let south = ez_time[[k, 30, 30 - d]];
            let spread = [east, west, north, south]
                .iter()
                .fold(0.0f64, |acc, &v| acc.max((v - east).abs()));
            assert!(
                spread <= 1e-9 * east.abs().max(1e-12),
                "asymmetry {spread:.3e} at step {k}, offset {d} (east = {east:.3e})"
            );
        }
    }
}

/// Doubling (tripling) every source amplitude scales every recorded sample
/// by the same factor when the mesh is linear.
#[test]
fn test_linearity_of_the_linear_regime() {
    let n = 41;
    let n_steps = 60;

    let run = |amplitude: f64| -> Array3<f64> {
        let config = vacuum_config(n, n_steps, 0.95);
        let dt = config.dt;
        let mesh = MeshSet::uniform(&config, 1.0, MU_0).unwrap();
        let mut engine = Engine::new(config, mesh).unwrap();
        engine.add_source(
            Source::impulsion(amplitude, 2.0 * dt, 5.0 * dt, vec![[20, 20]]).unwrap(),
        );
        let mut ez_time = Array3::zeros((n_steps, n, n));
        engine.run(&mut ez_time).unwrap();
        ez_time
    };

    let base = run(1.0);
    let scaled = run(3.0);

    let mut checked = 0usize;
    for (b, s) in base.iter().zip(scaled.iter()) {
        if b.abs() > 1e-4 {
            let ratio = s / b;
            assert!(
                (ratio - 3.0).abs() < 1e-9,
                "ratio {ratio} deviates from 3 at a sample with |Ez| = {b:.3e}"
            );
            checked += 1;
        }
    }
    eprintln!("linearity checked on {checked} samples");
    assert!(checked > 1000, "too few samples above threshold: {checked}");
}

/// A PML box swallows an impulse: once the wavefront has entered the
/// bands, almost no energy returns to the interior.
#[test]
fn test_pml_box_absorbs_outgoing_pulse() {
    let n = 81;
    let n_steps = 280;
    let width = 12;
    let config = vacuum_config(n, n_steps, 0.95);
    let dt = config.dt;

    // sigma_max * dt / 2eps = 0.25 at the outermost cell.
    let sigma_max = 0.5 * EPSILON_0 / dt;
    let layer = PmlLayer {
        width,
        sigma_max,
        order: 3,
    };
    let mesh = MeshSet::uniform(&config, 1.0, MU_0)
        .unwrap()
        .with_pml(&config, &layer)
        .unwrap();

    let mut engine = Engine::new(config, mesh).unwrap();
    engine.add_source(Source::impulsion(1.0, 2.0 * dt, 5.0 * dt, vec![[40, 40]]).unwrap());

    let mut ez_time = Array3::zeros((n_steps, n, n));
    engine.run(&mut ez_time).unwrap();

    // Energy in the interior region enclosed by the bands.
    let interior_energy = |k: usize| -> f64 {
        let mut sum = 0.0;
        for i in width..n - width {
            for j in width..n - width {
                let v = ez_time[[k, i, j]];
                sum += v * v;
            }
        }
        sum
    };

    let peak = (0..n_steps).map(interior_energy).fold(0.0f64, f64::max);
    let last = interior_energy(n_steps - 1);
    eprintln!("interior energy: peak = {peak:.4e}, final = {last:.4e}");

    assert!(
        last < 0.05 * peak,
        "interior energy only fell to {:.2}% of its peak; the PML is not absorbing",
        100.0 * last / peak
    );
}
