//! Job runner: ties together configuration, mesh, engine, and output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use ndarray::Array3;

use undula_compute::CpuBackend;
use undula_core::config::Config;
use undula_core::detector::PointDetector;
use undula_core::engine::Engine;
use undula_core::mesh::MeshSet;
use undula_core::physics::MU_0;
use undula_core::source::Source;

use crate::config::{JobConfig, SourceConfig};

/// What a finished run produced.
pub struct RunSummary {
    pub steps: usize,
    pub nx: usize,
    pub ny: usize,
    pub detector_csv: Option<PathBuf>,
}

/// Build a ready-to-run engine from a parsed job file.
pub fn build_engine(job: &JobConfig) -> Result<Engine> {
    let config = Config::from_resolution(
        job.grid.resolution,
        job.grid.size_x,
        job.grid.size_y,
        job.grid.n_steps,
    )
    .context("invalid grid section")?;
    let (nx, ny) = config.shape();
    info!(
        "grid: {nx}x{ny} cells, dx = {:.3e} m, dt = {:.3e} s, {} steps",
        config.dx,
        config.dt,
        config.n_steps()
    );

    let mut mesh = MeshSet::uniform(&config, job.medium.epsilon_r, job.medium.mu_r * MU_0)
        .context("invalid medium section")?;
    if let Some(layer) = &job.pml {
        info!(
            "pml: {} cells, sigma_max = {:.3e} S/m, order {}",
            layer.width, layer.sigma_max, layer.order
        );
        mesh = mesh.with_pml(&config, layer).context("invalid pml section")?;
    }

    let mut engine = Engine::new(config, mesh)?;
    for (index, source) in job.sources.iter().enumerate() {
        engine.add_source(
            build_source(source).with_context(|| format!("invalid source {index}"))?,
        );
    }
    Ok(engine)
}

fn build_source(entry: &SourceConfig) -> Result<Source> {
    let source = match entry {
        SourceConfig::MultiWavelength {
            omega,
            amplitude,
            delay,
            cells,
        } => {
            let delay = if delay.is_empty() {
                vec![0.0; omega.len()]
            } else {
                delay.clone()
            };
            Source::multi_wavelength(omega.clone(), amplitude.clone(), delay, cells.clone())?
        }
        SourceConfig::Impulsion {
            amplitude,
            duration,
            delay,
            cells,
        } => Source::impulsion(*amplitude, *duration, *delay, cells.clone())?,
    };
    Ok(source)
}

/// Execute a job and write its detector traces.
pub fn run_job(job: &JobConfig, output_override: Option<&Path>) -> Result<RunSummary> {
    let mut engine = build_engine(job)?;
    let (nx, ny) = engine.config().shape();
    let n_steps = engine.config().n_steps();

    let recording_bytes = n_steps * nx * ny * std::mem::size_of::<f64>();
    info!(
        "allocating {} MiB for the Ez recording",
        recording_bytes / (1024 * 1024)
    );
    let mut ez_time = Array3::zeros((n_steps, nx, ny));

    let backend = match job.threads {
        Some(threads) => CpuBackend::with_threads(threads),
        None => CpuBackend::new(),
    };
    info!("backend: {}", backend.device_info().name);
    let pool = backend.build_pool()?;

    let steps = pool.install(|| engine.run(&mut ez_time))?;
    info!("run complete: {steps} steps recorded");

    let detector_csv = if job.output.detectors.is_empty() {
        None
    } else {
        let out_dir = output_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&job.output.directory));
        let path = out_dir.join("detectors.csv");
        write_detector_csv(
            &ez_time,
            engine.config().time_stamps(),
            &job.output.detectors,
            &path,
        )?;
        Some(path)
    };

    Ok(RunSummary {
        steps,
        nx,
        ny,
        detector_csv,
    })
}

/// Write one column of recorded Ez per detector, one row per time stamp.
fn write_detector_csv(
    ez_time: &Array3<f64>,
    time_stamps: &[f64],
    detectors: &[[usize; 2]],
    path: &Path,
) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;

    let mut traces = Vec::with_capacity(detectors.len());
    for &[i, j] in detectors {
        traces.push(PointDetector::new(i, j).time_series(ez_time.view())?);
    }

    write!(file, "time_s")?;
    for &[i, j] in detectors {
        write!(file, ",ez_{i}_{j}")?;
    }
    writeln!(file)?;

    for (k, &t) in time_stamps.iter().enumerate() {
        write!(file, "{t:.9e}")?;
        for trace in &traces {
            write!(file, ",{:.9e}", trace[k])?;
        }
        writeln!(file)?;
    }
    Ok(())
}
