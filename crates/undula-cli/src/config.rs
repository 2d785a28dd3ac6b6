//! TOML job-file deserialisation.

use serde::Deserialize;
use undula_core::pml::PmlLayer;

/// Top-level job description.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub grid: GridConfig,
    #[serde(default)]
    pub medium: MediumConfig,
    /// Absorbing boundary; omit for a reflecting box.
    pub pml: Option<PmlLayer>,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    /// Worker threads; defaults to all available cores.
    pub threads: Option<usize>,
}

/// Grid discretisation from TOML.
#[derive(Debug, Deserialize)]
pub struct GridConfig {
    /// Target spatial resolution (m per cell).
    pub resolution: f64,
    /// Domain extent along x (m).
    pub size_x: f64,
    /// Domain extent along y (m).
    pub size_y: f64,
    /// Number of time steps.
    #[serde(default = "default_n_steps")]
    pub n_steps: usize,
}

fn default_n_steps() -> usize {
    200
}

/// Homogeneous background medium.
#[derive(Debug, Deserialize)]
pub struct MediumConfig {
    /// Relative permittivity of the background.
    #[serde(default = "default_unity")]
    pub epsilon_r: f64,
    /// Relative permeability of the background.
    #[serde(default = "default_unity")]
    pub mu_r: f64,
}

fn default_unity() -> f64 {
    1.0
}

impl Default for MediumConfig {
    fn default() -> Self {
        Self {
            epsilon_r: 1.0,
            mu_r: 1.0,
        }
    }
}

/// One source entry; the `kind` key selects the variant.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    MultiWavelength {
        /// Angular frequencies (rad/s).
        omega: Vec<f64>,
        /// Per-component amplitudes (V/m).
        amplitude: Vec<f64>,
        /// Per-component phase delays (rad).
        #[serde(default)]
        delay: Vec<f64>,
        /// Injection cells as `[i, j]` pairs.
        cells: Vec<[usize; 2]>,
    },
    Impulsion {
        /// Peak amplitude (V/m).
        amplitude: f64,
        /// Gaussian 1/e half-width (s).
        duration: f64,
        /// Pulse centre time (s).
        delay: f64,
        /// Injection cells as `[i, j]` pairs.
        cells: Vec<[usize; 2]>,
    },
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Probe cells whose Ez traces are written as CSV.
    #[serde(default)]
    pub detectors: Vec<[usize; 2]>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            detectors: Vec::new(),
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}

/// Load and parse a TOML job file.
pub fn load_job(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let job: JobConfig = toml::from_str(&content)?;
    Ok(job)
}
