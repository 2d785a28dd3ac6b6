//! Undula command-line interface.
//!
//! Run simulations from TOML job files:
//! ```sh
//! undula-cli run job.toml
//! undula-cli validate job.toml
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "undula-cli")]
#[command(about = "Undula: 2D TM-polarisation FDTD solver")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a TOML job file.
    Run {
        /// Path to the job file.
        config: PathBuf,
        /// Output directory (overrides the job file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a job file and its derived parameters without running.
    Validate {
        /// Path to the job file.
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            let job = config::load_job(&config)?;
            println!("Undula FDTD Solver");
            println!("==================");
            println!("Job: {}", config.display());

            let summary = runner::run_job(&job, output.as_deref())?;

            println!(
                "Completed {} steps on a {}x{} grid.",
                summary.steps, summary.nx, summary.ny
            );
            if let Some(path) = summary.detector_csv {
                println!("Detector traces written to {}", path.display());
            }
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_job(&config)?;
            runner::build_engine(&job)?;
            println!("Job file is valid: {}", config.display());
            Ok(())
        }
    }
}
