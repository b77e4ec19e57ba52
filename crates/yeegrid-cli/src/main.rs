//! yeegrid command-line interface.
//!
//! Prepare FDTD simulations from TOML job files:
//! ```sh
//! yeegrid prepare job.toml -o simulation.json
//! yeegrid check job.toml
//! yeegrid inspect simulation.json
//! yeegrid materials
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yeegrid")]
#[command(about = "yeegrid: automatic FDTD grid generation and validation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the grid, validate, and write the submission file.
    Prepare {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output file (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate and validate without writing anything.
    Check {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Decode a submission file and print its grid summary.
    Inspect {
        /// Path to an encoded simulation.
        file: PathBuf,
    },
    /// List the material presets.
    Materials,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare { config, output } => {
            println!("yeegrid prepare");
            println!("===============");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let validated = runner::prepare(&job)?;
            runner::print_summary(&validated);

            let out_path = output.unwrap_or_else(|| PathBuf::from(&job.output.path));
            runner::write_output(&validated, &out_path)?;
            Ok(())
        }
        Commands::Check { config } => {
            let job = config::load_config(&config)?;
            let validated = runner::prepare(&job)?;
            runner::print_summary(&validated);
            println!("Simulation is valid: {}", config.display());
            Ok(())
        }
        Commands::Inspect { file } => {
            let validated = runner::read_encoded(&file)?;
            let sim = validated.simulation();
            println!("Simulation: {}", file.display());
            println!(
                "  domain centre {:?}, size {:?} µm, run time {:.4e} s",
                sim.center(),
                sim.size(),
                sim.run_time()
            );
            runner::print_summary(&validated);
            Ok(())
        }
        Commands::Materials => {
            println!("Available material presets:");
            println!();
            for (name, description) in yeegrid_materials::library::PRESETS {
                println!("  {name:<8} {description}");
            }
            println!();
            println!("Inline materials use a tagged model, e.g.");
            println!("  {{ type = \"Medium\", permittivity = 2.25 }}");
            Ok(())
        }
    }
}
