use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flapwing::{RunConfig, SimulationConfig, Simulator, VehicleConfig};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Dragonfly,
    Stationary,
}

/// Vortex-lattice simulation of four flapping wings
#[derive(Parser)]
#[command(name = "flapwing")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Unsteady vortex-lattice simulation of tandem flapping wings", long_about = None)]
struct Cli {
    /// TOML run configuration; overrides --preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in vehicle when no configuration file is given
    #[arg(short, long, value_enum, default_value = "dragonfly")]
    preset: Preset,

    /// Number of time steps
    #[arg(short = 'n', long)]
    steps: Option<usize>,

    /// Non-dimensional time step
    #[arg(long)]
    dt: Option<f64>,

    /// Output directory for CSV results
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Evaluate everything on the calling thread
    #[arg(long)]
    serial: bool,
}

fn load_config(cli: &Cli) -> Result<RunConfig> {
    let mut run = match &cli.config {
        Some(path) => RunConfig::load(path).with_context(|| format!("reading {}", path.display()))?,
        None => RunConfig {
            simulation: SimulationConfig::default(),
            vehicle: match cli.preset {
                Preset::Dragonfly => VehicleConfig::dragonfly(),
                Preset::Stationary => VehicleConfig::stationary(),
            },
        },
    };
    if let Some(steps) = cli.steps {
        run.simulation.nstep = steps;
    }
    if let Some(dt) = cli.dt {
        run.simulation.dt = dt;
    }
    if cli.serial {
        run.simulation.parallel = false;
    }
    run.validate().context("invalid configuration")?;
    Ok(run)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let run = load_config(&cli)?;
    if let Some(path) = &cli.dump_config {
        run.save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "configuration written");
        return Ok(());
    }

    let mut simulator =
        Simulator::new(&run.vehicle, run.simulation.clone()).context("invalid configuration")?;

    let start = Instant::now();
    simulator.run().context("time march aborted")?;
    info!(elapsed_s = start.elapsed().as_secs_f64(), "time march finished");

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    simulator.export_circulation(cli.output.join("circulation.csv"))?;
    simulator.export_impulses(cli.output.join("impulses.csv"))?;
    Ok(())
}
