use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use ising_sim::config::{
    DEFAULT_COUPLING, DEFAULT_FIELD, DEFAULT_GRID_SIZE, DEFAULT_HISTORY_CAPACITY,
    DEFAULT_TEMPERATURE, DEFAULT_TEMPORAL_LAG,
};
use ising_sim::{
    run_steps, run_temperature_scan, Algorithm, InitialFill, LatticeConfig, RunConfig,
    ScanConfig, SimError, SimulationParameters, SimulationState, Spin,
};
use log::info;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "spinboard", about = "2D Ising lattice Monte Carlo driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and print its averages as JSON.
    Run(RunArgs),
    /// Run independent simulations over a list of temperatures.
    Scan(ScanArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FillArg {
    Up,
    Down,
    Random,
    Checkerboard,
}

impl From<FillArg> for InitialFill {
    fn from(fill: FillArg) -> Self {
        match fill {
            FillArg::Up => InitialFill::Uniform(Spin::Up),
            FillArg::Down => InitialFill::Uniform(Spin::Down),
            FillArg::Random => InitialFill::Random,
            FillArg::Checkerboard => InitialFill::Checkerboard,
        }
    }
}

fn parse_algorithm(s: &str) -> Result<Algorithm, SimError> {
    Algorithm::try_from(s)
}

/// Options shared by `run` and `scan`.
#[derive(ClapArgs, Debug)]
struct CommonArgs {
    /// Side length of the square lattice.
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    size: usize,
    /// Snapshots kept for temporal correlation.
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history: usize,
    /// Coupling constant J.
    #[arg(long, default_value_t = DEFAULT_COUPLING, allow_hyphen_values = true)]
    coupling: f64,
    /// External field h.
    #[arg(long, default_value_t = DEFAULT_FIELD, allow_hyphen_values = true)]
    field: f64,
    /// Update algorithm: metropolis or wolff.
    #[arg(long, default_value = "metropolis", value_parser = parse_algorithm)]
    algorithm: Algorithm,
    #[arg(long, default_value_t = 1000)]
    steps: usize,
    /// Steps discarded before averaging.
    #[arg(long, default_value_t = 250)]
    warmup: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = FillArg::Up)]
    fill: FillArg,
    /// Record the magnetization autocorrelation up to this lag.
    #[arg(long)]
    autocorrelation_lag: Option<usize>,
    /// Lag of the end-of-run temporal correlation.
    #[arg(long, default_value_t = DEFAULT_TEMPORAL_LAG)]
    temporal_lag: usize,
    /// Write results here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Hide the progress bar.
    #[arg(long)]
    quiet: bool,
}

impl CommonArgs {
    fn lattice_config(&self) -> LatticeConfig {
        LatticeConfig {
            size: self.size,
            history_capacity: self.history,
        }
    }

    fn run_config(&self) -> RunConfig {
        RunConfig {
            n_steps: self.steps,
            warmup_steps: self.warmup,
            algorithm: self.algorithm,
            autocorrelation_max_lag: self.autocorrelation_lag,
            temporal_lag: self.temporal_lag,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Temperature on the 0-100 control scale.
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE, allow_hyphen_values = true)]
    temperature: f64,
    /// Also dump the final spins and observables to this JSON file.
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct ScanArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Comma-separated temperatures, one independent run each.
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    temperatures: Vec<f64>,
    /// Run points one after another instead of on the thread pool.
    #[arg(long)]
    sequential: bool,
}

fn progress_bar(len: u64, quiet: bool) -> Result<ProgressBar, Box<dyn Error>> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )?
        .progress_chars("=> "),
    );
    pb.set_message("steps");
    Ok(pb)
}

fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match out {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
            info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, value)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let common = &args.common;
    let params = SimulationParameters::new(args.temperature, common.coupling, common.field);
    let mut state = SimulationState::new(
        &common.lattice_config(),
        params,
        common.fill.into(),
        common.seed,
    )?;

    let pb = progress_bar(common.steps as u64, common.quiet)?;
    let interrupted = AtomicBool::new(false);
    let summary = run_steps(&mut state, &common.run_config(), &interrupted, &|| {
        pb.inc(1)
    })?;
    pb.finish_and_clear();

    write_json(&summary, common.out.as_deref())?;
    if let Some(path) = &args.export {
        write_json(&state.export_record(), Some(path))?;
    }
    Ok(())
}

fn scan(args: &ScanArgs) -> Result<(), Box<dyn Error>> {
    let common = &args.common;
    let config = ScanConfig {
        lattice: common.lattice_config(),
        params: SimulationParameters::new(DEFAULT_TEMPERATURE, common.coupling, common.field),
        temperatures: args.temperatures.clone(),
        fill: common.fill.into(),
        run: common.run_config(),
        base_seed: common.seed,
        sequential: args.sequential,
    };

    let total = (common.steps * args.temperatures.len()) as u64;
    let pb = progress_bar(total, common.quiet)?;
    let interrupted = AtomicBool::new(false);
    let summaries = run_temperature_scan(&config, &interrupted, &|| pb.inc(1))?;
    pb.finish_and_clear();

    write_json(&summaries, common.out.as_deref())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match &cli.command {
        Command::Run(args) => run(args),
        Command::Scan(args) => scan(args),
    }
}
