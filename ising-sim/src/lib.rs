//! Square-lattice Ising model with periodic boundaries, Metropolis and Wolff
//! updates, a bounded snapshot history and live observables.

pub mod clusters;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use config::{
    Algorithm, InitialFill, LatticeConfig, RunConfig, ScanConfig, SimulationParameters,
};
pub use error::SimError;
pub use geometry::{Lattice, Snapshot};
pub use simulation::{
    run_steps, run_temperature_scan, ExportRecord, Observables, RunSummary, SimulationState,
    StepOutcome,
};
pub use spins::Spin;
pub use statistics::{HistoryBuffer, PairCorrelation};
