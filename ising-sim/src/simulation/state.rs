use log::warn;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use validator::Validate;

use super::export::{ExportRecord, Observables};
use crate::clusters::{wolff_step, Cluster};
use crate::config::{Algorithm, InitialFill, LatticeConfig, SimulationParameters};
use crate::error::SimError;
use crate::geometry::{Lattice, Snapshot};
use crate::mcmc::metropolis_step;
use crate::spins::{energy, Spin};
use crate::statistics::{self, HistoryBuffer, PairCorrelation};

/// What one [`SimulationState::step`] did to the lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Metropolis { accepted: usize },
    Wolff(Cluster),
}

impl StepOutcome {
    /// Number of sites flipped by the step.
    pub fn flipped(&self) -> usize {
        match self {
            Self::Metropolis { accepted } => *accepted,
            Self::Wolff(cluster) => cluster.len(),
        }
    }
}

#[inline]
fn random_spin<R: Rng + ?Sized>(rng: &mut R) -> Spin {
    if rng.gen::<f64>() < 0.5 {
        Spin::Down
    } else {
        Spin::Up
    }
}

fn fill_spin<R: Rng + ?Sized>(fill: InitialFill, row: usize, col: usize, rng: &mut R) -> Spin {
    match fill {
        InitialFill::Uniform(s) => s,
        InitialFill::Random => random_spin(rng),
        InitialFill::Checkerboard => {
            if (row + col) % 2 == 0 {
                Spin::Up
            } else {
                Spin::Down
            }
        }
    }
}

/// Everything one simulation owns: lattice, parameters, history and RNG.
///
/// The driver holds this value and calls [`step`](Self::step) once per tick.
/// Each step runs to completion (lattice update, then history push) before
/// the call returns, so every query afterwards sees a finished step.
pub struct SimulationState<R = Xoshiro256StarStar> {
    lattice: Lattice,
    params: SimulationParameters,
    history: HistoryBuffer,
    rng: R,
    steps_taken: u64,
}

impl SimulationState<Xoshiro256StarStar> {
    /// Build a state whose RNG is `Xoshiro256StarStar::seed_from_u64(seed)`.
    pub fn new(
        config: &LatticeConfig,
        params: SimulationParameters,
        fill: InitialFill,
        seed: u64,
    ) -> Result<Self, SimError> {
        Self::with_rng(
            config,
            params,
            fill,
            Xoshiro256StarStar::seed_from_u64(seed),
        )
    }
}

impl<R: Rng> SimulationState<R> {
    /// Build a state around any random source.
    pub fn with_rng(
        config: &LatticeConfig,
        params: SimulationParameters,
        fill: InitialFill,
        mut rng: R,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let lattice = Lattice::new(config.size, |r, c| fill_spin(fill, r, c, &mut rng))?;
        Self::from_lattice(lattice, params, config.history_capacity, rng)
    }

    /// Wrap an already-built lattice.
    pub fn from_lattice(
        lattice: Lattice,
        params: SimulationParameters,
        history_capacity: usize,
        rng: R,
    ) -> Result<Self, SimError> {
        params.validate()?;
        if history_capacity < 1 {
            return Err(SimError::InvalidConfig(
                "history_capacity must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            lattice,
            params,
            history: HistoryBuffer::new(history_capacity),
            rng,
            steps_taken: 0,
        })
    }

    /// Replace the parameters used by subsequent steps.
    pub fn set_parameters(&mut self, params: SimulationParameters) -> Result<(), SimError> {
        params.validate()?;
        if params != self.params {
            if params.beta().is_none() {
                warn!(
                    "temperature {} <= 0: using zero-temperature limit",
                    params.temperature
                );
            }
            if params.coupling <= 0.0 {
                warn!(
                    "coupling {} <= 0: Wolff bond probability clamped to 0",
                    params.coupling
                );
            }
            self.params = params;
        }
        Ok(())
    }

    /// Apply `params`, run one update with `algorithm`, then record a snapshot.
    pub fn step(
        &mut self,
        algorithm: Algorithm,
        params: &SimulationParameters,
    ) -> Result<StepOutcome, SimError> {
        self.set_parameters(*params)?;
        Ok(self.advance(algorithm))
    }

    /// One update with the current parameters.
    pub fn advance(&mut self, algorithm: Algorithm) -> StepOutcome {
        let outcome = match algorithm {
            Algorithm::Metropolis => StepOutcome::Metropolis {
                accepted: metropolis_step(&mut self.lattice, &self.params, &mut self.rng),
            },
            Algorithm::Wolff => {
                StepOutcome::Wolff(wolff_step(&mut self.lattice, &self.params, &mut self.rng))
            }
        };
        self.history.push(self.lattice.snapshot());
        self.steps_taken += 1;
        outcome
    }

    /// Flip one site directly, bypassing any algorithm. Not recorded in history.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<(), SimError> {
        self.lattice.flip(row, col)
    }

    /// Refill the lattice and forget the history.
    pub fn reset(&mut self, fill: InitialFill) {
        let rng = &mut self.rng;
        self.lattice.refill(|r, c| fill_spin(fill, r, c, rng));
        self.clear_history();
    }

    /// Like [`reset`](Self::reset), with `fill(row, col)` choosing every spin.
    pub fn reset_with(&mut self, fill: impl FnMut(usize, usize) -> Spin) {
        self.lattice.refill(fill);
        self.clear_history();
    }

    fn clear_history(&mut self) {
        self.history.clear();
        self.steps_taken = 0;
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lattice.snapshot()
    }

    pub fn magnetization(&self) -> f64 {
        statistics::magnetization(&self.lattice)
    }

    pub fn energy_density(&self) -> f64 {
        energy::energy_density(&self.lattice, self.params.coupling, self.params.field)
    }

    pub fn nearest_neighbor_correlation(&self) -> f64 {
        statistics::nearest_neighbor_correlation(&self.lattice)
    }

    pub fn pair_correlation(&self, distance: usize) -> f64 {
        statistics::pair_correlation(&self.lattice, distance)
    }

    pub fn pair_correlation_series(&self) -> Vec<PairCorrelation> {
        statistics::pair_correlation_series(&self.lattice)
    }

    pub fn temporal_correlation(&self, lag: usize) -> f64 {
        statistics::temporal_correlation(&self.lattice, &self.history, lag)
    }

    pub fn structure_factor(&self) -> Vec<Vec<f64>> {
        statistics::structure_factor(&self.lattice)
    }

    pub fn power_spectrum(&self) -> Vec<Vec<f64>> {
        statistics::power_spectrum(&self.lattice)
    }

    pub fn observables(&self) -> Observables {
        Observables::measure(&self.lattice, &self.history, &self.params)
    }

    /// Spins, parameters and every observable, ready for serialization.
    pub fn export_record(&self) -> ExportRecord {
        ExportRecord::new(&self.lattice, &self.history, &self.params)
    }
}
