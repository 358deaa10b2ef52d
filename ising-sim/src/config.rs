use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::SimError;
use crate::spins::Spin;

pub const DEFAULT_GRID_SIZE: usize = 10;
/// Largest side length whose `N * N` site indices fit the `u32` neighbor table.
pub const MAX_GRID_SIZE: usize = 65_535;
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub const DEFAULT_TEMPERATURE: f64 = 50.0;
pub const DEFAULT_COUPLING: f64 = 1.0;
pub const DEFAULT_FIELD: f64 = 0.0;
/// Elementary Metropolis trials performed by one step.
pub const METROPOLIS_TRIALS_PER_STEP: usize = 100;
/// UI temperature is divided by this before inversion: `beta = 1 / (T / 10)`.
pub const TEMPERATURE_SCALE: f64 = 10.0;
pub const DEFAULT_TEMPORAL_LAG: usize = 10;
/// Slider domain of the temperature control. Informational; not enforced.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Metropolis,
    Wolff,
}

impl TryFrom<&str> for Algorithm {
    type Error = SimError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "metropolis" => Ok(Self::Metropolis),
            "wolff" => Ok(Self::Wolff),
            _ => Err(SimError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Metropolis => write!(f, "metropolis"),
            Self::Wolff => write!(f, "wolff"),
        }
    }
}

fn validate_parameters(p: &SimulationParameters) -> Result<(), ValidationError> {
    if !p.temperature.is_finite() {
        return Err(ValidationError::new("temperature must be finite"));
    }
    if !p.coupling.is_finite() {
        return Err(ValidationError::new("coupling must be finite"));
    }
    if !p.field.is_finite() {
        return Err(ValidationError::new("field must be finite"));
    }
    Ok(())
}

/// Temperature, coupling `J` and external field `h`.
///
/// Read-only during a step. A non-positive temperature is legal and selects
/// the zero-temperature limit: [`SimulationParameters::beta`] is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_parameters"))]
pub struct SimulationParameters {
    pub temperature: f64,
    pub coupling: f64,
    pub field: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            coupling: DEFAULT_COUPLING,
            field: DEFAULT_FIELD,
        }
    }
}

impl SimulationParameters {
    pub fn new(temperature: f64, coupling: f64, field: f64) -> Self {
        Self {
            temperature,
            coupling,
            field,
        }
    }

    /// `T / 10`, the temperature the Boltzmann factors actually see.
    pub fn effective_temperature(&self) -> f64 {
        self.temperature / TEMPERATURE_SCALE
    }

    /// Inverse effective temperature, `None` for `T <= 0`.
    pub fn beta(&self) -> Option<f64> {
        if self.temperature > 0.0 {
            Some(1.0 / self.effective_temperature())
        } else {
            None
        }
    }
}

fn validate_lattice_config(cfg: &LatticeConfig) -> Result<(), ValidationError> {
    if cfg.size < 1 || cfg.size > MAX_GRID_SIZE {
        return Err(ValidationError::new("size must be in 1..=65535"));
    }
    if cfg.history_capacity < 1 {
        return Err(ValidationError::new("history_capacity must be >= 1"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_lattice_config"))]
pub struct LatticeConfig {
    /// Side length `N` of the square lattice.
    pub size: usize,
    /// Number of past snapshots kept for temporal correlation.
    pub history_capacity: usize,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

fn validate_run_config(cfg: &RunConfig) -> Result<(), ValidationError> {
    if cfg.n_steps < 1 {
        return Err(ValidationError::new("n_steps must be >= 1"));
    }
    if cfg.warmup_steps > cfg.n_steps {
        return Err(ValidationError::new("warmup_steps must be <= n_steps"));
    }
    if cfg.autocorrelation_max_lag == Some(0) {
        return Err(ValidationError::new("autocorrelation_max_lag must be >= 1"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_run_config"))]
pub struct RunConfig {
    pub n_steps: usize,
    /// Steps discarded before averages are recorded.
    pub warmup_steps: usize,
    pub algorithm: Algorithm,
    /// Enables streaming autocorrelation of the magnetization up to this lag.
    pub autocorrelation_max_lag: Option<usize>,
    /// Lag used for the end-of-run temporal correlation.
    pub temporal_lag: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_steps: 1000,
            warmup_steps: 250,
            algorithm: Algorithm::Metropolis,
            autocorrelation_max_lag: None,
            temporal_lag: DEFAULT_TEMPORAL_LAG,
        }
    }
}

/// Initial spin configuration of a fresh or reset lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialFill {
    Uniform(Spin),
    /// Independent 50/50 spins drawn from the simulation RNG.
    Random,
    Checkerboard,
}

impl Default for InitialFill {
    fn default() -> Self {
        Self::Uniform(Spin::Up)
    }
}

fn validate_scan_config(cfg: &ScanConfig) -> Result<(), ValidationError> {
    if cfg.temperatures.is_empty() {
        return Err(ValidationError::new("temperatures must not be empty"));
    }
    if cfg.temperatures.iter().any(|t| !t.is_finite()) {
        return Err(ValidationError::new("temperatures must be finite"));
    }
    Ok(())
}

/// Independent runs at several temperatures, sharing everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_scan_config"))]
pub struct ScanConfig {
    #[validate]
    pub lattice: LatticeConfig,
    /// Coupling and field for every point; its temperature is ignored.
    #[validate]
    pub params: SimulationParameters,
    pub temperatures: Vec<f64>,
    pub fill: InitialFill,
    #[validate]
    pub run: RunConfig,
    /// Point `k` is seeded with `base_seed + k`.
    pub base_seed: u64,
    /// Run points on the current thread instead of the rayon pool.
    pub sequential: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_parse() {
        assert_eq!(Algorithm::try_from("metropolis"), Ok(Algorithm::Metropolis));
        assert_eq!(Algorithm::try_from("wolff"), Ok(Algorithm::Wolff));
        assert_eq!(
            Algorithm::try_from("gibbs"),
            Err(SimError::UnknownAlgorithm("gibbs".to_string()))
        );
        assert_eq!(Algorithm::Wolff.to_string(), "wolff");
    }

    #[test]
    fn test_beta_uses_scaled_temperature() {
        let p = SimulationParameters::new(10.0, 1.0, 0.0);
        assert_eq!(p.beta(), Some(1.0));
        let p = SimulationParameters::new(50.0, 1.0, 0.0);
        assert!((p.beta().unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(SimulationParameters::new(0.0, 1.0, 0.0).beta(), None);
        assert_eq!(SimulationParameters::new(-3.0, 1.0, 0.0).beta(), None);
    }

    #[test]
    fn test_defaults() {
        let p = SimulationParameters::default();
        assert_eq!((p.temperature, p.coupling, p.field), (50.0, 1.0, 0.0));
        assert!(TEMPERATURE_RANGE.contains(&p.temperature));
        let c = LatticeConfig::default();
        assert_eq!((c.size, c.history_capacity), (10, 100));
    }

    #[test]
    fn test_validation() {
        assert!(SimulationParameters::default().validate().is_ok());
        assert!(SimulationParameters::new(0.0, -2.0, 1.0).validate().is_ok());
        assert!(SimulationParameters::new(f64::NAN, 1.0, 0.0).validate().is_err());
        assert!(SimulationParameters::new(1.0, f64::INFINITY, 0.0).validate().is_err());

        let bad = LatticeConfig {
            size: 0,
            history_capacity: 100,
        };
        assert!(bad.validate().is_err());
        let huge = LatticeConfig {
            size: MAX_GRID_SIZE + 1,
            history_capacity: 100,
        };
        assert!(huge.validate().is_err());
        let largest = LatticeConfig {
            size: MAX_GRID_SIZE,
            history_capacity: 100,
        };
        assert!(largest.validate().is_ok());

        let mut run = RunConfig::default();
        assert!(run.validate().is_ok());
        run.warmup_steps = run.n_steps + 1;
        assert!(run.validate().is_err());
        run.warmup_steps = 0;
        run.autocorrelation_max_lag = Some(0);
        assert!(run.validate().is_err());
    }

    #[test]
    fn test_scan_validation() {
        let mut scan = ScanConfig {
            lattice: LatticeConfig::default(),
            params: SimulationParameters::default(),
            temperatures: vec![10.0, 20.0],
            fill: InitialFill::Random,
            run: RunConfig::default(),
            base_seed: 42,
            sequential: true,
        };
        assert!(scan.validate().is_ok());

        scan.temperatures.clear();
        assert!(scan.validate().is_err());

        scan.temperatures = vec![10.0];
        scan.lattice.size = 0;
        assert!(scan.validate().is_err());

        scan.lattice.size = 4;
        scan.run.n_steps = 0;
        scan.run.warmup_steps = 0;
        assert!(scan.validate().is_err());
    }
}
