pub mod export;
pub mod state;

pub use export::{ExportRecord, Observables};
pub use state::{SimulationState, StepOutcome};

use std::sync::atomic::{AtomicBool, Ordering};

use log::info;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use validator::Validate;

use crate::config::{RunConfig, ScanConfig, SimulationParameters};
use crate::error::SimError;
use crate::statistics::{sokal_tau, AutocorrAccum, Statistics};

/// Averages over the recorded (post-warmup) steps of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub temperature: f64,
    pub n_recorded: usize,
    /// ⟨m⟩
    pub mags: f64,
    /// ⟨|m|⟩
    pub abs_mags: f64,
    /// ⟨m²⟩
    pub mags2: f64,
    /// ⟨m⁴⟩
    pub mags4: f64,
    /// ⟨e⟩, energy density
    pub energies: f64,
    /// ⟨e²⟩
    pub energies2: f64,
    /// Mean number of sites flipped per step.
    pub mean_flipped: f64,
    /// `N² (⟨e²⟩ − ⟨e⟩²) / T_eff²`; `None` at zero temperature.
    pub specific_heat: Option<f64>,
    /// `N² (⟨m²⟩ − ⟨|m|⟩²) / T_eff`; `None` at zero temperature.
    pub susceptibility: Option<f64>,
    /// `1 − ⟨m⁴⟩ / (3 ⟨m²⟩²)`; `None` when ⟨m²⟩ = 0.
    pub binder_cumulant: Option<f64>,
    /// Normalized autocorrelation Γ(δ) of m. Empty unless requested.
    pub mags_autocorrelation: Vec<f64>,
    /// Sokal integrated autocorrelation time of m.
    pub mags_tau: Option<f64>,
    /// Temporal correlation at `RunConfig::temporal_lag` after the last step.
    pub temporal_correlation: f64,
}

fn derived_quantities(
    params: &SimulationParameters,
    n_spins: usize,
    mags2: f64,
    abs_mags: f64,
    mags4: f64,
    energies: f64,
    energies2: f64,
) -> (Option<f64>, Option<f64>, Option<f64>) {
    let n = n_spins as f64;
    let t_eff = params.beta().map(|b| 1.0 / b);
    let specific_heat = t_eff.map(|t| n * (energies2 - energies * energies) / (t * t));
    let susceptibility = t_eff.map(|t| n * (mags2 - abs_mags * abs_mags) / t);
    let binder = if mags2 > 0.0 {
        Some(1.0 - mags4 / (3.0 * mags2 * mags2))
    } else {
        None
    };
    (specific_heat, susceptibility, binder)
}

/// Step `state` `config.n_steps` times with the current parameters.
///
/// Each step is a full [`SimulationState::advance`]. After `warmup_steps`,
/// magnetization and energy moments are recorded. `on_step` is called once
/// per step (useful for progress bars); `interrupted` is polled before every
/// step.
pub fn run_steps<R: Rng>(
    state: &mut SimulationState<R>,
    config: &RunConfig,
    interrupted: &AtomicBool,
    on_step: &(dyn Fn() + Sync),
) -> Result<RunSummary, SimError> {
    config.validate()?;

    let params = *state.params();
    let n_spins = state.lattice().n_spins;
    info!(
        "run: {} steps ({} warmup) of {} at T={} J={} h={} on {}x{}",
        config.n_steps,
        config.warmup_steps,
        config.algorithm,
        params.temperature,
        params.coupling,
        params.field,
        state.lattice().size,
        state.lattice().size,
    );

    let mut mags_stat = Statistics::new(1);
    let mut abs_mags_stat = Statistics::new(1);
    let mut mags2_stat = Statistics::new(2);
    let mut mags4_stat = Statistics::new(4);
    let mut energies_stat = Statistics::new(1);
    let mut energies2_stat = Statistics::new(2);
    let mut flipped_stat = Statistics::new(1);

    let n_measurement_steps = config.n_steps - config.warmup_steps;
    let ac_max_lag = config
        .autocorrelation_max_lag
        .map(|k| k.min(n_measurement_steps / 4).max(1));
    let mut m_accum = ac_max_lag.map(AutocorrAccum::new);

    for step_id in 0..config.n_steps {
        if interrupted.load(Ordering::Relaxed) {
            return Err(SimError::Interrupted);
        }
        on_step();

        let outcome = state.advance(config.algorithm);

        if step_id < config.warmup_steps {
            continue;
        }
        let m = state.magnetization();
        let e = state.energy_density();
        mags_stat.update(m);
        abs_mags_stat.update(m.abs());
        mags2_stat.update(m);
        mags4_stat.update(m);
        energies_stat.update(e);
        energies2_stat.update(e);
        flipped_stat.update(outcome.flipped() as f64);
        if let Some(ref mut acc) = m_accum {
            acc.push(m);
        }
    }

    let (specific_heat, susceptibility, binder_cumulant) = derived_quantities(
        &params,
        n_spins,
        mags2_stat.average(),
        abs_mags_stat.average(),
        mags4_stat.average(),
        energies_stat.average(),
        energies2_stat.average(),
    );
    let mags_autocorrelation = m_accum.as_ref().map(|acc| acc.finish()).unwrap_or_default();
    let mags_tau = m_accum.as_ref().map(|_| sokal_tau(&mags_autocorrelation));

    let summary = RunSummary {
        temperature: params.temperature,
        n_recorded: mags_stat.count,
        mags: mags_stat.average(),
        abs_mags: abs_mags_stat.average(),
        mags2: mags2_stat.average(),
        mags4: mags4_stat.average(),
        energies: energies_stat.average(),
        energies2: energies2_stat.average(),
        mean_flipped: flipped_stat.average(),
        specific_heat,
        susceptibility,
        binder_cumulant,
        mags_autocorrelation,
        mags_tau,
        temporal_correlation: state.temporal_correlation(config.temporal_lag),
    };
    info!(
        "run done: T={} <|m|>={:.4} <e>={:.4}",
        summary.temperature, summary.abs_mags, summary.energies
    );
    Ok(summary)
}

/// Run one independent simulation per temperature in `config.temperatures`.
///
/// Point `k` gets its own state seeded with `base_seed + k`, so results do
/// not depend on scheduling. Points are dispatched over rayon unless
/// `config.sequential` is set or there is only one point. Each simulation is
/// itself single-threaded. Summaries come back in temperature order.
pub fn run_temperature_scan(
    config: &ScanConfig,
    interrupted: &AtomicBool,
    on_step: &(dyn Fn() + Sync),
) -> Result<Vec<RunSummary>, SimError> {
    config.validate()?;

    let mut states = config
        .temperatures
        .iter()
        .enumerate()
        .map(|(k, &temperature)| {
            let params = SimulationParameters {
                temperature,
                ..config.params
            };
            SimulationState::new(
                &config.lattice,
                params,
                config.fill,
                config.base_seed + k as u64,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let work = |state: &mut SimulationState| run_steps(state, &config.run, interrupted, on_step);

    let results: Vec<Result<RunSummary, SimError>> = if config.sequential || states.len() == 1 {
        states.iter_mut().map(work).collect()
    } else {
        states.par_iter_mut().map(work).collect()
    };

    results.into_iter().collect()
}
