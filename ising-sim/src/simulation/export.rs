use serde::Serialize;

use crate::config::{SimulationParameters, DEFAULT_TEMPORAL_LAG};
use crate::geometry::Lattice;
use crate::spins::{energy, Spin};
use crate::statistics::{self, HistoryBuffer, PairCorrelation};

/// Every observable of the current configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Observables {
    pub magnetization: f64,
    /// Energy density, see [`energy::energy_density`].
    pub energy: f64,
    /// Nearest-neighbor correlation.
    pub correlation: f64,
    /// Diagonal pair correlation at distance 1, reported as 0 until the
    /// history holds at least two snapshots.
    pub two_point_correlation: f64,
    pub pair_correlation: Vec<PairCorrelation>,
    /// Temporal correlation at lag [`DEFAULT_TEMPORAL_LAG`].
    pub temporal_correlation: f64,
    pub structure_factor: Vec<Vec<f64>>,
}

fn two_point_correlation(lattice: &Lattice, history: &HistoryBuffer) -> f64 {
    if history.len() <= 1 {
        return 0.0;
    }
    statistics::pair_correlation(lattice, 1)
}

impl Observables {
    pub fn measure(
        lattice: &Lattice,
        history: &HistoryBuffer,
        params: &SimulationParameters,
    ) -> Self {
        Self {
            magnetization: statistics::magnetization(lattice),
            energy: energy::energy_density(lattice, params.coupling, params.field),
            correlation: statistics::nearest_neighbor_correlation(lattice),
            two_point_correlation: two_point_correlation(lattice, history),
            pair_correlation: statistics::pair_correlation_series(lattice),
            temporal_correlation: statistics::temporal_correlation(
                lattice,
                history,
                DEFAULT_TEMPORAL_LAG,
            ),
            structure_factor: statistics::structure_factor(lattice),
        }
    }
}

/// One-shot dump of spins, parameters and observables.
///
/// Field names follow the JSON layout existing consumers read: observables
/// appear at the top level and again under `simulationResults`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub spins: Vec<Vec<Spin>>,
    pub temperature: f64,
    pub magnetic_field: f64,
    pub interaction_strength: f64,
    #[serde(flatten)]
    pub observables: Observables,
    pub simulation_results: Observables,
}

impl ExportRecord {
    pub fn new(lattice: &Lattice, history: &HistoryBuffer, params: &SimulationParameters) -> Self {
        let observables = Observables::measure(lattice, history, params);
        Self {
            spins: lattice.snapshot().rows(),
            temperature: params.temperature,
            magnetic_field: params.field,
            interaction_strength: params.coupling,
            simulation_results: observables.clone(),
            observables,
        }
    }
}
