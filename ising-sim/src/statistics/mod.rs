pub mod autocorrelation;
pub mod history;
pub mod observables;
mod stats;

pub use autocorrelation::{sokal_tau, AutocorrAccum};
pub use history::HistoryBuffer;
pub use observables::{
    magnetization, nearest_neighbor_correlation, pair_correlation, pair_correlation_series,
    power_spectrum, structure_factor, temporal_correlation, PairCorrelation,
};
pub use stats::Statistics;
