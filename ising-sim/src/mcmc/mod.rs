pub mod sweep;

pub use sweep::{metropolis_step, metropolis_trials};
