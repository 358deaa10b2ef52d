use rand::Rng;

use crate::config::{SimulationParameters, METROPOLIS_TRIALS_PER_STEP};
use crate::geometry::Lattice;
use crate::spins::energy::flip_energy;

/// Metropolis acceptance for an energy change `eng_change`.
///
/// Downhill moves are always taken. Otherwise accept with probability
/// `exp(-dE * beta)`; with `beta = None` (zero temperature) only strictly
/// downhill moves pass. The RNG is only consulted for uphill moves.
#[inline]
fn accept<R: Rng + ?Sized>(eng_change: f64, beta: Option<f64>, rng: &mut R) -> bool {
    if eng_change < 0.0 {
        return true;
    }
    match beta {
        Some(beta) => rng.gen::<f64>() < (-eng_change * beta).exp(),
        None => false,
    }
}

/// Run `n_trials` independent single-site Metropolis trials on random sites.
///
/// Returns the number of accepted flips.
#[cfg_attr(feature = "profile", inline(never))]
pub fn metropolis_trials<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    params: &SimulationParameters,
    n_trials: usize,
    rng: &mut R,
) -> usize {
    let n = lattice.size;
    let beta = params.beta();
    let mut accepted = 0;
    for _ in 0..n_trials {
        let row = rng.gen_range(0..n);
        let col = rng.gen_range(0..n);
        let site = row * n + col;
        let eng_change = flip_energy(lattice, site, params.coupling, params.field);
        if accept(eng_change, beta, rng) {
            lattice.flip_site(site);
            accepted += 1;
        }
    }
    accepted
}

/// One Metropolis step: [`METROPOLIS_TRIALS_PER_STEP`] trials.
pub fn metropolis_step<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    params: &SimulationParameters,
    rng: &mut R,
) -> usize {
    metropolis_trials(lattice, params, METROPOLIS_TRIALS_PER_STEP, rng)
}
