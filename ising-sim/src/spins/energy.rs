use crate::geometry::{Lattice, N_NEIGHBORS};

/// Energy change from flipping `site`: `2 J s sum(s_nb) + 2 h s`.
///
/// For `H = -J sum<ij> s_i s_j - h sum_i s_i` this is `H(flipped) - H(current)`.
#[inline]
pub fn flip_energy(lattice: &Lattice, site: usize, coupling: f64, field: f64) -> f64 {
    let s = lattice.value(site) as f64;
    let mut nb_sum = 0i32;
    for d in 0..N_NEIGHBORS {
        nb_sum += lattice.value(lattice.neighbor(site, d)) as i32;
    }
    2.0 * coupling * s * nb_sum as f64 + 2.0 * field * s
}

/// [`flip_energy`] addressed by coordinate; `row` and `col` are wrapped modulo `N`.
pub fn local_field_energy(
    lattice: &Lattice,
    row: usize,
    col: usize,
    coupling: f64,
    field: f64,
) -> f64 {
    let n = lattice.size;
    flip_energy(lattice, (row % n) * n + col % n, coupling, field)
}

/// Total energy `sum_i flip_energy(i) / (-2)`.
///
/// Every bond is visited from both ends, so the coupling term is counted twice
/// relative to `H`. Kept as-is so exported energies stay comparable across
/// versions.
pub fn total_energy(lattice: &Lattice, coupling: f64, field: f64) -> f64 {
    let mut total = 0.0f64;
    for i in 0..lattice.n_spins {
        total += flip_energy(lattice, i, coupling, field);
    }
    total / -2.0
}

/// [`total_energy`] per site.
pub fn energy_density(lattice: &Lattice, coupling: f64, field: f64) -> f64 {
    total_energy(lattice, coupling, field) / lattice.n_spins as f64
}
