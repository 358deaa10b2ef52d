//! Read-only observables over a lattice and its history.
//!
//! Every function here is a pure function of its arguments.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::history::HistoryBuffer;
use crate::geometry::{Lattice, DOWN, RIGHT};

/// Diagonal spin-spin correlation at one distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairCorrelation {
    pub distance: usize,
    pub correlation: f64,
}

/// Mean spin, in `[-1, 1]`.
pub fn magnetization(lattice: &Lattice) -> f64 {
    let sum: i64 = lattice.spins().iter().map(|s| s.value() as i64).sum();
    sum as f64 / lattice.n_spins as f64
}

/// Mean of `s_i s_j` over the right and down neighbor of every site.
pub fn nearest_neighbor_correlation(lattice: &Lattice) -> f64 {
    let mut sum = 0i64;
    for i in 0..lattice.n_spins {
        let si = lattice.value(i) as i64;
        sum += si * lattice.value(lattice.neighbor(i, DOWN)) as i64;
        sum += si * lattice.value(lattice.neighbor(i, RIGHT)) as i64;
    }
    sum as f64 / (2 * lattice.n_spins) as f64
}

/// Mean of `s(i, j) s(i + d, j + d)` over all sites, offsets wrapped.
///
/// The offset is diagonal, not the radial average used for isotropic `C(r)`.
pub fn pair_correlation(lattice: &Lattice, distance: usize) -> f64 {
    let d = distance % lattice.size;
    let mut sum = 0i64;
    for i in 0..lattice.n_spins {
        let j = lattice.offset(i, d, d);
        sum += lattice.value(i) as i64 * lattice.value(j) as i64;
    }
    sum as f64 / lattice.n_spins as f64
}

/// [`pair_correlation`] for every distance in `1..=N/2`.
pub fn pair_correlation_series(lattice: &Lattice) -> Vec<PairCorrelation> {
    (1..=lattice.size / 2)
        .map(|distance| PairCorrelation {
            distance,
            correlation: pair_correlation(lattice, distance),
        })
        .collect()
}

/// Overlap between the current lattice and the snapshot `lag` pushes back
/// from the newest history entry.
///
/// Returns 0 when the history holds `lag` or fewer snapshots.
pub fn temporal_correlation(lattice: &Lattice, history: &HistoryBuffer, lag: usize) -> f64 {
    let Some(past) = history.latest(lag) else {
        return 0.0;
    };
    let sum: i64 = lattice
        .spins()
        .iter()
        .zip(past.spins())
        .map(|(a, b)| a.value() as i64 * b.value() as i64)
        .sum();
    sum as f64 / lattice.n_spins as f64
}

/// Per-residue `(cos, sin)` of `theta = -2 pi k / N`.
fn phase_table(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|k| {
            let theta = -2.0 * PI * k as f64 / n as f64;
            (theta.cos(), theta.sin())
        })
        .collect()
}

/// `S[qx][qy] = |sum_xy s(x, y) (cos theta - sin theta)|`,
/// `theta = -2 pi (qx x + qy y) / N`.
///
/// This is not the textbook structure factor `|sum s e^{-i theta}|^2 / N^2`:
/// the real and imaginary parts are subtracted instead of combined in
/// quadrature. Kept for compatibility with exported data; see
/// [`power_spectrum`] for the standard definition.
pub fn structure_factor(lattice: &Lattice) -> Vec<Vec<f64>> {
    let n = lattice.size;
    let phases = phase_table(n);
    let mut out = vec![vec![0.0f64; n]; n];
    for (qx, row) in out.iter_mut().enumerate() {
        for (qy, slot) in row.iter_mut().enumerate() {
            let mut sum = 0.0f64;
            for i in 0..lattice.n_spins {
                let (x, y) = lattice.coords(i);
                let (cos, sin) = phases[(qx * x + qy * y) % n];
                let s = lattice.value(i) as f64;
                sum += s * cos - s * sin;
            }
            *slot = sum.abs();
        }
    }
    out
}

/// Standard static structure factor `|sum_xy s(x, y) e^{-i theta}|^2 / N^2`.
pub fn power_spectrum(lattice: &Lattice) -> Vec<Vec<f64>> {
    let n = lattice.size;
    let phases = phase_table(n);
    let norm = lattice.n_spins as f64;
    let mut out = vec![vec![0.0f64; n]; n];
    for (qx, row) in out.iter_mut().enumerate() {
        for (qy, slot) in row.iter_mut().enumerate() {
            let (mut re, mut im) = (0.0f64, 0.0f64);
            for i in 0..lattice.n_spins {
                let (x, y) = lattice.coords(i);
                let (cos, sin) = phases[(qx * x + qy * y) % n];
                let s = lattice.value(i) as f64;
                re += s * cos;
                im += s * sin;
            }
            *slot = (re * re + im * im) / norm;
        }
    }
    out
}
