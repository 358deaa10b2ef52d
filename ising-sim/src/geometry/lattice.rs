use serde::Serialize;

use super::offsets::{NEIGHBOR_OFFSETS, N_NEIGHBORS};
use crate::config::MAX_GRID_SIZE;
use crate::error::SimError;
use crate::spins::Spin;

/// Square `size x size` grid of spins with periodic boundaries and a
/// precomputed neighbor table.
///
/// Sites are indexed in row-major order: site `row * size + col`. The checked
/// accessors (`get`, `set`, `flip`) reject coordinates outside the grid; the
/// flat-index accessors used by the update engines are total because every
/// index they receive comes out of the neighbor table.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    /// Side length `N`.
    pub size: usize,
    /// Total number of sites (`N * N`).
    pub n_spins: usize,
    spins: Vec<Spin>,
    /// Layout: `neighbors[i * N_NEIGHBORS + d]` is the neighbor of site `i` in
    /// direction `d` of [`NEIGHBOR_OFFSETS`].
    neighbors: Vec<u32>,
}

impl Lattice {
    /// Build a lattice, asking `fill(row, col)` for the initial spin of every site.
    pub fn new(size: usize, mut fill: impl FnMut(usize, usize) -> Spin) -> Result<Self, SimError> {
        if size == 0 || size > MAX_GRID_SIZE {
            return Err(SimError::InvalidSize { size });
        }
        let n_spins = size * size;

        let mut spins = Vec::with_capacity(n_spins);
        for row in 0..size {
            for col in 0..size {
                spins.push(fill(row, col));
            }
        }

        let mut neighbors = vec![0u32; n_spins * N_NEIGHBORS];
        for i in 0..n_spins {
            let (row, col) = (i / size, i % size);
            for (d, &(dr, dc)) in NEIGHBOR_OFFSETS.iter().enumerate() {
                let r = (row as isize + dr).rem_euclid(size as isize) as usize;
                let c = (col as isize + dc).rem_euclid(size as isize) as usize;
                neighbors[i * N_NEIGHBORS + d] = (r * size + c) as u32;
            }
        }

        Ok(Self {
            size,
            n_spins,
            spins,
            neighbors,
        })
    }

    pub fn uniform(size: usize, spin: Spin) -> Result<Self, SimError> {
        Self::new(size, |_, _| spin)
    }

    /// Alternating spins, `Up` on sites where `row + col` is even.
    pub fn checkerboard(size: usize) -> Result<Self, SimError> {
        Self::new(size, |row, col| {
            if (row + col) % 2 == 0 {
                Spin::Up
            } else {
                Spin::Down
            }
        })
    }

    /// Flat index of `(row, col)`, or a bounds error.
    pub fn site(&self, row: usize, col: usize) -> Result<usize, SimError> {
        if row >= self.size || col >= self.size {
            return Err(SimError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        Ok(row * self.size + col)
    }

    #[inline]
    pub fn coords(&self, site: usize) -> (usize, usize) {
        (site / self.size, site % self.size)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Spin, SimError> {
        Ok(self.spins[self.site(row, col)?])
    }

    pub fn set(&mut self, row: usize, col: usize, spin: Spin) -> Result<(), SimError> {
        let i = self.site(row, col)?;
        self.spins[i] = spin;
        Ok(())
    }

    /// Toggle `Up <-> Down` at `(row, col)`.
    pub fn flip(&mut self, row: usize, col: usize) -> Result<(), SimError> {
        let i = self.site(row, col)?;
        self.flip_site(i);
        Ok(())
    }

    #[inline]
    pub fn spin(&self, site: usize) -> Spin {
        self.spins[site]
    }

    #[inline]
    pub fn value(&self, site: usize) -> i8 {
        self.spins[site].value()
    }

    #[inline]
    pub fn flip_site(&mut self, site: usize) {
        self.spins[site] = self.spins[site].flipped();
    }

    /// Neighbor of `site` in direction `dir` (see [`NEIGHBOR_OFFSETS`]).
    #[inline]
    pub fn neighbor(&self, site: usize, dir: usize) -> usize {
        self.neighbors[site * N_NEIGHBORS + dir] as usize
    }

    /// The four neighbors of `(row, col)` in fixed order right, down, left, up.
    /// Input coordinates are wrapped modulo `N`.
    pub fn neighbors(&self, row: usize, col: usize) -> [(usize, usize); N_NEIGHBORS] {
        let site = (row % self.size) * self.size + col % self.size;
        let mut out = [(0, 0); N_NEIGHBORS];
        for (d, slot) in out.iter_mut().enumerate() {
            *slot = self.coords(self.neighbor(site, d));
        }
        out
    }

    /// Site reached from `site` by `(drow, dcol)` with wraparound.
    #[inline]
    pub fn offset(&self, site: usize, drow: usize, dcol: usize) -> usize {
        let (row, col) = self.coords(site);
        ((row + drow) % self.size) * self.size + (col + dcol) % self.size
    }

    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    /// Overwrite every site with `fill(row, col)`.
    pub fn refill(&mut self, mut fill: impl FnMut(usize, usize) -> Spin) {
        let size = self.size;
        for (i, s) in self.spins.iter_mut().enumerate() {
            *s = fill(i / size, i % size);
        }
    }

    /// Deep copy of the current spin configuration.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.size,
            spins: self.spins.clone(),
        }
    }

    /// Restore a configuration captured by [`Lattice::snapshot`].
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SimError> {
        if snapshot.size != self.size {
            return Err(SimError::InvalidSize {
                size: snapshot.size,
            });
        }
        self.spins.copy_from_slice(&snapshot.spins);
        Ok(())
    }
}

/// Immutable copy of a lattice's spins, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    size: usize,
    spins: Vec<Spin>,
}

impl Snapshot {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Spin> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.spins[row * self.size + col])
    }

    /// Spins as nested rows, `rows()[row][col]`.
    pub fn rows(&self) -> Vec<Vec<Spin>> {
        self.spins.chunks(self.size).map(|r| r.to_vec()).collect()
    }
}
