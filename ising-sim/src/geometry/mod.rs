pub mod lattice;
pub mod offsets;

pub use lattice::{Lattice, Snapshot};
pub use offsets::{DOWN, NEIGHBOR_OFFSETS, N_NEIGHBORS, RIGHT};
