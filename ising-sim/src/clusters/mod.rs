mod utils;
pub mod wolff;

pub use wolff::{bond_probability, wolff_step, Cluster};
