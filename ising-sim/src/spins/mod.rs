pub mod energy;
pub mod spin;

pub use spin::Spin;
