use thiserror::Error;

/// Errors surfaced by the simulation core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Side length outside `1..=MAX_GRID_SIZE`.
    #[error("lattice size must be in 1..=65535, got {size}")]
    InvalidSize { size: usize },
    /// A caller-supplied coordinate lies outside `[0, size)`.
    #[error("coordinate ({row}, {col}) is outside a {size}x{size} lattice")]
    OutOfBounds { row: usize, col: usize, size: usize },
    /// Parameter or run configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unknown algorithm '{0}', expected 'metropolis' or 'wolff'")]
    UnknownAlgorithm(String),
    #[error("interrupted")]
    Interrupted,
}

impl From<validator::ValidationErrors> for SimError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::InvalidConfig(format!("{e}"))
    }
}
