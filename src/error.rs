//! Error types for mesh generation.
//!
//! Only strict validation and config parsing can fail; permissive generation
//! lets degenerate input flow through into the geometry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    /// A ring needs at least three sectors to enclose any area.
    #[error("sector count {0} is below the minimum of 3")]
    TooFewSectors(usize),

    /// The superformula divides by `n1`.
    #[error("superformula exponent n1 is zero for the {0} shape")]
    ZeroExponent(&'static str),

    /// Worst-case branch count exceeds the configured budget.
    #[error("up to {worst_case} segments could be generated, budget is {budget}")]
    SegmentBudgetExceeded { worst_case: u64, budget: u64 },

    /// The angular step must be a finite positive number or sampling never ends.
    #[error("angular step must be finite and positive, got {0}")]
    InvalidStep(f32),

    /// Index buffer is malformed or references missing vertices.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, GeometryError>;
