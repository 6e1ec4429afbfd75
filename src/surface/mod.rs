pub mod superformula;

pub use superformula::{radius, SuperformulaParams, SuperformulaShape, SuperformulaSurface};
