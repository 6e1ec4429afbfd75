pub mod settings;

pub use settings::{GenerationMode, GeneratorConfig, Validation};
