//! Entry point tying configuration to the individual mesh builders.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::{GenerationMode, GeneratorConfig, Validation};
use crate::error::Result;
use crate::growth::BranchGrowth;
use crate::mesh::{ColumnBuilder, Mesh};
use crate::surface::SuperformulaSurface;

/// Builds meshes on demand from the current configuration
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Replace the configuration used by the next `build`
    pub fn configure(&mut self, config: GeneratorConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build a fresh mesh. Trees use the configured seed, or a clock-derived
    /// one when none is set.
    pub fn build(&self) -> Result<Mesh> {
        let seed = self.config.seed.unwrap_or_else(default_seed);
        log::debug!("building {:?} with seed {}", self.config.mode, seed);
        let mut rng = Pcg32::seed_from_u64(seed);
        self.build_with_rng(&mut rng)
    }

    /// Build a fresh mesh drawing branch decisions from `rng`
    pub fn build_with_rng<R: Rng>(&self, rng: &mut R) -> Result<Mesh> {
        self.check()?;

        let config = &self.config;
        let mesh = match config.mode {
            GenerationMode::Tree => {
                BranchGrowth::new(config.tree, config.sectors, config.center).grow_with_rng(rng)
            }
            GenerationMode::Superformula => SuperformulaSurface::new(config.surface).build()?,
            GenerationMode::Column => {
                ColumnBuilder::new(config.column, config.sectors, config.center).build()
            }
        };

        log::info!(
            "generated {:?} mesh: {} vertices, {} triangles",
            config.mode,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    fn check(&self) -> Result<()> {
        let issues = self.config.issues();
        match self.config.validation {
            Validation::Strict => match issues.into_iter().next() {
                Some(issue) => Err(issue),
                None => Ok(()),
            },
            Validation::Permissive => {
                for issue in &issues {
                    log::warn!("{}; generating anyway", issue);
                }
                Ok(())
            }
        }
    }
}

/// Clock-derived seed for unseeded runs
#[cfg(target_arch = "wasm32")]
pub fn default_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Clock-derived seed for unseeded runs
#[cfg(not(target_arch = "wasm32"))]
pub fn default_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
