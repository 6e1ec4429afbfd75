use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::growth::{BranchGrowth, GrowthParams};
use crate::math::Vec3;
use crate::mesh::ColumnParams;
use crate::surface::SuperformulaParams;

/// Which generator `Generator::build` runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Tree,
    Superformula,
    Column,
}

/// How degenerate configuration is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// Generate anyway and log a warning
    #[default]
    Permissive,
    /// Refuse to generate
    Strict,
}

/// Full generator configuration, loadable from YAML
///
/// Every field is optional in the document and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub mode: GenerationMode,
    pub validation: Validation,
    /// Seed for branch placement; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Largest worst-case tree size accepted without complaint
    pub max_segments: u64,
    /// Sectors per cylinder ring
    pub sectors: usize,
    /// Base of the trunk or column
    pub center: Vec3,
    pub tree: GrowthParams,
    pub surface: SuperformulaParams,
    pub column: ColumnParams,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Tree,
            validation: Validation::Permissive,
            seed: None,
            max_segments: 1_000_000,
            sectors: 30,
            center: Vec3::ZERO,
            tree: GrowthParams::default(),
            surface: SuperformulaParams::default(),
            column: ColumnParams::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Problems with the settings the current mode actually uses
    ///
    /// An invalid surface step is not listed here; it is always fatal and
    /// reported by the surface builder itself.
    pub fn issues(&self) -> Vec<GeometryError> {
        let mut issues = Vec::new();

        match self.mode {
            GenerationMode::Tree => {
                if self.sectors < 3 {
                    issues.push(GeometryError::TooFewSectors(self.sectors));
                }
                let worst_case = BranchGrowth::new(self.tree, self.sectors, self.center)
                    .worst_case_segments();
                if worst_case > self.max_segments {
                    issues.push(GeometryError::SegmentBudgetExceeded {
                        worst_case,
                        budget: self.max_segments,
                    });
                }
            }
            GenerationMode::Column => {
                if self.sectors < 3 {
                    issues.push(GeometryError::TooFewSectors(self.sectors));
                }
            }
            GenerationMode::Superformula => {
                if self.surface.longitude.n1 == 0.0 {
                    issues.push(GeometryError::ZeroExponent("longitude"));
                }
                if self.surface.latitude.n1 == 0.0 {
                    issues.push(GeometryError::ZeroExponent("latitude"));
                }
            }
        }

        issues
    }
}
