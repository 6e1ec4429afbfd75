use js_sys::{Float32Array, Uint32Array};
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod generator;
pub mod growth;
pub mod math;
pub mod mesh;
pub mod surface;

pub use config::{GenerationMode, GeneratorConfig, Validation};
pub use error::GeometryError;
pub use generator::Generator;
pub use growth::{BranchGrowth, GrowthParams};
pub use math::{Quat, Vec3};
pub use mesh::{ColumnBuilder, ColumnParams, CylinderSegment, Mesh};
pub use surface::{SuperformulaParams, SuperformulaShape, SuperformulaSurface};

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Fails only if a logger is already installed
    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Mesh generator exposed to JavaScript
///
/// Holds the most recent mesh; each `generate` call drops it and builds a
/// new one from the current configuration.
#[wasm_bindgen]
#[derive(Default)]
pub struct CylinderTree {
    generator: Generator,
    mesh: Option<Mesh>,
}

#[wasm_bindgen]
impl CylinderTree {
    /// Create a generator with default settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> CylinderTree {
        Self::default()
    }

    /// Create a generator configured from a YAML document
    #[wasm_bindgen]
    pub fn from_yaml(yaml: &str) -> std::result::Result<CylinderTree, JsValue> {
        let mut tree = Self::new();
        tree.configure(yaml)?;
        Ok(tree)
    }

    /// Replace the configuration; the current mesh is kept until `generate`
    #[wasm_bindgen]
    pub fn configure(&mut self, yaml: &str) -> std::result::Result<(), JsValue> {
        let config = GeneratorConfig::from_yaml(yaml).map_err(to_js)?;
        self.generator.configure(config);
        Ok(())
    }

    /// Current configuration as YAML
    #[wasm_bindgen]
    pub fn config_yaml(&self) -> std::result::Result<String, JsValue> {
        self.generator.config().to_yaml().map_err(to_js)
    }

    /// Fix the branch seed, or pass `undefined` to seed from the clock
    #[wasm_bindgen]
    pub fn set_seed(&mut self, seed: Option<u64>) {
        let mut config = self.generator.config().clone();
        config.seed = seed;
        self.generator.configure(config);
    }

    /// Rebuild the mesh, releasing the previous one first
    #[wasm_bindgen]
    pub fn generate(&mut self) -> std::result::Result<(), JsValue> {
        self.mesh = None;
        let mesh = self.generator.build().map_err(to_js)?;
        self.mesh = Some(mesh);
        Ok(())
    }

    /// Whether a mesh is available
    #[wasm_bindgen]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Vertex positions, xyz per vertex
    #[wasm_bindgen]
    pub fn vertex_data(&self) -> Float32Array {
        let data = self.mesh.as_ref().map(Mesh::vertex_data).unwrap_or_default();
        Float32Array::from(&data[..])
    }

    /// Smooth vertex normals, xyz per vertex
    #[wasm_bindgen]
    pub fn normal_data(&self) -> Float32Array {
        let data = self.mesh.as_ref().map(Mesh::normal_data).unwrap_or_default();
        Float32Array::from(&data[..])
    }

    /// Triangle indices
    #[wasm_bindgen]
    pub fn index_data(&self) -> Uint32Array {
        let data = self.mesh.as_ref().map(Mesh::index_data).unwrap_or_default();
        Uint32Array::from(data)
    }

    /// Bounding sphere as [center x, center y, center z, radius]
    #[wasm_bindgen]
    pub fn bounds(&self) -> Vec<f32> {
        match &self.mesh {
            Some(mesh) => {
                let c = mesh.bounds_center;
                vec![c.x, c.y, c.z, mesh.bounds_radius]
            }
            None => vec![0.0; 4],
        }
    }

    #[wasm_bindgen]
    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, Mesh::vertex_count)
    }

    #[wasm_bindgen]
    pub fn triangle_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, Mesh::triangle_count)
    }
}

fn to_js(err: GeometryError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
