use crate::error::{GeometryError, Result};
use crate::math::Vec3;

/// A mesh composed of vertex positions and triangle indices
///
/// Every generator in the crate appends into one of these. Indices are
/// absolute positions in `vertices`, three per triangle.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
    /// Bounding sphere, filled by `calculate_bounds`
    pub bounds_center: Vec3,
    pub bounds_radius: f32,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
            ..Default::default()
        }
    }

    /// Add vertices and return the starting index
    pub fn add_vertices(&mut self, verts: impl IntoIterator<Item = Vec3>) -> u32 {
        let start = self.vertices.len() as u32;
        self.vertices.extend(verts);
        start
    }

    /// Append already-absolute indices
    pub fn add_indices(&mut self, indices: impl IntoIterator<Item = u32>) {
        self.indices.extend(indices);
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Add a quad as the triangles (a, b, c) and (a, c, d)
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    /// Check the index buffer: whole triangles only, nothing dangling
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }

        let count = self.vertices.len();
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(GeometryError::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad, count
            )));
        }

        Ok(())
    }

    /// True when no vertex carries NaN or infinity
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(Vec3::is_finite)
    }

    /// Calculate bounding sphere around the vertex centroid
    pub fn calculate_bounds(&mut self) {
        if self.vertices.is_empty() {
            self.bounds_center = Vec3::ZERO;
            self.bounds_radius = 0.0;
            return;
        }

        let mut center = Vec3::ZERO;
        for v in &self.vertices {
            center += *v;
        }
        center = center.scale(1.0 / self.vertices.len() as f32);

        let max_dist = self
            .vertices
            .iter()
            .map(|v| v.distance(&center))
            .fold(0.0f32, f32::max);

        self.bounds_center = center;
        self.bounds_radius = max_dist;
    }

    /// Area-weighted smooth normals derived from triangle winding
    ///
    /// Triangles referencing missing vertices are skipped.
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(pa), Some(pb), Some(pc)) =
                (self.vertices.get(a), self.vertices.get(b), self.vertices.get(c))
            else {
                continue;
            };

            let face = (*pb - *pa).cross(&(*pc - *pa));
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        normals.iter().map(Vec3::normalize).collect()
    }

    /// Vertex positions as a flat xyz array for upload
    pub fn vertex_data(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    pub fn normal_data(&self) -> Vec<f32> {
        self.vertex_normals()
            .iter()
            .flat_map(|n| n.to_array())
            .collect()
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
