use serde::{Deserialize, Serialize};

use crate::math::{Quat, Vec3};
use super::assembly::Mesh;
use super::cylinder;

/// Parameters for a straight stack of tapering segments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnParams {
    /// Number of segments stacked along +Y
    pub vertical_segments: usize,
    /// Height of each segment
    pub height: f32,
    pub radius_x: f32,
    pub radius_z: f32,
    /// Segment k has bottom radii `radius / (k + divisor_base)` and top
    /// radii `radius / (k + divisor_base + 1)`
    pub divisor_base: f32,
    /// Emit an inward-facing wall next to the outer one
    pub double_sided: bool,
}

impl Default for ColumnParams {
    fn default() -> Self {
        Self {
            vertical_segments: 2,
            height: 1.0,
            radius_x: 1.0,
            radius_z: 0.5,
            divisor_base: 4.0,
            double_sided: false,
        }
    }
}

/// Builds a column of stacked cylinder segments
///
/// The first segment's base ring is centred on `center`; every segment is
/// offset from it.
pub struct ColumnBuilder {
    params: ColumnParams,
    sectors: usize,
    center: Vec3,
}

impl ColumnBuilder {
    pub fn new(params: ColumnParams, sectors: usize, center: Vec3) -> Self {
        Self { params, sectors, center }
    }

    pub fn build(&self) -> Mesh {
        let mut mesh = Mesh::new();
        for k in 0..self.params.vertical_segments {
            self.add_segment(k, &mut mesh);
        }
        mesh.calculate_bounds();

        log::debug!(
            "column: {} segments, {} vertices, {} triangles",
            self.params.vertical_segments,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        mesh
    }

    fn add_segment(&self, k: usize, mesh: &mut Mesh) {
        let p = &self.params;
        let bottom_div = k as f32 + p.divisor_base;
        let top_div = bottom_div + 1.0;
        let offset = mesh.vertices.len() as u32;

        let build = if p.double_sided {
            cylinder::build_double_sided
        } else {
            cylinder::build
        };
        let segment = build(
            p.height,
            p.radius_x / bottom_div,
            p.radius_z / bottom_div,
            p.radius_x / top_div,
            p.radius_z / top_div,
            self.sectors,
            offset,
        );

        let base = self.center + Vec3::UP.scale(k as f32 * p.height);
        mesh.add_vertices(segment.transformed(Quat::IDENTITY, base));
        mesh.add_indices(segment.indices);
    }
}
