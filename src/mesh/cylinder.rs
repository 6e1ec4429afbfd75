use std::f64::consts::TAU;

use crate::math::{Quat, Vec3};

/// One tesselated cylinder segment in local coordinates
///
/// The base ring sits on y = 0 and the top ring on y = height. `indices`
/// are already offset by the base passed to `build`, so they address the
/// bottom ring at `offset..offset + n` and the top ring right after it.
#[derive(Debug, Clone, Default)]
pub struct CylinderSegment {
    pub bottom_ring: Vec<Vec3>,
    pub top_ring: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl CylinderSegment {
    pub fn sectors(&self) -> usize {
        self.bottom_ring.len()
    }

    /// Bottom ring then top ring, rotated then moved to `center`
    pub fn transformed(&self, rotation: Quat, center: Vec3) -> impl Iterator<Item = Vec3> + '_ {
        self.bottom_ring
            .iter()
            .chain(self.top_ring.iter())
            .map(move |&v| rotation * v + center)
    }
}

/// Build a segment with an elliptical cross-section at each end
pub fn build(
    height: f32,
    bottom_radius_x: f32,
    bottom_radius_z: f32,
    top_radius_x: f32,
    top_radius_z: f32,
    sectors: usize,
    index_offset: u32,
) -> CylinderSegment {
    CylinderSegment {
        bottom_ring: create_ring(bottom_radius_x, bottom_radius_z, 0.0, sectors),
        top_ring: create_ring(top_radius_x, top_radius_z, height, sectors),
        indices: side_indices(sectors, index_offset),
    }
}

/// Same as `build`, plus an inward-facing copy of every side triangle
pub fn build_double_sided(
    height: f32,
    bottom_radius_x: f32,
    bottom_radius_z: f32,
    top_radius_x: f32,
    top_radius_z: f32,
    sectors: usize,
    index_offset: u32,
) -> CylinderSegment {
    let mut segment = build(
        height,
        bottom_radius_x,
        bottom_radius_z,
        top_radius_x,
        top_radius_z,
        sectors,
        index_offset,
    );
    let inner: Vec<u32> = segment
        .indices
        .chunks_exact(3)
        .flat_map(|t| [t[0], t[2], t[1]])
        .collect();
    segment.indices.extend(inner);
    segment
}

/// Ring of `sectors` vertices at height `y`, starting on +Z and turning toward +X
pub fn create_ring(radius_x: f32, radius_z: f32, y: f32, sectors: usize) -> Vec<Vec3> {
    (0..sectors)
        .map(|i| {
            let angle = i as f64 * TAU / sectors as f64;
            Vec3::new(
                (radius_x as f64 * angle.sin()) as f32,
                y,
                (radius_z as f64 * angle.cos()) as f32,
            )
        })
        .collect()
}

/// Side-wall triangles between a bottom ring at `offset` and a top ring at
/// `offset + sectors`
///
/// Each quad is (b[i], t[i+1], t[i]) + (b[i], b[i+1], t[i+1]), which faces
/// outward. The closing quad from the last sector back to sector 0 is
/// appended after the loop with the same winding.
pub fn side_indices(sectors: usize, offset: u32) -> Vec<u32> {
    if sectors == 0 {
        return Vec::new();
    }

    let n = sectors as u32;
    let mut indices = Vec::with_capacity(6 * sectors);

    for i in offset..offset + n - 1 {
        indices.extend_from_slice(&[i, n + i + 1, n + i]);
        indices.extend_from_slice(&[i, i + 1, n + i + 1]);
    }

    let last = offset + n - 1;
    indices.extend_from_slice(&[last, offset + n, last + n]);
    indices.extend_from_slice(&[last, offset, offset + n]);

    indices
}
