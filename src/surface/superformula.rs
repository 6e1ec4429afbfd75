use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::Vec3;
use crate::mesh::Mesh;

/// Superformula radius for `angle` with unit scale terms
///
/// `r = (|cos(m·angle/4)|^n2 + |sin(m·angle/4)|^n3)^(-1/n1)`
///
/// Nothing is validated: `n1 == 0` or negative exponents yield infinity or
/// NaN and those values flow straight into the vertices.
pub fn radius(angle: f32, m: f32, n1: f32, n2: f32, n3: f32) -> f32 {
    scaled_radius(angle, m, n1, n2, n3, 1.0, 1.0)
}

/// Superformula radius with explicit `a` / `b` scale terms
pub fn scaled_radius(angle: f32, m: f32, n1: f32, n2: f32, n3: f32, a: f32, b: f32) -> f32 {
    let t = m * angle / 4.0;
    let first = (t.cos() / a).abs().powf(n2);
    let second = (t.sin() / b).abs().powf(n3);
    (first + second).powf(-1.0 / n1)
}

/// One 2D superformula profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperformulaShape {
    pub m: f32,
    pub n1: f32,
    pub n2: f32,
    pub n3: f32,
    pub a: f32,
    pub b: f32,
}

impl Default for SuperformulaShape {
    fn default() -> Self {
        Self {
            m: 4.0,
            n1: 12.0,
            n2: 15.0,
            n3: 15.0,
            a: 1.0,
            b: 1.0,
        }
    }
}

impl SuperformulaShape {
    pub fn new(m: f32, n1: f32, n2: f32, n3: f32) -> Self {
        Self { m, n1, n2, n3, ..Default::default() }
    }

    pub fn radius(&self, angle: f32) -> f32 {
        scaled_radius(angle, self.m, self.n1, self.n2, self.n3, self.a, self.b)
    }
}

/// Parameters for the 3D superformula surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperformulaParams {
    /// Profile swept around the vertical axis
    pub longitude: SuperformulaShape,
    /// Profile from pole to pole
    pub latitude: SuperformulaShape,
    /// Angular sampling step in radians
    pub step: f32,
}

impl Default for SuperformulaParams {
    fn default() -> Self {
        Self {
            longitude: SuperformulaShape::default(),
            latitude: SuperformulaShape::default(),
            step: 0.5,
        }
    }
}

/// Samples the spherical superformula product on a latitude/longitude grid
///
/// Rows run from the south pole (-π/2) to the north pole (+π/2), each row
/// holding the same longitude samples from -π to +π. Both axes advance by
/// accumulating `step` and keep every sample not past the bound. Rows are
/// closed around longitude; the poles stay open.
pub struct SuperformulaSurface {
    params: SuperformulaParams,
}

impl SuperformulaSurface {
    pub fn new(params: SuperformulaParams) -> Self {
        Self { params }
    }

    /// Surface from the eight raw exponents, with unit scale terms
    #[allow(clippy::too_many_arguments)]
    pub fn from_exponents(
        m1: f32,
        n11: f32,
        n21: f32,
        n31: f32,
        m2: f32,
        n12: f32,
        n22: f32,
        n32: f32,
        step: f32,
    ) -> Self {
        Self::new(SuperformulaParams {
            longitude: SuperformulaShape::new(m1, n11, n21, n31),
            latitude: SuperformulaShape::new(m2, n12, n22, n32),
            step,
        })
    }

    /// Point on the surface, with the formula's z used as the vertical axis
    pub fn point(&self, latitude: f32, longitude: f32) -> Vec3 {
        let r_lon = self.params.longitude.radius(longitude);
        let r_lat = self.params.latitude.radius(latitude);
        surface_point(latitude, longitude, r_lat, r_lon)
    }

    /// Fails only for a step that would never finish sampling
    pub fn build(&self) -> Result<Mesh> {
        let step = self.params.step;
        let latitudes = sample_angles(-FRAC_PI_2, FRAC_PI_2, step)?;
        let longitudes = sample_angles(-PI, PI, step)?;

        let rows = latitudes.len();
        let row_len = longitudes.len();
        let mut mesh = Mesh::with_capacity(rows * row_len, 6 * rows.saturating_sub(1) * row_len);

        // Longitude radii are identical for every row
        let lon_radii: Vec<f32> = longitudes
            .iter()
            .map(|&lon| self.params.longitude.radius(lon))
            .collect();

        for &lat in &latitudes {
            let r_lat = self.params.latitude.radius(lat);
            mesh.add_vertices(
                longitudes
                    .iter()
                    .zip(&lon_radii)
                    .map(|(&lon, &r_lon)| surface_point(lat, lon, r_lat, r_lon)),
            );
        }

        add_grid_indices(&mut mesh, rows, row_len);
        mesh.calculate_bounds();

        if !mesh.is_finite() {
            log::warn!("superformula produced non-finite vertices; check n1 and exponent signs");
        }
        log::debug!(
            "superformula: {} rows x {} columns, {} triangles",
            rows,
            row_len,
            mesh.triangle_count()
        );

        Ok(mesh)
    }
}

fn surface_point(latitude: f32, longitude: f32, r_lat: f32, r_lon: f32) -> Vec3 {
    let x = r_lon * longitude.cos() * r_lat * latitude.cos();
    let y = r_lon * longitude.sin() * r_lat * latitude.cos();
    let z = r_lat * latitude.sin();
    Vec3::new(x, z, y)
}

/// Angles from `start` while `<= end`, accumulating `step` in f32
fn sample_angles(start: f32, end: f32, step: f32) -> Result<Vec<f32>> {
    if !(step.is_finite() && step > 0.0) || start + step <= start {
        return Err(GeometryError::InvalidStep(step));
    }

    let mut angles = Vec::new();
    let mut angle = start;
    while angle <= end {
        angles.push(angle);
        angle += step;
    }
    Ok(angles)
}

/// Quads between consecutive rows, wrapping the last column back to the first
fn add_grid_indices(mesh: &mut Mesh, rows: usize, row_len: usize) {
    if row_len == 0 {
        return;
    }

    let len = row_len as u32;
    for i in 0..rows.saturating_sub(1) as u32 {
        let row = i * len;
        let next = (i + 1) * len;
        for j in 0..len - 1 {
            mesh.add_quad(row + j, next + j, next + j + 1, row + j + 1);
        }
        mesh.add_quad(row + len - 1, next + len - 1, next, row);
    }
}
