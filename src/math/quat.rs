use std::ops::Mul;
use super::Vec3;

/// Unit quaternion used to orient branch segments
///
/// `a * b` is the Hamilton product, so the composite applies `b` first and
/// `a` last. `q * v` rotates a vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Rotation of `degrees` around `axis`. The axis does not need to be
    /// normalized; a zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, degrees: f32) -> Self {
        let axis = axis.normalize();
        if axis.length_squared() == 0.0 {
            return Self::IDENTITY;
        }

        let half = degrees.to_radians() * 0.5;
        let s = half.sin();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: half.cos(),
        }
    }

    /// Euler rotation in degrees, applied around Z, then X, then Y
    pub fn from_euler(x: f32, y: f32, z: f32) -> Self {
        let qx = Self::from_axis_angle(Vec3::RIGHT, x);
        let qy = Self::from_axis_angle(Vec3::UP, y);
        let qz = Self::from_axis_angle(Vec3::FORWARD, z);
        qy * qx * qz
    }

    /// Rotate a vector by this quaternion
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        // v' = v + 2w(q × v) + 2q × (q × v)
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(&v).scale(2.0);
        v + t.scale(self.w) + q.cross(&t)
    }
}

impl Mul for Quat {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        self.rotate(v)
    }
}
