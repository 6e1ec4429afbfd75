pub mod quat;
pub mod vec3;

pub use quat::Quat;
pub use vec3::Vec3;
