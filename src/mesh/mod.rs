pub mod assembly;
pub mod column;
pub mod cylinder;

pub use assembly::Mesh;
pub use column::{ColumnBuilder, ColumnParams};
pub use cylinder::CylinderSegment;
