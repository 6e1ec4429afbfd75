pub mod algorithm;

pub use algorithm::{BranchGrowth, BranchState, GrowthParams, SegmentRecord};
