// Re-export glam for convenience
pub use glam::*;

// Halo math types
mod ray;
pub mod simd;

pub use ray::Ray;
pub use simd::{LaneWidth, Lanes};
