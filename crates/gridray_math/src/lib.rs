// Re-export glam for convenience
pub use glam::*;

// gridray math types
mod interval;
mod ray;
mod transform;

pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// RGB color, linear floating point.
pub type Color = Vec3;
