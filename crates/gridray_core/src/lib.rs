//! gridray core - camera, geometry, hit collection and image storage.
//!
//! This crate provides:
//!
//! - **Camera**: orthonormal viewing basis, frustum and pixel-to-ray mapping
//! - **Geometry**: the ground grid and unit sphere behind one `Geometry` type
//! - **Hit collection**: `HitRecord` and the bounded per-ray `HitList`
//! - **Image storage**: `ImageBuffer` with float and 8-bit channels plus test patterns
//!
//! # Example
//!
//! ```ignore
//! use gridray_core::{Camera, Geometry, GroundGrid, HitList};
//!
//! let camera = Camera::new();
//! let grid = Geometry::ground_grid(GroundGrid::default());
//!
//! let ray = camera.generate_ray(128.5, 128.5);
//! let mut hits = HitList::new();
//! if let Some(hit) = grid.intersect(&ray) {
//!     hits.insert(0, hit)?;
//! }
//! println!("nearest: {:?}", hits.nearest().classification);
//! ```

pub mod camera;
pub mod geometry;
pub mod grid;
pub mod hit_list;
pub mod image_buffer;
pub mod pattern;
pub mod sphere;

// Re-export commonly used types
pub use camera::{Camera, CameraError, CameraResult, Frustum};
pub use geometry::{Geometry, Shape};
pub use grid::GroundGrid;
pub use hit_list::{
    Classification, HitList, HitRecord, TraceError, TraceResult, HIT_LIST_MAX, T_EPSILON, VALID_T,
};
pub use image_buffer::{ImageBuffer, ImageError, ImageResult, CHANNELS};
pub use pattern::TestPattern;
pub use sphere::Sphere;
