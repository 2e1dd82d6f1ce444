//! gridray renderer - drives camera rays through a scene into an `ImageBuffer`.
//!
//! Two front ends share the same per-pixel sampler:
//! - [`render`] walks scanlines on the calling thread and reports progress
//! - [`render_buckets`] splits the frame into tiles and renders them with rayon

mod bucket;
mod renderer;
mod scene;

pub use bucket::{
    generate_buckets, render_bucket, render_buckets, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use renderer::{
    render, render_pixel, sample_coord, sample_offset, CancelToken, RenderConfig, RenderError,
    RenderResult, RenderStats,
};
pub use scene::Scene;

/// Re-export the core types most callers need alongside the renderer
pub use gridray_core::{Camera, Geometry, GroundGrid, ImageBuffer, Sphere};
pub use gridray_math::{Color, Vec3};
