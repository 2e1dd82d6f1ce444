//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that are rendered
//! independently and in parallel using rayon.

use std::time::Instant;

use gridray_core::{HitList, ImageBuffer};
use gridray_math::Color;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::renderer::{
    check_target, render_pixel, report_overflows, CancelToken, RenderConfig, RenderError,
    RenderResult, RenderStats,
};
use crate::scene::Scene;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of the bucket's lower-left corner
    pub x: u32,
    /// Y coordinate of the bucket's lower-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets near the center come first, so a partially finished (or
/// cancelled) render has the middle of the frame.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable, so equidistant buckets keep scanline order
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order, bottom row first
    pub pixels: Vec<Color>,
    pub stats: RenderStats,
}

/// Render a single bucket.
///
/// Each bucket owns its hit list and an RNG seeded from `config.seed` and
/// the bucket index, so jittered renders repeat exactly regardless of
/// thread scheduling.
pub fn render_bucket(bucket: &Bucket, scene: &Scene, config: &RenderConfig) -> BucketResult {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(bucket.index as u64));
    let mut hits = HitList::new();
    let mut stats = RenderStats::default();

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            let color = render_pixel(
                scene, global_x, global_y, config, &mut hits, &mut rng, &mut stats,
            );
            pixels.push(color);
        }
    }

    BucketResult {
        bucket: *bucket,
        pixels,
        stats,
    }
}

/// Render the scene into `image` with buckets spread over the rayon pool.
///
/// `cancel` is checked before each bucket starts. Finished buckets are
/// written back and synced even when the render is cancelled, in which case
/// [`RenderError::Cancelled`] reports how many buckets completed.
pub fn render_buckets(
    scene: &Scene,
    image: &mut ImageBuffer,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> RenderResult<RenderStats> {
    config.validate()?;
    check_target(scene, image)?;

    let start = Instant::now();
    let buckets = generate_buckets(image.width(), image.height(), config.bucket_size);
    debug!(
        "Bucket render: {} buckets of {}px with {:?}",
        buckets.len(),
        config.bucket_size,
        config
    );

    let results: Vec<Option<BucketResult>> = buckets
        .par_iter()
        .map(|bucket| {
            if cancel.is_cancelled() {
                None
            } else {
                Some(render_bucket(bucket, scene, config))
            }
        })
        .collect();

    let mut stats = RenderStats::default();
    let mut completed = 0;
    for result in results.iter().flatten() {
        let bucket = &result.bucket;
        let mut pixels = result.pixels.iter();
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                if let Some(&color) = pixels.next() {
                    image.write_float_pixel(bucket.x + local_x, bucket.y + local_y, color)?;
                }
            }
        }
        stats.merge(result.stats);
        completed += 1;
    }
    image.sync_float_to_int();
    report_overflows(&stats);

    if completed < buckets.len() {
        info!(
            "Bucket render cancelled after {} of {} buckets",
            completed,
            buckets.len()
        );
        return Err(RenderError::Cancelled { completed });
    }

    info!(
        "Rendered {}x{} in {} buckets ({} samples) in {:.2?}",
        image.width(),
        image.height(),
        buckets.len(),
        stats.samples,
        start.elapsed()
    );
    Ok(stats)
}
