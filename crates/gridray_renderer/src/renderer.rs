//! Scanline renderer.
//!
//! Implements the per-pixel driver loop:
//! - `n × n` supersampling on a regular sub-pixel grid, optionally jittered
//! - nearest-hit flat shading against the scene background
//! - cooperative cancellation and periodic progress callbacks

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use gridray_core::{HitList, ImageBuffer, ImageError, TraceError};
use gridray_math::Color;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bucket::DEFAULT_BUCKET_SIZE;
use crate::scene::Scene;

/// Largest `f32` below 1.0; sub-pixel offsets never reach the next pixel.
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// Errors that stop a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Render cancelled after {completed} completed work units")]
    Cancelled { completed: usize },

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Invalid render config: {0}")]
    InvalidConfig(String),

    #[error(
        "Camera resolution {camera_width}x{camera_height} does not match image {image_width}x{image_height}"
    )]
    ResolutionMismatch {
        camera_width: u32,
        camera_height: u32,
        image_width: u32,
        image_height: u32,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples along each pixel axis (`n × n` samples per pixel)
    pub samples_per_axis: u32,
    /// Randomize sample positions within each sub-pixel cell
    pub jitter: bool,
    /// Color for rays that hit nothing
    pub background: Color,
    /// Bucket edge length for the parallel renderer
    pub bucket_size: u32,
    /// Scanlines between progress callbacks (0 disables them)
    pub progress_interval: u32,
    /// Seed for jitter
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_axis: 1,
            jitter: false,
            background: Color::new(0.3, 1.0, 1.0),
            bucket_size: DEFAULT_BUCKET_SIZE,
            progress_interval: 16,
            seed: 0,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> RenderResult<()> {
        if self.samples_per_axis == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_axis must be at least 1".into(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig(
                "bucket_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Samples traced for every pixel.
    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_axis * self.samples_per_axis
    }
}

/// Shared flag for stopping a render from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counters collected while rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Camera rays traced
    pub samples: u64,
    /// Rays whose hit list ran out of room
    pub hit_list_overflows: u64,
}

impl RenderStats {
    pub fn merge(&mut self, other: RenderStats) {
        self.samples += other.samples;
        self.hit_list_overflows += other.hit_list_overflows;
    }
}

/// Offset of sample `i` of `n` within a pixel, in [0, 1).
///
/// `r` is the position inside the sub-pixel cell: 0.5 for the cell center,
/// a uniform value in [0, 1) when jittering.
#[inline]
pub fn sample_offset(i: u32, n: u32, r: f32) -> f32 {
    ((i as f32 + r) / n as f32).min(BELOW_ONE)
}

/// Image coordinate of sample `i` of `n` along one axis of `pixel`.
///
/// The result stays inside `[pixel, pixel + 1)` even when adding the offset
/// would round up to the next pixel's corner.
#[inline]
pub fn sample_coord(pixel: u32, i: u32, n: u32, r: f32) -> f32 {
    let start = pixel as f32;
    let last = f32::from_bits((start + 1.0).to_bits() - 1);
    (start + sample_offset(i, n, r)).min(last)
}

/// Render a single pixel with `n × n` supersampling.
///
/// `hits` is scratch space cleared before every sample. A hit-list overflow
/// is counted in `stats` and the sample still uses the nearest stored hit.
pub fn render_pixel<R: Rng + ?Sized>(
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    hits: &mut HitList,
    rng: &mut R,
    stats: &mut RenderStats,
) -> Color {
    let n = config.samples_per_axis;
    let mut pixel_color = Color::ZERO;

    for j in 0..n {
        for i in 0..n {
            let (ru, rv) = if config.jitter {
                (rng.gen::<f32>(), rng.gen::<f32>())
            } else {
                (0.5, 0.5)
            };
            let px = sample_coord(x, i, n, ru);
            let py = sample_coord(y, j, n, rv);
            let ray = scene.camera.generate_ray(px, py);

            hits.clear();
            if scene.trace(&ray, hits).is_err() {
                stats.hit_list_overflows += 1;
            }
            stats.samples += 1;
            pixel_color += scene.shade(hits.nearest(), config.background);
        }
    }

    pixel_color / config.samples_per_pixel() as f32
}

/// Reject renders whose camera and image disagree on size.
pub(crate) fn check_target(scene: &Scene, image: &ImageBuffer) -> RenderResult<()> {
    let (camera_width, camera_height) = scene.camera.resolution();
    if (camera_width, camera_height) != (image.width(), image.height()) {
        return Err(RenderError::ResolutionMismatch {
            camera_width,
            camera_height,
            image_width: image.width(),
            image_height: image.height(),
        });
    }
    Ok(())
}

pub(crate) fn report_overflows(stats: &RenderStats) {
    if stats.hit_list_overflows > 0 {
        warn!(
            "Hit list overflowed on {} of {} samples; extra hits were dropped",
            stats.hit_list_overflows, stats.samples
        );
    }
}

/// Render the scene into `image` one scanline at a time, bottom to top.
///
/// `cancel` is checked before every scanline. When `progress` is given it is
/// called every `config.progress_interval` scanlines, after the display
/// channels have been synced, with the number of finished scanlines. A
/// cancelled render syncs what it finished and returns
/// [`RenderError::Cancelled`] with that scanline count.
pub fn render(
    scene: &Scene,
    image: &mut ImageBuffer,
    config: &RenderConfig,
    cancel: &CancelToken,
    mut progress: Option<&mut dyn FnMut(&ImageBuffer, u32)>,
) -> RenderResult<RenderStats> {
    config.validate()?;
    check_target(scene, image)?;
    debug!("Scanline render with {:?}", config);

    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut hits = HitList::new();
    let mut stats = RenderStats::default();

    for y in 0..image.height() {
        if cancel.is_cancelled() {
            image.sync_float_to_int();
            info!("Render cancelled after {} scanlines", y);
            return Err(RenderError::Cancelled {
                completed: y as usize,
            });
        }

        for x in 0..image.width() {
            let color = render_pixel(scene, x, y, config, &mut hits, &mut rng, &mut stats);
            image.write_float_pixel(x, y, color)?;
        }

        let done = y + 1;
        if config.progress_interval > 0 && done % config.progress_interval == 0 {
            if let Some(callback) = progress.as_mut() {
                image.sync_float_to_int();
                callback(&*image, done);
            }
        }
    }

    image.sync_float_to_int();
    report_overflows(&stats);
    info!(
        "Rendered {}x{} ({} samples) in {:.2?}",
        image.width(),
        image.height(),
        stats.samples,
        start.elapsed()
    );
    Ok(stats)
}
