//! Ray-tracing camera.
//!
//! The camera is an orthonormal, right-handed `u, v, n` frame anchored at the
//! eye point. It looks down `-n`, and its image is a rectangle on the plane
//! `n = -near` in camera space, split into `xmax × ymax` pixel tiles. Pixel
//! (0, 0) is the lower-left tile.

use gridray_math::{Mat3, Quat, Ray, Vec3};
use log::debug;
use thiserror::Error;

/// Cross products and gaze vectors shorter than this are treated as zero.
const DEGENERATE_EPSILON: f32 = 1e-6;

/// Errors raised by camera configuration.
///
/// Every setter validates before mutating, so a camera that returned an
/// error is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Near distance must be positive and finite, got {0}")]
    InvalidNear(f32),

    #[error("Degenerate frustum: left={left} right={right} bottom={bottom} top={top}")]
    DegenerateFrustum {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
    },

    #[error("Vertical field of view must be within (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("Aspect ratio must be positive and finite, got {0}")]
    InvalidAspect(f32),

    #[error("Resolution must be non-zero, got {0}x{1}")]
    InvalidResolution(u32, u32),

    #[error("Eye point and aim point coincide")]
    DegenerateGaze,

    #[error("Up vector is parallel to the view direction")]
    DegenerateUpVector,
}

pub type CameraResult<T> = Result<T, CameraError>;

/// Image rectangle on the plane `n = -near`, in camera coordinates.
///
/// There is no far plane: rays are unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
}

impl Frustum {
    /// Build a frustum, rejecting a non-positive near distance or a zero-area rectangle.
    pub fn new(left: f32, right: f32, bottom: f32, top: f32, near: f32) -> CameraResult<Self> {
        if !(near > 0.0) || !near.is_finite() {
            return Err(CameraError::InvalidNear(near));
        }

        let bounds = [left, right, bottom, top];
        if bounds.iter().any(|b| !b.is_finite()) || left == right || bottom == top {
            return Err(CameraError::DegenerateFrustum {
                left,
                right,
                bottom,
                top,
            });
        }

        Ok(Self {
            left,
            right,
            bottom,
            top,
            near,
        })
    }

    /// Width of the image rectangle.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the image rectangle.
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

impl Default for Frustum {
    fn default() -> Self {
        // Square image at unit distance: +/- 45 degrees each way
        Self {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            near: 1.0,
        }
    }
}

/// Pinhole camera that turns continuous pixel coordinates into world-space rays.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    // Extrinsics
    eye_point: Vec3,
    u: Vec3,
    v: Vec3,
    n: Vec3,

    // Intrinsics
    frustum: Frustum,
    xmax: u32,
    ymax: u32,

    // Pixel tile size, derived from frustum and resolution
    ufrac: f32,
    vfrac: f32,
}

impl Camera {
    /// Default resolution along each axis.
    pub const DEFAULT_RESOLUTION: u32 = 256;

    /// Create a camera at the world origin with `u, v, n` equal to world `x, y, z`,
    /// a `[-1, 1] × [-1, 1]` image at `near = 1` and a 256×256 resolution.
    pub fn new() -> Self {
        let frustum = Frustum::default();
        let xmax = Self::DEFAULT_RESOLUTION;
        let ymax = Self::DEFAULT_RESOLUTION;
        Self {
            eye_point: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            n: Vec3::Z,
            frustum,
            xmax,
            ymax,
            ufrac: frustum.width() / xmax as f32,
            vfrac: frustum.height() / ymax as f32,
        }
    }

    /// Set image resolution (builder form of [`Camera::set_resolution`]).
    pub fn with_resolution(mut self, xmax: u32, ymax: u32) -> CameraResult<Self> {
        self.set_resolution(xmax, ymax)?;
        Ok(self)
    }

    /// Set the number of pixels across and up the image rectangle.
    pub fn set_resolution(&mut self, xmax: u32, ymax: u32) -> CameraResult<()> {
        if xmax == 0 || ymax == 0 {
            return Err(CameraError::InvalidResolution(xmax, ymax));
        }
        self.xmax = xmax;
        self.ymax = ymax;
        self.update_tile_size();
        Ok(())
    }

    /// Set the image rectangle directly, `glFrustum` style without a far plane.
    pub fn set_frustum(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
    ) -> CameraResult<()> {
        self.frustum = Frustum::new(left, right, bottom, top, near)?;
        self.update_tile_size();
        debug!("Camera frustum set to {:?}", self.frustum);
        Ok(())
    }

    /// Set a symmetric image rectangle from a vertical field of view (degrees),
    /// an aspect ratio (width / height) and the near distance.
    pub fn set_perspective(
        &mut self,
        fovy_degrees: f32,
        aspect: f32,
        near: f32,
    ) -> CameraResult<()> {
        if !(fovy_degrees > 0.0 && fovy_degrees < 180.0) {
            return Err(CameraError::InvalidFieldOfView(fovy_degrees));
        }
        if !(aspect > 0.0) || !aspect.is_finite() {
            return Err(CameraError::InvalidAspect(aspect));
        }
        if !(near > 0.0) || !near.is_finite() {
            return Err(CameraError::InvalidNear(near));
        }

        let top = near * (0.5 * fovy_degrees).to_radians().tan();
        let right = top * aspect;
        self.set_frustum(-right, right, -top, top, near)
    }

    /// Place the camera at `eye`, looking at `aim`, with `up` appearing vertical.
    ///
    /// Fails if `eye == aim` or if `up` is parallel to the gaze direction.
    pub fn look_at(&mut self, eye: Vec3, aim: Vec3, up: Vec3) -> CameraResult<()> {
        let gaze = eye - aim;
        let gaze_len = gaze.length();
        if !(gaze_len > DEGENERATE_EPSILON) || !gaze_len.is_finite() {
            return Err(CameraError::DegenerateGaze);
        }
        let n = gaze / gaze_len;

        // |up × n| = |up| sin(angle); compare against |up| so the test is scale-free
        let side = up.cross(n);
        let up_len = up.length();
        if !(side.length() > DEGENERATE_EPSILON * up_len) {
            return Err(CameraError::DegenerateUpVector);
        }
        let u = side.normalize();
        let v = n.cross(u);

        self.eye_point = eye;
        self.u = u;
        self.v = v;
        self.n = n;
        debug!("Camera look_at eye={} aim={} -> u={} v={} n={}", eye, aim, u, v, n);
        Ok(())
    }

    /// Move the eye point without changing orientation.
    pub fn set_eye_point(&mut self, eye: Vec3) {
        self.eye_point = eye;
    }

    /// Rotate the camera frame about the eye point.
    ///
    /// The rotated frame is re-orthonormalized so repeated rotations do not drift.
    pub fn rotate(&mut self, rotation: Quat) {
        let n = (rotation * self.n).normalize();
        let u = rotation * self.u;
        let u = (u - n * u.dot(n)).normalize();
        self.n = n;
        self.u = u;
        self.v = n.cross(u);
    }

    /// Generate the world-space ray through continuous pixel coordinates `(px, py)`.
    ///
    /// Integer coordinates aim at tile corners: pass `x + 0.5, y + 0.5` for the
    /// pixel center, or any point of `[x, x+1) × [y, y+1)` for a sub-sample.
    /// The direction is not normalized; its magnitude is the distance from the
    /// eye to the sampled point on the image rectangle.
    pub fn generate_ray(&self, px: f32, py: f32) -> Ray {
        let uvn = Vec3::new(
            self.frustum.left + px * self.ufrac,
            self.frustum.bottom + py * self.vfrac,
            -self.frustum.near,
        );
        Ray::new(self.eye_point, self.camera_to_world() * uvn)
    }

    /// Rotation whose columns are the `u, v, n` axes.
    pub fn camera_to_world(&self) -> Mat3 {
        Mat3::from_cols(self.u, self.v, self.n)
    }

    /// Express a world-space vector in `u, v, n` coordinates.
    pub fn world_to_camera(&self, vector: Vec3) -> Vec3 {
        Vec3::new(vector.dot(self.u), vector.dot(self.v), vector.dot(self.n))
    }

    pub fn eye_point(&self) -> Vec3 {
        self.eye_point
    }

    /// The `(u, v, n)` axes.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.n)
    }

    pub fn frustum(&self) -> Frustum {
        self.frustum
    }

    /// Resolution as `(xmax, ymax)`.
    pub fn resolution(&self) -> (u32, u32) {
        (self.xmax, self.ymax)
    }

    /// Pixel tile size `(ufrac, vfrac)` in camera units.
    pub fn tile_size(&self) -> (f32, f32) {
        (self.ufrac, self.vfrac)
    }

    /// Dump the eye point, basis, frustum and tile size at debug level.
    pub fn log_state(&self) {
        debug!("Camera eye={} u={} v={} n={}", self.eye_point, self.u, self.v, self.n);
        debug!(
            "Camera {:?} at {}x{}, tile {}x{}",
            self.frustum, self.xmax, self.ymax, self.ufrac, self.vfrac
        );
    }

    fn update_tile_size(&mut self) {
        self.ufrac = self.frustum.width() / self.xmax as f32;
        self.vfrac = self.frustum.height() / self.ymax as f32;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
