//! Unit sphere primitive.
//!
//! The sphere is always centered at the model-space origin with radius 1;
//! position and size come from the owning geometry's transform.

use gridray_math::{Color, Ray};

use crate::hit_list::{Classification, HitRecord, VALID_T};

/// Unit sphere with a flat color.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub color: Color,
}

impl Sphere {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    /// Intersect a model-space ray with the unit sphere.
    ///
    /// Returns the nearest root in front of the origin; a ray starting inside
    /// the sphere reports the exit point.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        // Center is the origin, so oc = center - origin = -origin
        let oc = -ray.origin;
        let a = ray.direction.length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - 1.0;

        let discriminant = h * h - a * c;
        if !(discriminant >= 0.0) {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        let mut root = (h - sqrtd) / a;
        if !VALID_T.surrounds(root) {
            root = (h + sqrtd) / a;
            if !VALID_T.surrounds(root) {
                return None;
            }
        }

        Some(HitRecord::new(root, Classification::SurfaceHit))
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Color::new(0.8, 0.3, 0.3))
    }
}
