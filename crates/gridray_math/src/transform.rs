// Transform utilities for Mat4
//
// Extends glam::Mat4 with ray transformation for model-space hit testing.
// Note: glam::Mat4 already provides transform_point3(), transform_vector3() and inverse()

use glam::Mat4;
use crate::Ray;

/// Extension trait for Mat4 to move rays between coordinate systems.
pub trait Mat4Ext {
    /// Transform a ray: the origin as a point (w=1), the direction as a vector (w=0).
    ///
    /// The direction is not renormalized, so a hit parameter `t` found against
    /// the transformed ray is valid on the original ray as well.
    fn transform_ray(&self, ray: &Ray) -> Ray;

    /// True if this matrix is exactly the identity (skip the transform).
    fn is_identity(&self) -> bool;
}

impl Mat4Ext for Mat4 {
    fn transform_ray(&self, ray: &Ray) -> Ray {
        if self.is_identity() {
            return *ray;
        }
        Ray::new(
            self.transform_point3(ray.origin),
            self.transform_vector3(ray.direction),
        )
    }

    fn is_identity(&self) -> bool {
        *self == Mat4::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_transform_ray_identity() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let transformed = Mat4::IDENTITY.transform_ray(&ray);

        assert_eq!(transformed, ray);
    }

    #[test]
    fn test_transform_ray_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 0.0, 0.0));
        let transformed = mat.transform_ray(&ray);

        // Translation moves the origin but never the direction (w=0)
        assert_eq!(transformed.origin, Vec3::new(11.0, 22.0, 33.0));
        assert_eq!(transformed.direction, ray.direction);
    }

    #[test]
    fn test_transform_ray_rotation() {
        use std::f32::consts::PI;

        // 90 degree rotation around Z axis
        let mat = Mat4::from_rotation_z(PI / 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let transformed = mat.transform_ray(&ray);

        // X direction should rotate to Y direction
        assert!((transformed.direction.x - 0.0).abs() < 0.001);
        assert!((transformed.direction.y - 1.0).abs() < 0.001);
        assert!((transformed.direction.z - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_transform_ray_preserves_parameter() {
        let mat = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::from_rotation_y(0.3),
            Vec3::new(-4.0, 1.0, 7.0),
        );
        let ray = Ray::new(Vec3::new(0.5, -1.0, 2.0), Vec3::new(0.2, 0.4, -1.0));
        let transformed = mat.transform_ray(&ray);

        // Point at t on the transformed ray is the image of the point at t on the original
        let t = 3.5;
        let expected = mat.transform_point3(ray.at(t));
        assert!((transformed.at(t) - expected).length() < 0.001);
    }

    #[test]
    fn test_inverse_round_trip() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 1.0, 0.0));
        let back = mat.inverse().transform_ray(&mat.transform_ray(&ray));

        assert!((back.origin - ray.origin).length() < 0.001);
        assert!((back.direction - ray.direction).length() < 0.001);
    }
}
