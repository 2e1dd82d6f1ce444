//! Infinite ground plane covered by a periodic line grid.

use gridray_math::{Color, Ray};

use crate::hit_list::{Classification, HitRecord, VALID_T};

/// Rays whose direction z-component is at most this fraction of the direction's
/// length count as parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// The plane `z = z_grid` with lines of constant x every `x_gap` and
/// lines of constant y every `y_gap`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundGrid {
    /// Height of the plane
    pub z_grid: f32,
    /// Spacing between lines of constant x
    pub x_gap: f32,
    /// Spacing between lines of constant y
    pub y_gap: f32,
    /// Line width as a fraction of the gap
    pub line_width: f32,
    pub line_color: Color,
    pub gap_color: Color,
}

impl GroundGrid {
    /// Create a grid with equal spacing on both axes and the default colors.
    pub fn new(z_grid: f32, gap: f32, line_width: f32) -> Self {
        Self {
            z_grid,
            x_gap: gap,
            y_gap: gap,
            line_width,
            ..Default::default()
        }
    }

    /// Set line and gap colors.
    pub fn with_colors(mut self, line_color: Color, gap_color: Color) -> Self {
        self.line_color = line_color;
        self.gap_color = gap_color;
        self
    }

    /// Classify where `ray` meets the grid.
    pub fn classify(&self, ray: &Ray) -> Classification {
        self.intersect(ray)
            .map_or(Classification::Miss, |hit| hit.classification)
    }

    /// Intersect `ray` with the plane.
    ///
    /// Returns `None` when the ray runs parallel to the plane or when the
    /// plane lies at or behind the ray origin (t <= [`T_EPSILON`]). The answer
    /// does not depend on the length of the ray's direction.
    ///
    /// [`T_EPSILON`]: crate::hit_list::T_EPSILON
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let dz = ray.direction.z;
        if dz.abs() <= PARALLEL_EPSILON * ray.direction.length() {
            return None;
        }

        let t0 = (self.z_grid - ray.origin.z) / dz;
        if !VALID_T.surrounds(t0) {
            return None;
        }

        let x = ray.origin.x + t0 * ray.direction.x;
        let y = ray.origin.y + t0 * ray.direction.y;

        let classification = if self.on_line(x, self.x_gap) || self.on_line(y, self.y_gap) {
            Classification::LineHit
        } else {
            Classification::GapHit
        };

        Some(HitRecord::new(t0, classification))
    }

    /// Color for a classification this grid produced.
    pub fn color(&self, classification: Classification) -> Option<Color> {
        match classification {
            Classification::LineHit => Some(self.line_color),
            Classification::GapHit => Some(self.gap_color),
            _ => None,
        }
    }

    // Mirrored about zero, so the lines through the origin are double width
    fn on_line(&self, coord: f32, gap: f32) -> bool {
        let loc = coord.abs() / gap;
        loc.fract() < self.line_width
    }
}

impl Default for GroundGrid {
    fn default() -> Self {
        Self {
            z_grid: -5.0,
            x_gap: 1.0,
            y_gap: 1.0,
            line_width: 0.1,
            line_color: Color::new(0.1, 0.5, 0.1),
            gap_color: Color::new(0.9, 0.9, 0.9),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridray_math::Vec3;

    fn ray_toward(target: Vec3) -> Ray {
        Ray::new(Vec3::ZERO, target)
    }

    #[test]
    fn test_grid_origin_is_line() {
        let grid = GroundGrid::default();

        assert_eq!(grid.classify(&ray_toward(Vec3::new(0.0, 0.0, -5.0))), Classification::LineHit);
    }

    #[test]
    fn test_half_gap_is_gap() {
        let grid = GroundGrid::default();

        let ray = ray_toward(Vec3::new(0.5, 0.5, -5.0));
        assert_eq!(grid.classify(&ray), Classification::GapHit);
    }

    #[test]
    fn test_line_on_one_axis_is_enough() {
        let grid = GroundGrid::default();

        // x lands on a line, y between lines
        let ray = ray_toward(Vec3::new(2.05, 0.5, -5.0));
        assert_eq!(grid.classify(&ray), Classification::LineHit);

        let ray = ray_toward(Vec3::new(0.5, -3.02, -5.0));
        assert_eq!(grid.classify(&ray), Classification::LineHit);
    }

    #[test]
    fn test_hit_distance() {
        let grid = GroundGrid::default();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.25, 0.25, -2.0));

        let hit = grid.intersect(&ray).unwrap();
        assert_eq!(hit.t, 3.0);
        assert_eq!(hit.classification, Classification::GapHit);
        assert_eq!(hit.geometry, None);
    }

    #[test]
    fn test_behind_camera_is_miss() {
        let grid = GroundGrid::default();

        // The infinite plane is at t = -5 along this ray
        let ray = ray_toward(Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(grid.classify(&ray), Classification::Miss);
        assert!(grid.intersect(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_is_miss() {
        let grid = GroundGrid::default();

        let ray = ray_toward(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(grid.classify(&ray), Classification::Miss);

        // Even from on the plane itself
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(grid.classify(&ray), Classification::Miss);
    }

    #[test]
    fn test_origin_on_plane_is_miss() {
        let grid = GroundGrid::default();
        let ray = Ray::new(Vec3::new(0.3, 0.3, -5.0), Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(grid.classify(&ray), Classification::Miss);
    }

    #[test]
    fn test_direction_length_does_not_change_result() {
        let grid = GroundGrid::default();
        let direction = Vec3::new(0.5, 0.5, -5.0);

        for scale in [1e-9, 1e-3, 1.0, 1e3] {
            let ray = Ray::new(Vec3::ZERO, direction * scale);
            assert_eq!(grid.classify(&ray), Classification::GapHit, "scale {scale}");
        }
    }

    #[test]
    fn test_tiny_frustum_still_sees_grid() {
        let mut camera = crate::Camera::new();
        camera.set_frustum(-1e-9, 1e-9, -1e-9, 1e-9, 1e-9).unwrap();
        let grid = GroundGrid::default();

        let ray = camera.generate_ray(128.5, 128.5);
        let scaled = Ray::new(ray.origin, ray.direction * 1e9);

        assert_eq!(grid.classify(&ray), Classification::LineHit);
        assert_eq!(grid.classify(&ray), grid.classify(&scaled));
    }

    #[test]
    fn test_origin_just_above_plane_is_miss() {
        let grid = GroundGrid::default();
        let down = Vec3::new(0.0, 0.0, -1.0);

        // Within T_EPSILON of the plane: the hit list would drop it too
        let ray = Ray::new(Vec3::new(0.3, 0.3, -5.0 + 5e-6), down);
        assert_eq!(grid.classify(&ray), Classification::Miss);

        let ray = Ray::new(Vec3::new(0.3, 0.3, -5.0 + 1e-3), down);
        assert_eq!(grid.classify(&ray), Classification::GapHit);
    }

    #[test]
    fn test_custom_spacing() {
        let grid = GroundGrid::new(0.0, 4.0, 0.25);
        let origin = Vec3::new(0.0, 0.0, 10.0);

        // loc = 2.0 / 4.0 = 0.5 on both axes
        let ray = Ray::new(origin, Vec3::new(2.0, 2.0, -10.0));
        assert_eq!(grid.classify(&ray), Classification::GapHit);

        // loc = 4.5 / 4.0 = 1.125, fraction 0.125 < 0.25
        let ray = Ray::new(origin, Vec3::new(4.5, 2.0, -10.0));
        assert_eq!(grid.classify(&ray), Classification::LineHit);
    }

    #[test]
    fn test_colors() {
        let grid = GroundGrid::default();

        assert_eq!(grid.color(Classification::LineHit), Some(grid.line_color));
        assert_eq!(grid.color(Classification::GapHit), Some(grid.gap_color));
        assert_eq!(grid.color(Classification::Miss), None);
    }
}
