//! The world handed to the renderers: one camera and a flat list of geometry.

use gridray_core::{Camera, Geometry, HitList, HitRecord, TraceResult};
use gridray_math::{Color, Mat4, Ray};
use log::debug;

use crate::renderer::RenderResult;

/// Camera plus every piece of geometry a ray is tested against.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub camera: Camera,
    geometry: Vec<Geometry>,
}

impl Scene {
    /// Create an empty scene viewed through `camera`.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            geometry: Vec::new(),
        }
    }

    /// Add geometry and return its index (the index recorded in hit records).
    pub fn add(&mut self, geometry: Geometry) -> usize {
        let index = self.geometry.len();
        debug!("Scene geometry {}: {:?}", index, geometry.shape);
        self.geometry.push(geometry);
        index
    }

    /// Add geometry placed with a model-to-world transform.
    pub fn add_placed(&mut self, geometry: Geometry, model_to_world: Mat4) -> RenderResult<usize> {
        let placed = geometry.placed(model_to_world)?;
        Ok(self.add(placed))
    }

    pub fn geometry(&self) -> &[Geometry] {
        &self.geometry
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// Test `ray` against every geometry, recording hits in `hits`.
    ///
    /// All geometry is visited even after the list fills up; the first
    /// overflow is returned once the pass completes, and `hits` still holds
    /// everything that fit.
    pub fn trace(&self, ray: &Ray, hits: &mut HitList) -> TraceResult<()> {
        let mut overflow = None;
        for (index, geometry) in self.geometry.iter().enumerate() {
            if let Some(hit) = geometry.intersect(ray) {
                if let Err(err) = hits.insert(index, hit) {
                    overflow.get_or_insert(err);
                }
            }
        }
        overflow.map_or(Ok(()), Err)
    }

    /// Resolve a hit to a flat color; the background entry gets `background`.
    pub fn shade(&self, hit: &HitRecord, background: Color) -> Color {
        hit.geometry
            .and_then(|index| self.geometry.get(index))
            .and_then(|geometry| geometry.color(hit.classification))
            .unwrap_or(background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderError;
    use gridray_core::{Classification, GroundGrid, Sphere, TraceError};
    use gridray_math::Vec3;

    const SKY: Color = Color::new(0.3, 1.0, 1.0);

    fn grid_and_sphere() -> Scene {
        let mut scene = Scene::new(Camera::new());
        scene.add(Geometry::ground_grid(GroundGrid::default()));
        scene
            .add_placed(
                Geometry::sphere(Sphere::new(Color::new(1.0, 0.0, 0.0))),
                Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)),
            )
            .unwrap();
        scene
    }

    #[test]
    fn test_add_returns_indices() {
        let mut scene = Scene::default();
        assert!(scene.is_empty());

        assert_eq!(scene.add(Geometry::ground_grid(GroundGrid::default())), 0);
        assert_eq!(scene.add(Geometry::sphere(Sphere::default())), 1);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_add_placed_singular_is_trace_error() {
        let mut scene = Scene::default();
        let result = scene.add_placed(Geometry::sphere(Sphere::default()), Mat4::ZERO);

        assert!(matches!(
            result,
            Err(RenderError::Trace(TraceError::SingularTransform))
        ));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_trace_nearest_is_sphere() {
        let scene = grid_and_sphere();
        let mut hits = HitList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        scene.trace(&ray, &mut hits).unwrap();

        // Grid at t = 5, sphere front at t = 2
        assert_eq!(hits.len(), 2);
        let nearest = hits.nearest();
        assert_eq!(nearest.geometry, Some(1));
        assert!((nearest.t - 2.0).abs() < 1e-5);
        assert_eq!(scene.shade(nearest, SKY), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_trace_miss_shades_background() {
        let scene = grid_and_sphere();
        let mut hits = HitList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));

        scene.trace(&ray, &mut hits).unwrap();

        assert!(hits.is_empty());
        assert_eq!(hits.nearest().classification, Classification::Miss);
        assert_eq!(scene.shade(hits.nearest(), SKY), SKY);
    }

    #[test]
    fn test_trace_overflow_keeps_stored_hits() {
        let mut scene = Scene::default();
        for i in 0..3 {
            let z = -2.0 - i as f32;
            scene.add(Geometry::ground_grid(GroundGrid::new(z, 1.0, 0.1)));
        }
        let mut hits = HitList::with_capacity(2);
        let ray = Ray::new(Vec3::new(0.5, 0.5, 0.0), Vec3::new(0.0, 0.0, -1.0));

        let result = scene.trace(&ray, &mut hits);

        assert_eq!(result, Err(TraceError::HitListOverflow { capacity: 2 }));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.nearest().geometry, Some(0));
        assert_eq!(hits.nearest().classification, Classification::GapHit);
    }
}
