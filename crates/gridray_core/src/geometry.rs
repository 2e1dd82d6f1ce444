//! Scene geometry: a closed set of shape kinds behind one intersection entry point.

use gridray_math::{Color, Mat4, Mat4Ext, Ray};

use crate::grid::GroundGrid;
use crate::hit_list::{Classification, HitRecord, TraceError, TraceResult};
use crate::sphere::Sphere;

/// Determinants smaller than this make a transform non-invertible.
const SINGULAR_EPSILON: f32 = 1e-12;

/// The shape kinds the tracer knows how to intersect.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    GroundGrid(GroundGrid),
    Sphere(Sphere),
}

/// A shape together with its world-to-model transform.
///
/// Rays are moved into the shape's canonical space before testing, so the
/// shapes themselves never need position, orientation or scale parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub shape: Shape,
    world_to_model: Mat4,
}

impl Geometry {
    /// Wrap a shape with an identity transform.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            world_to_model: Mat4::IDENTITY,
        }
    }

    pub fn ground_grid(grid: GroundGrid) -> Self {
        Self::new(Shape::GroundGrid(grid))
    }

    pub fn sphere(sphere: Sphere) -> Self {
        Self::new(Shape::Sphere(sphere))
    }

    /// Set the world-to-model transform directly.
    pub fn with_world_to_model(mut self, world_to_model: Mat4) -> Self {
        self.world_to_model = world_to_model;
        self
    }

    /// Place the shape in the world with a model-to-world transform.
    ///
    /// Fails with [`TraceError::SingularTransform`] if the matrix cannot be inverted.
    pub fn placed(mut self, model_to_world: Mat4) -> TraceResult<Self> {
        if model_to_world.determinant().abs() < SINGULAR_EPSILON {
            return Err(TraceError::SingularTransform);
        }
        self.world_to_model = model_to_world.inverse();
        Ok(self)
    }

    pub fn world_to_model(&self) -> Mat4 {
        self.world_to_model
    }

    /// Intersect a world-space ray with this geometry.
    ///
    /// The returned `t` is valid on the world-space ray: the direction is
    /// transformed without renormalization.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let model_ray = self.world_to_model.transform_ray(ray);
        match &self.shape {
            Shape::GroundGrid(grid) => grid.intersect(&model_ray),
            Shape::Sphere(sphere) => sphere.intersect(&model_ray),
        }
    }

    /// Classify a world-space ray against this geometry alone.
    pub fn classify(&self, ray: &Ray) -> Classification {
        self.intersect(ray)
            .map_or(Classification::Miss, |hit| hit.classification)
    }

    /// Flat color for a classification produced by this geometry.
    pub fn color(&self, classification: Classification) -> Option<Color> {
        match (&self.shape, classification) {
            (Shape::GroundGrid(grid), c) => grid.color(c),
            (Shape::Sphere(sphere), Classification::SurfaceHit) => Some(sphere.color),
            (Shape::Sphere(_), _) => None,
        }
    }
}
