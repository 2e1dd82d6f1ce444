//! Hit records and the per-ray hit list.

use gridray_math::Interval;
use thiserror::Error;

/// Default maximum number of hits recorded for one ray.
pub const HIT_LIST_MAX: usize = 64;

/// Hits at or closer than this parameter are treated as behind the ray origin.
pub const T_EPSILON: f32 = 1e-5;

/// Accepted range for a hit parameter: strictly in front of the origin and finite.
/// Shapes reject hits outside this range as well.
pub const VALID_T: Interval = Interval::new(T_EPSILON, f32::INFINITY);

/// Errors raised while collecting intersections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("Hit list overflow: capacity of {capacity} hits exceeded")]
    HitListOverflow { capacity: usize },

    #[error("Model transform is not invertible")]
    SingularTransform,
}

pub type TraceResult<T> = Result<T, TraceError>;

/// What a ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Classification {
    /// Nothing visible in front of the ray.
    #[default]
    Miss,
    /// Ground grid, between the lines.
    GapHit,
    /// Ground grid, on a line.
    LineHit,
    /// Any solid surface.
    SurfaceHit,
}

impl Classification {
    pub fn is_hit(self) -> bool {
        self != Classification::Miss
    }
}

/// One ray/surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter along the ray (in units of the ray's direction length)
    pub t: f32,
    pub classification: Classification,
    /// Index of the geometry that was hit, `None` for the background
    pub geometry: Option<usize>,
}

impl HitRecord {
    /// The background entry every hit list starts with.
    pub const BACKGROUND: HitRecord = HitRecord {
        t: f32::INFINITY,
        classification: Classification::Miss,
        geometry: None,
    };

    /// A hit not yet attributed to a geometry.
    pub fn new(t: f32, classification: Classification) -> Self {
        Self {
            t,
            classification,
            geometry: None,
        }
    }

    pub fn is_background(&self) -> bool {
        self.geometry.is_none()
    }
}

/// All hits found for a single ray, plus the background sentinel.
///
/// Storage is reserved once at construction; `clear` resets the logical
/// length so one list can be reused for every ray a worker traces.
#[derive(Debug, Clone)]
pub struct HitList {
    hits: Vec<HitRecord>,
    capacity: usize,
    nearest: Option<usize>,
}

impl HitList {
    /// Create an empty list holding up to [`HIT_LIST_MAX`] hits.
    pub fn new() -> Self {
        Self::with_capacity(HIT_LIST_MAX)
    }

    /// Create an empty list holding up to `capacity` hits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hits: Vec::with_capacity(capacity),
            capacity,
            nearest: None,
        }
    }

    /// Record a hit on `geometry`.
    ///
    /// Returns `Ok(false)` when the hit is behind the origin (t <= [`T_EPSILON`])
    /// or not finite; such hits are dropped silently. A full list rejects the
    /// hit with [`TraceError::HitListOverflow`].
    pub fn insert(&mut self, geometry: usize, hit: HitRecord) -> TraceResult<bool> {
        if !VALID_T.surrounds(hit.t) {
            return Ok(false);
        }
        if self.hits.len() >= self.capacity {
            return Err(TraceError::HitListOverflow {
                capacity: self.capacity,
            });
        }

        let index = self.hits.len();
        self.hits.push(HitRecord {
            geometry: Some(geometry),
            ..hit
        });

        match self.nearest {
            Some(nearest) if self.hits[nearest].t <= hit.t => {}
            _ => self.nearest = Some(index),
        }
        Ok(true)
    }

    /// The hit with the smallest `t`, or the background entry if nothing was hit.
    pub fn nearest(&self) -> &HitRecord {
        match self.nearest {
            Some(index) => &self.hits[index],
            None => &HitRecord::BACKGROUND,
        }
    }

    /// Forget all hits, keeping the allocation.
    pub fn clear(&mut self) {
        self.hits.clear();
        self.nearest = None;
    }

    /// Number of recorded hits (the background entry is not counted).
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Recorded hits in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &HitRecord> {
        self.hits.iter()
    }
}

impl Default for HitList {
    fn default() -> Self {
        Self::new()
    }
}
