/// Closed interval [min, max] over f32.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    ///
    /// NaN maps to `min`, so a clamped value is always inside the interval.
    pub fn clamp(&self, x: f32) -> f32 {
        if x.is_nan() {
            return self.min;
        }
        x.clamp(self.min, self.max)
    }

    /// The unit interval [0, 1], the displayable range of a color channel.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}
