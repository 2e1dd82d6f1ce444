//! Procedural test patterns for checking the display path without tracing.

/// The built-in test patterns.
///
/// Channel values are computed in integer arithmetic and wrapped into
/// 0..=255, so oversized images repeat the ramps instead of saturating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPattern {
    /// Red/green ramps in an L along the left and bottom edges over a blue diagonal ramp
    LShape,
    /// Solid bright orange
    Orange,
    /// Yellow-to-blue vertical ramp with a grey block in the upper right
    Banded,
    /// Diagonal red ramp over vertical green/blue ramps
    Gradient,
}

impl TestPattern {
    pub const ALL: [TestPattern; 4] = [
        TestPattern::LShape,
        TestPattern::Orange,
        TestPattern::Banded,
        TestPattern::Gradient,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Select a pattern; any index is accepted and wraps around the pattern count.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(Self::COUNT as i32) as usize]
    }

    /// RGB value of pixel `(i, j)` in a `width × height` image.
    pub fn pixel(self, i: u32, j: u32, width: u32, height: u32) -> [u8; 3] {
        let (i, j) = (i as i64, j as i64);
        match self {
            TestPattern::LShape => {
                let in_l = (i as f32) < width as f32 / 4.0 || (j as f32) < height as f32 / 4.0;
                let blue = wrap(255 - i - j);
                if in_l {
                    [wrap(i), wrap(j), blue]
                } else {
                    [0, 0, blue]
                }
            }
            TestPattern::Orange => [255, 128, 0],
            TestPattern::Banded => {
                let in_block = (i as f32) > 5.0 * width as f32 / 7.0
                    && (j as f32) > 4.0 * height as f32 / 5.0;
                if in_block {
                    [200, 200, 200]
                } else {
                    [wrap(255 - j), wrap(255 - j), wrap(j)]
                }
            }
            TestPattern::Gradient => {
                let red = (255.0 - (i + j) as f64 / 2.0).trunc() as i64;
                [wrap(red), wrap(255 - j), wrap(255 - j)]
            }
        }
    }

    /// Fill an interleaved RGB byte buffer, rows bottom to top.
    pub(crate) fn fill(self, width: u32, height: u32, channels: &mut [u8]) {
        for (index, rgb) in channels.chunks_exact_mut(3).enumerate() {
            let i = (index % width as usize) as u32;
            let j = (index / width as usize) as u32;
            rgb.copy_from_slice(&self.pixel(i, j, width, height));
        }
    }
}

/// Reduce an integer into a byte with modulo-256 wrap-around.
fn wrap(value: i64) -> u8 {
    value.rem_euclid(256) as u8
}
