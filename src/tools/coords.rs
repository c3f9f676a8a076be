//! Normalized-to-pixel coordinate mapping
//!
//! The model addresses the screen on a 0..=1000 grid regardless of the real
//! viewport. Values outside that range are passed through unclamped; the
//! browser reports whatever happens at the resulting pixel. Only values whose
//! pixel does not fit in an `i64` are refused.

use crate::core::{PixelPoint, Viewport};

/// Upper bound of the model's coordinate grid
pub const NORMALIZED_MAX: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMapper {
    viewport: Viewport,
}

impl CoordinateMapper {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn map_x(&self, x: i64) -> Option<i64> {
        scale(x, self.viewport.width)
    }

    pub fn map_y(&self, y: i64) -> Option<i64> {
        scale(y, self.viewport.height)
    }

    /// Pixel for a grid point; `None` when it does not fit in an `i64`
    pub fn map(&self, x: i64, y: i64) -> Option<PixelPoint> {
        Some(PixelPoint::new(self.map_x(x)?, self.map_y(y)?))
    }
}

/// floor(value / 1000 * dimension), in integer arithmetic
fn scale(value: i64, dimension: u32) -> Option<i64> {
    let scaled = (i128::from(value) * i128::from(dimension)).div_euclid(i128::from(NORMALIZED_MAX));
    i64::try_from(scaled).ok()
}
