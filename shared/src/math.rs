//! Screen-space geometry types
//!
//! Integer offsets are what the game hands us and expects back; float
//! offsets are used for sub-pixel motion smoothing.

use glam::{IVec2, Vec2};

/// Integer screen-space offset (game coordinates).
pub type Offset = IVec2;

/// Floating-point screen-space offset.
pub type OffsetF = Vec2;

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero or negative
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Axis-aligned rectangle (top-left offset + size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub offset: Offset,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            offset: IVec2::new(x, y),
            size: Size::new(width, height),
        }
    }
}

/// Chebyshev (max-axis) distance between two integer points.
#[inline]
pub fn chebyshev_distance(a: Offset, b: Offset) -> i32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

/// Chebyshev (max-axis) distance between two sub-pixel points.
#[inline]
pub fn chebyshev_distance_f(a: OffsetF, b: OffsetF) -> f32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

/// Scale `v` to length `len`, or return zero for a zero-length vector.
#[inline]
pub fn normalize_to(v: OffsetF, len: f32) -> OffsetF {
    v.normalize_or_zero() * len
}
