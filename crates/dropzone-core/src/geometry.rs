#![forbid(unsafe_code)]

//! Viewport geometry for drop-zone containment tests.
//!
//! [`BoundingRect`] is what the host measures for the zone element.
//! [`ZoneRect`] is the cached, normalized form used by leave detection: on
//! narrow viewports the horizontal edges are clamped to the full viewport
//! because layout engines report edge-to-edge elements with non-zero insets.

/// Raw bounding rectangle as reported by the host, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
}

impl BoundingRect {
    /// Create a rectangle from its edges; `width` is derived.
    #[inline]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            width: right - left,
        }
    }
}

/// Cached drop-zone rectangle.
///
/// Invariant: `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoneRect {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    width: f64,
}

impl ZoneRect {
    /// Create a rectangle from edges, swapping inverted pairs.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        let (left, right) = ordered(left, right);
        let (top, bottom) = ordered(top, bottom);
        Self {
            left,
            right,
            top,
            bottom,
            width: right - left,
        }
    }

    /// Normalize a measured rectangle for the current viewport.
    ///
    /// At or below `breakpoint`, `left` becomes 0 and `right` becomes the
    /// viewport width. `width` keeps the measured element width.
    pub fn from_measured(measured: BoundingRect, viewport_width: f64, breakpoint: f64) -> Self {
        let narrow = viewport_width <= breakpoint;
        let (left, right) = if narrow {
            (0.0, viewport_width.max(0.0))
        } else {
            ordered(measured.left, measured.right)
        };
        let (top, bottom) = ordered(measured.top, measured.bottom);
        Self {
            left,
            right,
            top,
            bottom,
            width: measured.width,
        }
    }

    #[inline]
    pub const fn left(&self) -> f64 {
        self.left
    }

    #[inline]
    pub const fn right(&self) -> f64 {
        self.right
    }

    #[inline]
    pub const fn top(&self) -> f64 {
        self.top
    }

    #[inline]
    pub const fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Measured element width (not clamped).
    #[inline]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Whether a pointer position lies on or beyond any edge.
    ///
    /// Edges are exclusive: a pointer exactly on `left` counts as outside.
    #[inline]
    pub fn is_outside(&self, x: f64, y: f64) -> bool {
        y <= self.top || y >= self.bottom || x <= self.left || x >= self.right
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a { (b, a) } else { (a, b) }
}
