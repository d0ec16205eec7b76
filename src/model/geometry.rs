//! Axis-aligned rectangles in page space.
//!
//! Coordinates use the layout extractor's convention: origin at the top-left
//! corner of the page, y growing downward, units in points.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle `(x0, y0, x1, y1)`.
///
/// `x1 >= x0` and `y1 >= y0` always hold for rectangles built with
/// [`Rect::new`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from two corners, normalising swapped coordinates.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Create a rectangle from its origin and size.
    pub fn from_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Create a square of side `size` centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(cx - half, cy - half, cx + half, cy + half)
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Centre point as `(x, y)`.
    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Intersection with another rectangle, if they overlap with positive area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1.min(other.x1);
        let y1 = self.y1.min(other.y1);

        if x1 > x0 && y1 > y0 {
            Some(Rect { x0, y0, x1, y1 })
        } else {
            None
        }
    }

    /// Check whether the two rectangles share a positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Check whether `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Rect {
        Rect::new(
            self.x0 - margin,
            self.y0 - margin,
            self.x1 + margin,
            self.y1 + margin,
        )
    }

    /// Shrink the rectangle by `inset` on every side, never past its centre.
    pub fn inset(&self, inset: f32) -> Rect {
        let dx = inset.min(self.width() / 2.0);
        let dy = inset.min(self.height() / 2.0);
        Rect::new(self.x0 + dx, self.y0 + dy, self.x1 - dx, self.y1 - dy)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Intersection area divided by the smaller of the two areas.
    ///
    /// Returns 0.0 when either rectangle has zero area, so degenerate
    /// rectangles never count as overlapping anything.
    pub fn overlap_ratio(&self, other: &Rect) -> f32 {
        let min_area = self.area().min(other.area());
        if min_area <= 0.0 {
            return 0.0;
        }

        match self.intersection(other) {
            Some(inter) => inter.area() / min_area,
            None => 0.0,
        }
    }

    /// Check whether either extent is below `min_extent`.
    pub fn is_degenerate(&self, min_extent: f32) -> bool {
        self.width() < min_extent || self.height() < min_extent
    }

    /// Check whether the vertical extents of two rectangles overlap.
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Flip into PDF user space (origin bottom-left) for a page of `page_height`.
    pub fn to_pdf_space(&self, page_height: f32) -> [f32; 4] {
        [self.x0, page_height - self.y1, self.x1, page_height - self.y0]
    }
}
