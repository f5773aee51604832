//! Axis-aligned rectangles and segment intersection
//!
//! A rect with zero width or height is still a valid shape (a line or a
//! point) and still overlaps things; "does not collide" is expressed by
//! `CollisionType::NoCollision`, never by an empty rect.

use std::ops::Sub;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in level space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: DVec2, w: f64, h: f64) -> Self {
        Self::new(pos.x, pos.y, w, h)
    }

    /// Smallest rect spanning two corner points, in any order
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// `[x, y, w, h]`, the layout used in level files
    pub fn from_components(c: [f64; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    pub fn components(&self) -> [f64; 4] {
        [self.x, self.y, self.w, self.h]
    }

    #[inline]
    pub fn pos(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Same size, moved to `pos`
    #[inline]
    pub fn with_pos(self, pos: DVec2) -> Self {
        Self::new(pos.x, pos.y, self.w, self.h)
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.w, self.h)
    }

    /// Same size at the origin (texture source rects)
    #[inline]
    pub fn pure(&self) -> Self {
        Self::new(0.0, 0.0, self.w, self.h)
    }

    #[inline]
    pub fn translated(self, delta: DVec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Overlap test; touching edges count as overlapping
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Area of the overlap region, zero when the rects are apart or only touch
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        if !self.intersects(other) {
            return 0.0;
        }
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        (w * h).max(0.0)
    }

    /// Point containment, edges inclusive
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether the segment `p1 -> p2` touches this rect
    ///
    /// True when either endpoint is inside, or the segment crosses one of
    /// the four edges.
    pub fn intersects_segment(&self, p1: DVec2, p2: DVec2) -> bool {
        if self.contains_point(p1) || self.contains_point(p2) {
            return true;
        }
        let tl = self.pos();
        let tr = DVec2::new(self.right(), self.y);
        let br = DVec2::new(self.right(), self.bottom());
        let bl = DVec2::new(self.x, self.bottom());

        segments_intersect(p1, p2, tl, tr)
            || segments_intersect(p1, p2, tr, br)
            || segments_intersect(p1, p2, br, bl)
            || segments_intersect(p1, p2, bl, tl)
    }
}

/// Move a rect into screen space by subtracting the camera offset
impl Sub<DVec2> for Rect {
    type Output = Rect;

    fn sub(self, offset: DVec2) -> Rect {
        self.translated(-offset)
    }
}

/// Sign of the cross product (b - a) x (c - a): >0 left turn, <0 right turn
#[inline]
fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// For a point known to be collinear with `a..b`, whether it lies on the segment
#[inline]
fn on_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Check if the segment `p1 -> p2` intersects the segment `p3 -> p4`
///
/// Collinear segments intersect when they overlap; touching at an endpoint
/// counts.
pub fn segments_intersect(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> bool {
    let d1 = orientation(p3, p4, p1);
    let d2 = orientation(p3, p4, p2);
    let d3 = orientation(p1, p2, p3);
    let d4 = orientation(p1, p2, p4);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(p3, p4, p1))
        || (d2 == 0.0 && on_segment(p3, p4, p2))
        || (d3 == 0.0 && on_segment(p1, p2, p3))
        || (d4 == 0.0 && on_segment(p1, p2, p4))
}
