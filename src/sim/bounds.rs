//! Axis-aligned bounding boxes
//!
//! Every collision check in the game goes through `intersects`. Rectangles are
//! anchored at their top-left corner with y growing downward, matching the
//! screen-space positions the entities carry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, non-negative size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Check overlap with another rectangle
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        intersects(self, other)
    }
}

/// True iff the two rectangles overlap on a positive area.
///
/// Rectangles that only share an edge or a corner do not intersect.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    let left = a.left().max(b.left());
    let right = a.right().min(b.right());
    let top = a.top().max(b.top());
    let bottom = a.bottom().min(b.bottom());

    left < right && top < bottom
}
