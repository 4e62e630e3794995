//! Axis-aligned rectangles for every body on the playfield
//!
//! Positions are top-left anchored: `pos` is the top-left corner and `size`
//! extends right and down (screen coordinates, +y is down).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Overlap test with exclusive edges: rectangles that only share an edge
    /// (or a corner) do not collide.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.right() <= other.left()
            || self.left() >= other.right()
            || self.bottom() <= other.top()
            || self.top() >= other.bottom())
    }
}
