//! Axis-aligned rectangle overlap and push-out
//!
//! Bodies and grid cells are both AABBs in pixel space, so every collision is
//! resolved by pushing along the axis with the smaller overlap.

use glam::Vec2;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap: rectangles that only touch along an edge don't collide
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Axis a collision is resolved along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// How to move `body` so it no longer overlaps `block`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub axis: Axis,
    /// Signed push along the axis (negative = left/up)
    pub push: f32,
}

/// Minimum-overlap push-out of `body` from `block`, or `None` if they don't overlap
pub fn resolve_overlap(body: &Rect, block: &Rect, buffer: f32) -> Option<CollisionResult> {
    if !body.intersects(block) {
        return None;
    }
    let body_max = body.max();
    let block_max = block.max();
    let overlap_x = (body_max.x - block.min.x).min(block_max.x - body.min.x);
    let overlap_y = (body_max.y - block.min.y).min(block_max.y - body.min.y);

    let body_center = body.center();
    let block_center = block.center();

    if overlap_x < overlap_y {
        let push = if body_center.x < block_center.x {
            -(overlap_x + buffer)
        } else {
            overlap_x + buffer
        };
        Some(CollisionResult {
            axis: Axis::Horizontal,
            push,
        })
    } else {
        let push = if body_center.y < block_center.y {
            -(overlap_y + buffer)
        } else {
            overlap_y + buffer
        };
        Some(CollisionResult {
            axis: Axis::Vertical,
            push,
        })
    }
}
