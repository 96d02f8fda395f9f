//! Axis-aligned bounding boxes
//!
//! Every overlap test in the game (ball vs paddle, ball vs brick, reward vs
//! paddle) goes through [`Aabb::overlaps`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from a top-left corner and a size
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half extents (always positive for a well-formed box)
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Inclusive overlap test: boxes sharing an edge count as touching
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }

    /// Penetration depth of `self` into `other` along each axis.
    ///
    /// Each component is the smaller of the two edge distances, so it is the
    /// distance `self` would have to travel along that axis alone to leave
    /// `other` through the nearer side.
    pub fn penetration(&self, other: &Aabb) -> Vec2 {
        let x = (self.right() - other.left())
            .abs()
            .min((self.left() - other.right()).abs());
        let y = (self.bottom() - other.top())
            .abs()
            .min((self.top() - other.bottom()).abs());
        Vec2::new(x, y)
    }

    /// Point of `self`'s trailing edge clamped into `other`'s span.
    ///
    /// Used as the contact coordinate: x for top/bottom hits, y for side hits.
    pub fn contact_point(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            self.right().clamp(other.left(), other.right()),
            self.bottom().clamp(other.top(), other.bottom()),
        )
    }
}
