//! Axis-aligned rectangles for footprints and coins

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle described by its center and full size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents()
    }

    /// Same center, size multiplied per axis
    pub fn scaled(&self, factor: Vec2) -> Self {
        Self::new(self.center, self.size * factor)
    }

    /// Strict overlap test (touching edges don't count)
    pub fn intersects(&self, other: &Rect) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half_extents() + other.half_extents();
        delta.x < reach.x && delta.y < reach.y
    }
}
