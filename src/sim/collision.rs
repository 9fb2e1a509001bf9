//! Collision detection
//!
//! Axis-aligned boxes only. An obstacle is treated as two solid columns with a
//! gap between them; the avatar hits it when the horizontal spans overlap and
//! either edge of the avatar leaves the gap.

use glam::Vec2;

use super::state::{Avatar, Obstacle};
use crate::tuning::Tuning;

/// Axis-aligned rectangle, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap of the horizontal spans (touching edges do not overlap)
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.max.x > left && self.min.x < right
    }
}

/// Bounding box of the avatar at its fixed horizontal position
pub fn avatar_box(avatar: &Avatar, tuning: &Tuning) -> Rect {
    Rect::new(
        tuning.avatar_x,
        avatar.position,
        tuning.avatar_width,
        tuning.avatar_height,
    )
}

/// Check whether the avatar box hits an obstacle
pub fn collides(avatar: &Rect, obstacle: &Obstacle, tuning: &Tuning) -> bool {
    if !avatar.overlaps_x(obstacle.x, obstacle.right(tuning)) {
        return false;
    }
    avatar.top() < obstacle.gap_top || avatar.bottom() > obstacle.gap_floor(tuning)
}

/// Check whether the avatar has left the playfield vertically
///
/// Checked against the avatar's top edge, independent of obstacles.
pub fn out_of_bounds(avatar: &Avatar, tuning: &Tuning) -> bool {
    avatar.position < 0.0 || avatar.position > tuning.floor_y()
}
