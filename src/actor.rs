//! The physics base shared by the avatar, enemies, items and projectiles.

use crate::geometry::Rect;

/// A rectangle with velocity, subject to gravity and obstacle collision.
///
/// `on_ground` is only true right after a downward contact in the current
/// frame: the vertical resolver clears it before moving.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub rect: Rect,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub on_ground: bool,
    /// Bottom edge before the most recent vertical move.
    pub previous_bottom: f32,
}

impl Actor {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            velocity_x: 0.0,
            velocity_y: 0.0,
            on_ground: false,
            previous_bottom: rect.bottom(),
        }
    }

    pub fn with_velocity(rect: Rect, velocity_x: f32, velocity_y: f32) -> Self {
        Self {
            velocity_x,
            velocity_y,
            ..Self::new(rect)
        }
    }

    /// Accelerate downward, capped at `max_fall`.
    pub fn apply_gravity(&mut self, gravity: f32, max_fall: f32) {
        self.velocity_y = (self.velocity_y + gravity).min(max_fall);
    }

    pub fn is_falling(&self) -> bool {
        self.velocity_y > 0.0
    }

    /// True once the top edge has passed `limit` (the world's lower bound
    /// plus whatever margin the caller allows).
    pub fn below(&self, limit: f32) -> bool {
        self.rect.y > limit
    }
}
