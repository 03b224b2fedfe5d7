//! Axis-aligned rectangles and the axis-separated collision resolver.
//!
//! Every spatial entity is a `Rect` in world (unscrolled) coordinates with
//! `y` growing downward. Resolution runs once per axis per frame: move on X,
//! push out of whatever is now overlapped, then the same on Y.

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::entities::Obstacle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.width;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.height;
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// A copy grown by `dx` on the left and right sides.
    pub fn widened(&self, dx: f32) -> Rect {
        Rect::new(self.x - dx, self.y, self.width + 2.0 * dx, self.height)
    }

    /// Change the height keeping the bottom edge where it is.
    pub fn resize_height_keep_bottom(&mut self, height: f32) {
        let bottom = self.bottom();
        self.height = height;
        self.set_bottom(bottom);
    }
}

// ── Contacts ──────────────────────────────────────────────────────────────────

/// Which sides touched an obstacle during one resolution pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contacts {
    pub left: bool,
    pub right: bool,
    pub below: bool,
    pub above: bool,
    /// Index of a breakable block hit from below during this pass.
    pub struck: Option<usize>,
}

impl Contacts {
    pub fn lateral(&self) -> bool {
        self.left || self.right
    }
}

// ── Per-axis passes ───────────────────────────────────────────────────────────

/// Apply `velocity_x` and push the actor out of every obstacle it now
/// overlaps. Horizontal velocity is left untouched on contact.
pub fn resolve_horizontal(actor: &mut Actor, obstacles: &[Obstacle], contacts: &mut Contacts) {
    actor.rect.x += actor.velocity_x;
    for obstacle in obstacles {
        if !actor.rect.overlaps(&obstacle.rect) {
            continue;
        }
        if actor.velocity_x > 0.0 {
            actor.rect.set_right(obstacle.rect.left());
            contacts.right = true;
        } else if actor.velocity_x < 0.0 {
            actor.rect.x = obstacle.rect.right();
            contacts.left = true;
        }
    }
}

/// Apply `velocity_y` and push the actor out of every obstacle it now
/// overlaps. Clears and re-derives `on_ground`.
pub fn resolve_vertical(actor: &mut Actor, obstacles: &[Obstacle], contacts: &mut Contacts) {
    actor.on_ground = false;
    actor.previous_bottom = actor.rect.bottom();
    actor.rect.y += actor.velocity_y;
    for (index, obstacle) in obstacles.iter().enumerate() {
        if !actor.rect.overlaps(&obstacle.rect) {
            continue;
        }
        if actor.velocity_y > 0.0 {
            actor.rect.set_bottom(obstacle.rect.top());
            actor.velocity_y = 0.0;
            actor.on_ground = true;
            contacts.below = true;
        } else if actor.velocity_y < 0.0 {
            actor.rect.y = obstacle.rect.bottom();
            actor.velocity_y = 0.0;
            contacts.above = true;
            if obstacle.is_breakable() && !obstacle.struck {
                contacts.struck = Some(index);
            }
        }
    }
}

// ── Full resolution ───────────────────────────────────────────────────────────

/// Resolve a body that does not interact with blocks (enemies, items,
/// projectiles). Obstacles are only read.
pub fn resolve_body(actor: &mut Actor, obstacles: &[Obstacle]) -> Contacts {
    let mut contacts = Contacts::default();
    resolve_horizontal(actor, obstacles, &mut contacts);
    resolve_vertical(actor, obstacles, &mut contacts);
    contacts
}

/// Resolve an actor that can strike breakable blocks from below. A struck
/// block gets its one-shot `struck` flag set.
pub fn resolve(actor: &mut Actor, obstacles: &mut [Obstacle]) -> Contacts {
    let contacts = resolve_body(actor, obstacles);
    if let Some(index) = contacts.struck {
        if let Some(block) = obstacles.get_mut(index) {
            block.struck = true;
        }
    }
    contacts
}
