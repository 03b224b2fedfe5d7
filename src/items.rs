//! Power-up items and fireballs: small actors that reuse the enemy patrol
//! and the shared resolver.

use crate::actor::Actor;
use crate::config::GameConfig;
use crate::enemy::patrol;
use crate::entities::{Facing, Fireball, Obstacle, PowerUpItem, PowerUpKind};
use crate::geometry::{self, Rect};

pub const ITEM_SIZE: f32 = 24.0;
/// Frames an item spends rising out of its block.
pub const EMERGE_FRAMES: u32 = 30;
pub const ITEM_SPEED: f32 = 2.0;
pub const STAR_BOUNCE: f32 = -8.0;

pub const FIREBALL_SIZE: f32 = 12.0;
pub const FIREBALL_SPEED: f32 = 10.0;
pub const FIREBALL_LIFT: f32 = -2.0;
pub const FIREBALL_GRAVITY: f32 = 0.3;
pub const FIREBALL_BOUNCE: f32 = -5.0;
pub const FIREBALL_LIFETIME: u32 = 300;

impl PowerUpItem {
    /// An item rising out of the block whose rect is `block`.
    pub fn from_block(block: &Rect, kind: PowerUpKind) -> Self {
        let rect = Rect::new(
            block.center_x() - ITEM_SIZE / 2.0,
            block.top() - ITEM_SIZE,
            ITEM_SIZE,
            ITEM_SIZE,
        );
        Self {
            actor: Actor::with_velocity(rect, ITEM_SPEED, 0.0),
            kind,
            emerge_frames: EMERGE_FRAMES,
            collected: false,
        }
    }

    /// An item that starts active, e.g. placed by the level.
    pub fn placed(x: f32, y: f32, kind: PowerUpKind) -> Self {
        let rect = Rect::new(x, y, ITEM_SIZE, ITEM_SIZE);
        Self {
            actor: Actor::with_velocity(rect, ITEM_SPEED, 0.0),
            kind,
            emerge_frames: 0,
            collected: false,
        }
    }

    /// Still rising out of its block and not yet collectable.
    pub fn is_emerging(&self) -> bool {
        self.emerge_frames > 0
    }

    /// Returns `false` once the item should be removed.
    pub fn update(&mut self, obstacles: &[Obstacle], config: &GameConfig) -> bool {
        if self.collected {
            return false;
        }
        if self.is_emerging() {
            self.emerge_frames -= 1;
            self.actor.rect.y -= 1.0;
            return true;
        }
        let physics = &config.physics;
        self.actor
            .apply_gravity(physics.gravity, physics.max_fall_speed);
        let contacts = patrol(&mut self.actor, obstacles);
        if contacts.below && self.kind == PowerUpKind::Star {
            self.actor.velocity_y = STAR_BOUNCE;
        }
        !self
            .actor
            .below(physics.world_height + physics.despawn_margin)
    }
}

impl Fireball {
    /// Thrown from the avatar's side in the direction it faces.
    pub fn thrown_from(owner: &Rect, facing: Facing) -> Self {
        let x = match facing {
            Facing::Right => owner.right(),
            Facing::Left => owner.left() - FIREBALL_SIZE,
        };
        let rect = Rect::new(x, owner.center_y(), FIREBALL_SIZE, FIREBALL_SIZE);
        Self {
            actor: Actor::with_velocity(rect, FIREBALL_SPEED * facing.sign(), FIREBALL_LIFT),
            age: 0,
            alive: true,
        }
    }

    /// Returns `false` once the fireball is spent.
    pub fn update(&mut self, obstacles: &[Obstacle], config: &GameConfig) -> bool {
        if !self.alive {
            return false;
        }
        self.age += 1;
        self.actor
            .apply_gravity(FIREBALL_GRAVITY, config.physics.max_fall_speed);
        let contacts = geometry::resolve_body(&mut self.actor, obstacles);
        if contacts.below {
            self.actor.velocity_y = FIREBALL_BOUNCE;
        }
        if contacts.lateral()
            || self.age > FIREBALL_LIFETIME
            || self.actor.rect.right() < 0.0
            || self.actor.below(config.physics.world_height)
        {
            self.alive = false;
        }
        self.alive
    }
}
