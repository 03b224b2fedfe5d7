//! Patrolling foes: walk, turn around at walls, fall with gravity.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::config::GameConfig;
use crate::entities::Obstacle;
use crate::geometry::{self, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Small and quick.
    Weak,
    /// Taller, slower and worth more.
    Armored,
}

impl EnemyKind {
    pub fn size(self) -> (f32, f32) {
        match self {
            EnemyKind::Weak => (30.0, 30.0),
            EnemyKind::Armored => (32.0, 40.0),
        }
    }

    pub fn patrol_speed(self) -> f32 {
        match self {
            EnemyKind::Weak => 2.0,
            EnemyKind::Armored => 1.0,
        }
    }

    /// Score for landing on it.
    pub fn stomp_points(self) -> u32 {
        match self {
            EnemyKind::Weak => 100,
            EnemyKind::Armored => 200,
        }
    }

    /// Score for a fireball or invincible touch.
    pub fn destroy_points(self) -> u32 {
        match self {
            EnemyKind::Weak => 200,
            EnemyKind::Armored => 400,
        }
    }
}

/// Height of a flattened enemy.
pub const CRUSHED_HEIGHT: f32 = 15.0;
/// Frames a flattened enemy stays visible (one second).
pub const CRUSHED_FRAMES: u32 = 60;

#[derive(Clone, Debug)]
pub struct Enemy {
    pub actor: Actor,
    pub kind: EnemyKind,
    pub alive: bool,
    pub crushed: bool,
    pub crushed_timer: u32,
    pub animation_frame: u32,
    animation_counter: u32,
}

impl Enemy {
    /// Spawn at `(x, y)` walking left.
    pub fn new(x: f32, y: f32, kind: EnemyKind) -> Self {
        let (width, height) = kind.size();
        let rect = Rect::new(x, y, width, height);
        Self {
            actor: Actor::with_velocity(rect, -kind.patrol_speed(), 0.0),
            kind,
            alive: true,
            crushed: false,
            crushed_timer: 0,
            animation_frame: 0,
            animation_counter: 0,
        }
    }

    pub fn rect(&self) -> &Rect {
        &self.actor.rect
    }

    /// Alive and not flattened: can hurt the avatar and be defeated.
    pub fn is_hostile(&self) -> bool {
        self.alive && !self.crushed
    }

    /// Patrol step. Returns `false` once the enemy should be removed.
    pub fn update(&mut self, obstacles: &[Obstacle], config: &GameConfig) -> bool {
        if !self.alive {
            return false;
        }
        let physics = &config.physics;
        if self.actor.below(physics.world_height + physics.despawn_margin) {
            debug!("{:?} fell out of the world", self.kind);
            self.alive = false;
            return false;
        }
        if self.crushed {
            self.crushed_timer += 1;
            if self.crushed_timer > CRUSHED_FRAMES {
                self.alive = false;
            }
            return self.alive;
        }

        self.animation_counter += 1;
        if self.animation_counter > 8 {
            self.animation_frame = (self.animation_frame + 1) % 2;
            self.animation_counter = 0;
        }

        self.actor
            .apply_gravity(physics.gravity, physics.max_fall_speed);
        patrol(&mut self.actor, obstacles);
        true
    }

    /// Flatten after a stomp. Returns the points earned, zero if it was
    /// already flat or gone.
    pub fn crush(&mut self) -> u32 {
        if !self.is_hostile() {
            return 0;
        }
        self.crushed = true;
        self.actor.velocity_x = 0.0;
        self.actor.rect.resize_height_keep_bottom(CRUSHED_HEIGHT);
        self.kind.stomp_points()
    }

    /// Remove immediately. Returns the points earned, zero if already gone.
    pub fn destroy(&mut self) -> u32 {
        if !self.alive {
            return 0;
        }
        self.alive = false;
        self.kind.destroy_points()
    }
}

/// Move with the shared resolver and reverse direction on any wall contact.
/// Power-up items walk the same way.
pub fn patrol(actor: &mut Actor, obstacles: &[Obstacle]) -> geometry::Contacts {
    let contacts = geometry::resolve_body(actor, obstacles);
    if contacts.right {
        actor.velocity_x = -actor.velocity_x.abs();
    } else if contacts.left {
        actor.velocity_x = actor.velocity_x.abs();
    }
    contacts
}
