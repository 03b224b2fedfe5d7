//! Plain level entities: obstacles, collectibles and projectiles.
//! The behaviour of the bigger actors lives in their own modules.

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Grows a Small avatar to Big for a limited time.
    Mushroom,
    /// Grants Fire for a limited time.
    Flower,
    /// Grants the Invincible state for a limited time.
    Star,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(pub usize);

/// What a barrier obstacle belongs to. Removing the owner's barriers is the
/// only way through them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarrierOwner {
    Gate(GateId),
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Ground,
    Platform,
    Pipe,
    /// Breakable block, optionally holding a power-up released when struck.
    Block { contents: Option<PowerUpKind> },
    /// Full-height wall owned by a gate or the boss.
    Barrier,
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
    pub owner: Option<BarrierOwner>,
    /// Set once when the block is hit from below.
    pub struck: bool,
    /// Set once the block's contents have been handed out.
    pub released: bool,
}

impl Obstacle {
    pub fn new(rect: Rect, kind: ObstacleKind) -> Self {
        Self {
            rect,
            kind,
            owner: None,
            struck: false,
            released: false,
        }
    }

    pub fn barrier(rect: Rect, owner: BarrierOwner) -> Self {
        Self {
            owner: Some(owner),
            ..Self::new(rect, ObstacleKind::Barrier)
        }
    }

    pub fn is_breakable(&self) -> bool {
        matches!(self.kind, ObstacleKind::Block { .. })
    }

    /// The power-up waiting to be released, if the block was struck and still
    /// holds one.
    pub fn pending_release(&self) -> Option<PowerUpKind> {
        match self.kind {
            ObstacleKind::Block { contents: Some(kind) } if self.struck && !self.released => {
                Some(kind)
            }
            _ => None,
        }
    }
}

// ── Collectibles ──────────────────────────────────────────────────────────────

/// A power-up released from a block or placed on the ground.
#[derive(Clone, Debug)]
pub struct PowerUpItem {
    pub actor: Actor,
    pub kind: PowerUpKind,
    /// Frames left rising out of the block; the item is inert until zero.
    pub emerge_frames: u32,
    pub collected: bool,
}

#[derive(Clone, Debug)]
pub struct Coin {
    pub rect: Rect,
    pub value: u32,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Thrown by the avatar in the Fire state.
#[derive(Clone, Debug)]
pub struct Fireball {
    pub actor: Actor,
    pub age: u32,
    pub alive: bool,
}

// ── Session status ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Paused,
    LevelComplete,
    GameOver,
}
