//! Quiz-gated checkpoints, the barriers they own, the key wallet and the
//! end-of-level boss that guards its own barriers.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::entities::{BarrierOwner, GateId, Obstacle};
use crate::geometry::Rect;

pub const GATE_WIDTH: f32 = 60.0;
pub const GATE_HEIGHT: f32 = 80.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Must be passed to finish the level.
    Mandatory,
    SecretOptional,
    BonusOptional,
    /// Passing it earns a key for later gates.
    SpecialKey,
}

impl GateKind {
    /// Only these kinds may own barriers, and only their wrong answers cost
    /// a life.
    pub fn blocks_progress(self) -> bool {
        matches!(self, GateKind::Mandatory | GateKind::SpecialKey)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    pub id: GateId,
    pub rect: Rect,
    pub kind: GateKind,
    pub keys_required: u32,
    pub is_open: bool,
    pub is_locked: bool,
}

impl Gate {
    pub fn new(id: GateId, x: f32, y: f32, kind: GateKind, keys_required: u32) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, GATE_WIDTH, GATE_HEIGHT),
            kind,
            keys_required,
            is_open: false,
            is_locked: true,
        }
    }

    /// May a question be asked for this gate right now?
    pub fn can_attempt(&self, keys_held: u32) -> bool {
        !self.is_open && keys_held >= self.keys_required
    }

    /// Open for good. Returns `false` if it was already open.
    pub fn open(&mut self) -> bool {
        if self.is_open {
            return false;
        }
        self.is_open = true;
        self.is_locked = false;
        debug!("gate {:?} ({:?}) opened", self.id, self.kind);
        true
    }
}

/// Keys earned at special-key gates during one play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyWallet {
    keys: u32,
}

impl KeyWallet {
    pub fn held(&self) -> u32 {
        self.keys
    }

    /// Add one key and return the new total.
    pub fn add(&mut self) -> u32 {
        self.keys += 1;
        self.keys
    }
}

/// Delete every barrier tagged with `owner`. Returns how many went.
pub fn remove_barriers(obstacles: &mut Vec<Obstacle>, owner: BarrierOwner) -> usize {
    let before = obstacles.len();
    obstacles.retain(|o| o.owner != Some(owner));
    let removed = before - obstacles.len();
    debug!("removed {removed} barrier(s) owned by {owner:?}");
    removed
}

// ── Boss ──────────────────────────────────────────────────────────────────────

pub const BOSS_WIDTH: f32 = 100.0;
pub const BOSS_HEIGHT: f32 = 120.0;
pub const BOSS_HEALTH: u32 = 5;

/// End-of-level guardian worn down by correct answers. It owns the
/// `BarrierOwner::Boss` barriers the same way a gate owns its own.
#[derive(Clone, Debug)]
pub struct Boss {
    pub rect: Rect,
    pub health: u32,
    pub max_health: u32,
    pub active: bool,
    pub defeated: bool,
}

impl Boss {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, BOSS_WIDTH, BOSS_HEIGHT),
            health: BOSS_HEALTH,
            max_health: BOSS_HEALTH,
            active: false,
            defeated: false,
        }
    }

    /// Wake up once the avatar comes within `range` horizontally. Stays
    /// awake afterwards.
    pub fn watch(&mut self, avatar_center_x: f32, range: f32) -> bool {
        if !self.active && !self.defeated && (self.rect.center_x() - avatar_center_x).abs() <= range {
            self.active = true;
            info!("boss awakened");
        }
        self.active
    }

    /// Area in which interacting starts a boss question.
    pub fn reach(&self, margin: f32) -> Rect {
        self.rect.widened(margin)
    }

    /// Take one hit from a correct answer. Returns `true` on the hit that
    /// defeats it.
    pub fn damage(&mut self) -> bool {
        if self.defeated {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.defeated = true;
            self.active = false;
            info!("boss defeated");
            return true;
        }
        debug!("boss hit, {} health left", self.health);
        false
    }
}
