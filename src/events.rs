//! Typed notifications emitted by a tick for render, audio and particle
//! collaborators. They describe what happened; they never feed back into the
//! simulation.

use crate::avatar::AvatarState;
use crate::enemy::EnemyKind;
use crate::entities::{GateId, PowerUpKind};
use crate::quiz::Challenge;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefeatKind {
    Stomped,
    /// Removed outright by a fireball or an invincible touch.
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    PowerUp(PowerUpKind),
    Fireball,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EntitySpawned {
        kind: SpawnKind,
        x: f32,
        y: f32,
    },
    EnemyDefeated {
        kind: EnemyKind,
        how: DefeatKind,
        points: u32,
    },
    AvatarStateChanged {
        from: AvatarState,
        to: AvatarState,
    },
    AvatarDied,
    LifeLost {
        lives_left: u32,
    },
    CoinCollected {
        total: u32,
    },
    ExtraLife,
    PowerUpCollected(PowerUpKind),
    /// The gate refused an attempt; a purely visual cue.
    GateRefused {
        gate: GateId,
        keys_held: u32,
        keys_required: u32,
    },
    QuestionStarted(Challenge),
    QuestionAnswered {
        challenge: Challenge,
        correct: bool,
    },
    GateOpened {
        gate: GateId,
        barriers_removed: usize,
    },
    KeyEarned {
        keys_held: u32,
    },
    BossDamaged {
        health_left: u32,
    },
    BossDefeated {
        barriers_removed: usize,
    },
    BossPenalty {
        lives_left: u32,
    },
    LevelComplete {
        level: u32,
        time_bonus: u32,
    },
    GameOver {
        score: u32,
    },
}
