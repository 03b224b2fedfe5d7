//! Level content: the static layout data a level is built from, and the live
//! entity collections the session mutates during play.

use serde::{Deserialize, Serialize};

use crate::enemy::{Enemy, EnemyKind};
use crate::entities::{
    BarrierOwner, Coin, Fireball, GateId, Obstacle, ObstacleKind, PowerUpItem, PowerUpKind,
};
use crate::error::LayoutError;
use crate::gate::{self, Boss, Gate, GateKind};
use crate::geometry::Rect;

pub const COIN_SIZE: f32 = 20.0;
pub const COIN_POINTS: u32 = 200;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub rect: Rect,
    pub kind: ObstacleKind,
    #[serde(default)]
    pub owner: Option<BarrierOwner>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub kind: EnemyKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateSpec {
    pub id: GateId,
    pub x: f32,
    pub y: f32,
    pub kind: GateKind,
    #[serde(default)]
    pub keys_required: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemSpawn {
    pub x: f32,
    pub y: f32,
    pub kind: PowerUpKind,
}

/// Everything needed to (re)build a level. Pure data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub number: u32,
    pub world_width: f32,
    pub spawn: (f32, f32),
    pub obstacles: Vec<ObstacleSpec>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub gates: Vec<GateSpec>,
    #[serde(default)]
    pub coins: Vec<(f32, f32)>,
    #[serde(default)]
    pub power_ups: Vec<ItemSpawn>,
    #[serde(default)]
    pub boss: Option<(f32, f32)>,
    pub goal: Rect,
    /// Seconds on the level clock.
    pub time_limit: u32,
}

impl LevelLayout {
    /// Check that gate ids are positional and that every barrier belongs to
    /// something that can remove it.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (index, gate) in self.gates.iter().enumerate() {
            if gate.id != GateId(index) {
                return Err(LayoutError::GateIdMismatch {
                    expected: GateId(index),
                    found: gate.id,
                });
            }
        }
        for obstacle in &self.obstacles {
            match obstacle.owner {
                Some(BarrierOwner::Gate(id)) => {
                    let gate = self.gates.get(id.0).ok_or(LayoutError::UnknownGate(id))?;
                    if !gate.kind.blocks_progress() {
                        return Err(LayoutError::OptionalGateBarrier(id));
                    }
                }
                Some(BarrierOwner::Boss) if self.boss.is_none() => {
                    return Err(LayoutError::BossBarrierWithoutBoss);
                }
                _ => {}
            }
        }
        Ok(())
    }
}

// ── Live level ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Level {
    pub number: u32,
    pub world_width: f32,
    pub spawn: (f32, f32),
    pub obstacles: Vec<Obstacle>,
    pub enemies: Vec<Enemy>,
    pub gates: Vec<Gate>,
    pub coins: Vec<Coin>,
    pub items: Vec<PowerUpItem>,
    pub fireballs: Vec<Fireball>,
    pub boss: Option<Boss>,
    pub goal: Rect,
    pub time_limit: u32,
}

impl Level {
    pub fn build(layout: &LevelLayout) -> Result<Self, LayoutError> {
        layout.validate()?;
        let obstacles = layout
            .obstacles
            .iter()
            .map(|spec| Obstacle {
                owner: spec.owner,
                ..Obstacle::new(spec.rect, spec.kind)
            })
            .collect();
        let enemies = layout
            .enemies
            .iter()
            .map(|s| Enemy::new(s.x, s.y, s.kind))
            .collect();
        let gates = layout
            .gates
            .iter()
            .map(|g| Gate::new(g.id, g.x, g.y, g.kind, g.keys_required))
            .collect();
        let coins = layout
            .coins
            .iter()
            .map(|&(x, y)| Coin {
                rect: Rect::new(x, y, COIN_SIZE, COIN_SIZE),
                value: COIN_POINTS,
            })
            .collect();
        let items = layout
            .power_ups
            .iter()
            .map(|s| PowerUpItem::placed(s.x, s.y, s.kind))
            .collect();

        Ok(Self {
            number: layout.number,
            world_width: layout.world_width,
            spawn: layout.spawn,
            obstacles,
            enemies,
            gates,
            coins,
            items,
            fireballs: Vec::new(),
            boss: layout.boss.map(|(x, y)| Boss::new(x, y)),
            goal: layout.goal,
            time_limit: layout.time_limit,
        })
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id.0)
    }

    /// Barriers still standing for `owner`.
    pub fn barrier_count(&self, owner: BarrierOwner) -> usize {
        self.obstacles
            .iter()
            .filter(|o| o.owner == Some(owner))
            .count()
    }

    /// Open gate `id` and drop its barriers. Returns how many barriers went,
    /// or `None` if there is no such gate or it was already open.
    pub fn open_gate(&mut self, id: GateId) -> Option<usize> {
        let target = self.gates.get_mut(id.0)?;
        if !target.open() {
            return None;
        }
        Some(gate::remove_barriers(
            &mut self.obstacles,
            BarrierOwner::Gate(id),
        ))
    }

    /// Mark the boss defeated and drop its barriers. Returns how many
    /// barriers went.
    pub fn clear_boss(&mut self) -> usize {
        if let Some(boss) = self.boss.as_mut() {
            boss.health = 0;
            boss.defeated = true;
            boss.active = false;
        }
        gate::remove_barriers(&mut self.obstacles, BarrierOwner::Boss)
    }
}

// ── Built-in levels ───────────────────────────────────────────────────────────

const GROUND_Y: f32 = 536.0;
const GROUND_HEIGHT: f32 = 64.0;
const BARRIER_WIDTH: f32 = 20.0;

/// Number of levels shipped with the game.
pub const BUILTIN_LEVELS: u32 = 3;

fn ground(x: f32, width: f32) -> ObstacleSpec {
    ObstacleSpec {
        rect: Rect::new(x, GROUND_Y, width, GROUND_HEIGHT),
        kind: ObstacleKind::Ground,
        owner: None,
    }
}

fn platform(x: f32, y: f32, width: f32) -> ObstacleSpec {
    ObstacleSpec {
        rect: Rect::new(x, y, width, 20.0),
        kind: ObstacleKind::Platform,
        owner: None,
    }
}

fn pipe(x: f32, height: f32) -> ObstacleSpec {
    ObstacleSpec {
        rect: Rect::new(x, GROUND_Y - height, 64.0, height),
        kind: ObstacleKind::Pipe,
        owner: None,
    }
}

fn block(x: f32, y: f32, contents: Option<PowerUpKind>) -> ObstacleSpec {
    ObstacleSpec {
        rect: Rect::new(x, y, 32.0, 32.0),
        kind: ObstacleKind::Block { contents },
        owner: None,
    }
}

/// Full-height wall from the top of the world down to the ground.
fn barrier(x: f32, owner: BarrierOwner) -> ObstacleSpec {
    ObstacleSpec {
        rect: Rect::new(x, 0.0, BARRIER_WIDTH, GROUND_Y),
        kind: ObstacleKind::Barrier,
        owner: Some(owner),
    }
}

fn gate(id: usize, x: f32, kind: GateKind, keys_required: u32) -> GateSpec {
    GateSpec {
        id: GateId(id),
        x,
        y: GROUND_Y - crate::gate::GATE_HEIGHT,
        kind,
        keys_required,
    }
}

fn enemy(x: f32, kind: EnemyKind) -> EnemySpawn {
    EnemySpawn {
        x,
        y: GROUND_Y - kind.size().1,
        kind,
    }
}

fn coin_row(x: f32, y: f32, count: usize) -> Vec<(f32, f32)> {
    (0..count).map(|i| (x + i as f32 * 30.0, y)).collect()
}

fn goal(x: f32) -> Rect {
    Rect::new(x, GROUND_Y - 160.0, 20.0, 160.0)
}

/// A built-in level layout, `None` past the last one.
pub fn builtin(number: u32) -> Option<LevelLayout> {
    let spawn = (64.0, GROUND_Y - 32.0);
    let layout = match number {
        1 => LevelLayout {
            number,
            world_width: 3200.0,
            spawn,
            obstacles: vec![
                ground(0.0, 1200.0),
                ground(1300.0, 1900.0),
                block(360.0, 400.0, Some(PowerUpKind::Mushroom)),
                block(392.0, 400.0, None),
                block(424.0, 400.0, Some(PowerUpKind::Flower)),
                platform(520.0, 440.0, 96.0),
                pipe(980.0, 64.0),
                barrier(760.0, BarrierOwner::Gate(GateId(0))),
                barrier(1960.0, BarrierOwner::Gate(GateId(2))),
                barrier(2660.0, BarrierOwner::Gate(GateId(3))),
            ],
            enemies: vec![
                enemy(600.0, EnemyKind::Weak),
                enemy(1100.0, EnemyKind::Armored),
                enemy(1650.0, EnemyKind::Weak),
                enemy(2300.0, EnemyKind::Weak),
            ],
            gates: vec![
                gate(0, 700.0, GateKind::Mandatory, 0),
                gate(1, 1500.0, GateKind::SecretOptional, 0),
                gate(2, 1900.0, GateKind::SpecialKey, 0),
                gate(3, 2600.0, GateKind::Mandatory, 1),
            ],
            coins: [
                coin_row(360.0, 340.0, 3),
                coin_row(1350.0, 480.0, 5),
                coin_row(2100.0, 480.0, 5),
            ]
            .concat(),
            power_ups: vec![ItemSpawn {
                x: 2400.0,
                y: GROUND_Y - 24.0,
                kind: PowerUpKind::Star,
            }],
            boss: None,
            goal: goal(3100.0),
            time_limit: 400,
        },
        2 => LevelLayout {
            number,
            world_width: 3000.0,
            spawn,
            obstacles: vec![
                ground(0.0, 900.0),
                ground(1000.0, 800.0),
                ground(1900.0, 1100.0),
                platform(880.0, 430.0, 140.0),
                block(500.0, 400.0, Some(PowerUpKind::Star)),
                block(1400.0, 400.0, Some(PowerUpKind::Mushroom)),
                pipe(700.0, 96.0),
                pipe(1600.0, 64.0),
                barrier(1260.0, BarrierOwner::Gate(GateId(0))),
                barrier(2260.0, BarrierOwner::Gate(GateId(2))),
            ],
            enemies: vec![
                enemy(450.0, EnemyKind::Armored),
                enemy(1150.0, EnemyKind::Weak),
                enemy(1500.0, EnemyKind::Weak),
                enemy(2000.0, EnemyKind::Armored),
                enemy(2500.0, EnemyKind::Weak),
            ],
            gates: vec![
                gate(0, 1200.0, GateKind::SpecialKey, 0),
                gate(1, 1750.0, GateKind::BonusOptional, 0),
                gate(2, 2200.0, GateKind::Mandatory, 1),
            ],
            coins: [coin_row(880.0, 380.0, 5), coin_row(2400.0, 480.0, 6)].concat(),
            power_ups: Vec::new(),
            boss: None,
            goal: goal(2900.0),
            time_limit: 400,
        },
        3 => LevelLayout {
            number,
            world_width: 3000.0,
            spawn,
            obstacles: vec![
                ground(0.0, 3000.0),
                block(400.0, 400.0, Some(PowerUpKind::Flower)),
                platform(1000.0, 430.0, 128.0),
                pipe(1400.0, 96.0),
                barrier(860.0, BarrierOwner::Gate(GateId(0))),
                barrier(2560.0, BarrierOwner::Boss),
            ],
            enemies: vec![
                enemy(650.0, EnemyKind::Weak),
                enemy(1200.0, EnemyKind::Armored),
                enemy(1700.0, EnemyKind::Armored),
            ],
            gates: vec![
                gate(0, 800.0, GateKind::SpecialKey, 0),
                gate(1, 1900.0, GateKind::BonusOptional, 0),
            ],
            coins: coin_row(1000.0, 380.0, 4),
            power_ups: Vec::new(),
            boss: Some((2400.0, GROUND_Y - crate::gate::BOSS_HEIGHT)),
            goal: goal(2900.0),
            time_limit: 400,
        },
        _ => return None,
    };
    Some(layout)
}
