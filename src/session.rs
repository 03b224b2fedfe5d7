//! One play-through: owns the live level, the avatar, the key wallet and the
//! quiz collaborator, and drives the per-frame update order.
//!
//! A tick runs input edges, the level clock, avatar physics, projectiles and
//! items, enemy physics, combat, pickups, the quiz and gate checks, then the
//! goal test. Every change of interest is returned as a [`GameEvent`].

use log::{debug, info};

use crate::avatar::{Avatar, AvatarState};
use crate::combat::{self, CombatOutcome};
use crate::config::GameConfig;
use crate::entities::{Fireball, GameStatus, GateId, PowerUpItem};
use crate::error::LayoutError;
use crate::events::{GameEvent, SpawnKind};
use crate::gate::{GateKind, KeyWallet};
use crate::input::{FrameInput, InputTracker, Pressed};
use crate::level::{Level, LevelLayout};
use crate::quiz::{Challenge, Quiz, QuizResult, QuizStats};

/// Points for collecting a power-up.
pub const POWER_UP_POINTS: u32 = 1000;

/// A question handed to the quiz collaborator. It turns `stale` when the
/// level is reset while it is still open: the result is still collected, so
/// the collaborator is free to ask again, but it is never applied.
#[derive(Clone, Copy, Debug)]
struct PendingQuestion {
    challenge: Challenge,
    stale: bool,
}

pub struct LevelSession<Q: Quiz> {
    pub level: Level,
    pub avatar: Avatar,
    pub wallet: KeyWallet,
    pub stats: QuizStats,
    config: GameConfig,
    /// What a lost life resets the level to: the layout as built, with every
    /// gate opened and any boss defeated since then.
    initial: Level,
    quiz: Q,
    input: InputTracker,
    lives: u32,
    score: u32,
    coins: u32,
    status: GameStatus,
    frame: u64,
    time_left: u32,
    time_counter: u32,
    death_timer: u32,
    pending: Option<PendingQuestion>,
}

impl<Q: Quiz> LevelSession<Q> {
    pub fn new(layout: &LevelLayout, config: GameConfig, quiz: Q) -> Result<Self, LayoutError> {
        let level = Level::build(layout)?;
        let avatar = Avatar::new(level.spawn.0, level.spawn.1, &config);
        info!("starting level {}", level.number);
        Ok(Self {
            time_left: level.time_limit,
            initial: level.clone(),
            level,
            avatar,
            wallet: KeyWallet::default(),
            stats: QuizStats::default(),
            lives: config.session.lives,
            config,
            quiz,
            input: InputTracker::default(),
            score: 0,
            coins: 0,
            status: GameStatus::Playing,
            frame: 0,
            time_counter: 0,
            death_timer: 0,
            pending: None,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn quiz(&self) -> &Q {
        &self.quiz
    }

    pub fn quiz_mut(&mut self) -> &mut Q {
        &mut self.quiz
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds left on the level clock.
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// The question currently in flight, if any. A question asked before
    /// the last reset does not count.
    pub fn pending_challenge(&self) -> Option<Challenge> {
        self.pending.filter(|p| !p.stale).map(|p| p.challenge)
    }

    // ── Flow control ──────────────────────────────────────────────────────────

    /// Flip between Playing and Paused; any other status is left alone.
    pub fn toggle_pause(&mut self) -> GameStatus {
        self.status = match self.status {
            GameStatus::Playing => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Playing,
            other => other,
        };
        self.status
    }

    /// Move on to `layout`, keeping score, lives, coins, keys and statistics.
    pub fn advance(&mut self, layout: &LevelLayout) -> Result<(), LayoutError> {
        self.load(layout)?;
        info!("advancing to level {}", self.level.number);
        Ok(())
    }

    /// Start over from `layout` with a fresh score, lives, keys and statistics.
    pub fn restart(&mut self, layout: &LevelLayout) -> Result<(), LayoutError> {
        self.load(layout)?;
        self.lives = self.config.session.lives;
        self.score = 0;
        self.coins = 0;
        self.wallet = KeyWallet::default();
        self.stats = QuizStats::default();
        info!("restarted at level {}", self.level.number);
        Ok(())
    }

    fn load(&mut self, layout: &LevelLayout) -> Result<(), LayoutError> {
        let level = Level::build(layout)?;
        self.initial = level.clone();
        self.level = level;
        self.status = GameStatus::Playing;
        self.reset_level_state();
        Ok(())
    }

    /// Put the avatar back at the spawn point and clear per-attempt state.
    fn reset_level_state(&mut self) {
        self.avatar = Avatar::new(self.level.spawn.0, self.level.spawn.1, &self.config);
        self.time_left = self.level.time_limit;
        self.time_counter = 0;
        self.death_timer = 0;
        if let Some(question) = self.pending.as_mut() {
            question.stale = true;
        }
    }

    /// Take a life. At zero the game is over; otherwise the level goes back
    /// to its checkpoint and the avatar respawns. Keys, open gates and a
    /// defeated boss are kept.
    pub fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        info!("life lost, {} left", self.lives);
        events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.game_over(events);
            return;
        }
        self.level = self.initial.clone();
        self.reset_level_state();
    }

    fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        self.status = GameStatus::GameOver;
        info!("game over with score {}", self.score);
        events.push(GameEvent::GameOver { score: self.score });
    }

    /// A wrong answer against the boss: a life, a shove away from the boss
    /// and a short immunity window. The level is not reset.
    pub fn apply_boss_penalty(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        info!("boss penalty, {} lives left", self.lives);
        events.push(GameEvent::BossPenalty {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.game_over(events);
            return;
        }
        if let Some(boss) = &self.level.boss {
            combat::knock_back(
                &mut self.avatar,
                boss.rect.center_x(),
                self.config.combat.boss_knockback_distance,
                self.config.combat.knockback_lift,
                &self.level.obstacles,
            );
        }
        self.avatar
            .grant_immunity(self.config.avatar.immunity_duration);
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    /// Advance the session by one frame.
    pub fn tick(&mut self, input: FrameInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.status != GameStatus::Playing {
            return events;
        }
        let pressed = self.input.advance(input);
        self.frame += 1;

        if self.pending_challenge().is_some() && self.config.session.freeze_during_quiz {
            self.poll_quiz(&mut events);
            return events;
        }

        if !self.avatar.is_dying() {
            self.tick_clock(&mut events);
        }

        self.avatar.update(
            &input,
            &pressed,
            &mut self.level.obstacles,
            &self.config,
            &mut events,
        );
        if self.avatar.is_dying() {
            self.death_timer += 1;
            if self.death_timer >= self.config.avatar.death_pause {
                self.lose_life(&mut events);
                return events;
            }
        }

        self.throw_fireball(&pressed, &mut events);
        self.release_blocks(&mut events);
        self.update_actors(&mut events);
        self.resolve_combat(&mut events);
        self.collect_pickups(&mut events);

        if self.pending.is_some() {
            self.poll_quiz(&mut events);
        } else if pressed.interact && self.avatar.is_active() {
            self.interact(&mut events);
        }

        if self.avatar.is_active() && self.avatar.rect().overlaps(&self.level.goal) {
            self.complete_level(&mut events);
        }
        events
    }

    fn tick_clock(&mut self, events: &mut Vec<GameEvent>) {
        self.time_counter += 1;
        if self.time_counter < self.config.session.frame_rate {
            return;
        }
        self.time_counter = 0;
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            info!("level clock ran out");
            self.avatar.die(&self.config, events);
        }
    }

    fn throw_fireball(&mut self, pressed: &Pressed, events: &mut Vec<GameEvent>) {
        if !pressed.fire || self.avatar.state != AvatarState::Fire {
            return;
        }
        if self.level.fireballs.len() >= self.config.session.max_fireballs {
            return;
        }
        let fireball = Fireball::thrown_from(self.avatar.rect(), self.avatar.facing);
        events.push(GameEvent::EntitySpawned {
            kind: SpawnKind::Fireball,
            x: fireball.actor.rect.x,
            y: fireball.actor.rect.y,
        });
        self.level.fireballs.push(fireball);
    }

    /// Hand out the contents of blocks struck this frame, once each.
    fn release_blocks(&mut self, events: &mut Vec<GameEvent>) {
        for block in self.level.obstacles.iter_mut() {
            let Some(kind) = block.pending_release() else {
                continue;
            };
            block.released = true;
            let item = PowerUpItem::from_block(&block.rect, kind);
            debug!("block released {kind:?}");
            events.push(GameEvent::EntitySpawned {
                kind: SpawnKind::PowerUp(kind),
                x: item.actor.rect.x,
                y: item.actor.rect.y,
            });
            self.level.items.push(item);
        }
    }

    fn update_actors(&mut self, events: &mut Vec<GameEvent>) {
        let obstacles = &self.level.obstacles;
        let config = &self.config;
        self.level.enemies.retain_mut(|e| e.update(obstacles, config));
        self.level.items.retain_mut(|i| i.update(obstacles, config));
        self.level.fireballs.retain_mut(|f| f.update(obstacles, config));

        self.score += combat::resolve_fireballs(
            &mut self.level.fireballs,
            &mut self.level.enemies,
            events,
        );
        self.level.fireballs.retain(|f| f.alive);

        if let Some(boss) = self.level.boss.as_mut() {
            boss.watch(
                self.avatar.rect().center_x(),
                self.config.session.boss_activation_range,
            );
        }
    }

    fn resolve_combat(&mut self, events: &mut Vec<GameEvent>) {
        for enemy in self.level.enemies.iter_mut() {
            let outcome = combat::resolve_contact(
                &mut self.avatar,
                enemy,
                &self.level.obstacles,
                &self.config,
                events,
            );
            match outcome {
                CombatOutcome::Destroyed { points } | CombatOutcome::Stomped { points } => {
                    self.score += points;
                }
                CombatOutcome::Hit(_) | CombatOutcome::Skipped => {}
            }
        }
        self.level.enemies.retain(|e| e.alive);
    }

    fn collect_pickups(&mut self, events: &mut Vec<GameEvent>) {
        if !self.avatar.is_active() {
            return;
        }
        let reach = *self.avatar.rect();

        let mut collected = Vec::new();
        self.level.coins.retain(|coin| {
            if coin.rect.overlaps(&reach) {
                collected.push(coin.value);
                false
            } else {
                true
            }
        });
        for value in collected {
            self.coins += 1;
            self.score += value;
            events.push(GameEvent::CoinCollected { total: self.coins });
            let per_life = self.config.session.coins_per_life;
            if per_life > 0 && self.coins % per_life == 0 {
                self.lives += 1;
                info!("extra life from coins, {} lives", self.lives);
                events.push(GameEvent::ExtraLife);
            }
        }

        for item in self.level.items.iter_mut() {
            if item.collected || item.is_emerging() || !item.actor.rect.overlaps(&reach) {
                continue;
            }
            item.collected = true;
            self.avatar.collect(item.kind, &self.config, events);
            self.score += POWER_UP_POINTS;
            events.push(GameEvent::PowerUpCollected(item.kind));
        }
        self.level.items.retain(|i| !i.collected);
    }

    // ── Gates, boss and the quiz ──────────────────────────────────────────────

    /// The player signalled intent: try the gate or boss under the avatar.
    fn interact(&mut self, events: &mut Vec<GameEvent>) {
        let avatar = *self.avatar.rect();
        let keys_held = self.wallet.held();

        let gate = self
            .level
            .gates
            .iter()
            .find(|g| !g.is_open && g.rect.overlaps(&avatar));
        if let Some(gate) = gate {
            if !gate.can_attempt(keys_held) {
                info!(
                    "gate {:?} refused: {} key(s) held, {} required",
                    gate.id, keys_held, gate.keys_required
                );
                events.push(GameEvent::GateRefused {
                    gate: gate.id,
                    keys_held,
                    keys_required: gate.keys_required,
                });
                return;
            }
            let challenge = Challenge::Gate {
                id: gate.id,
                kind: gate.kind,
            };
            self.start_question(challenge, events);
            return;
        }

        let reach = self.config.session.boss_reach;
        let boss_in_reach = self
            .level
            .boss
            .as_ref()
            .is_some_and(|b| b.active && !b.defeated && b.reach(reach).overlaps(&avatar));
        if boss_in_reach {
            self.start_question(Challenge::Boss, events);
        }
    }

    fn start_question(&mut self, challenge: Challenge, events: &mut Vec<GameEvent>) {
        if !self.quiz.start_question(challenge, self.level.number) {
            debug!("quiz declined {challenge:?}");
            return;
        }
        info!("question started for {challenge:?}");
        self.pending = Some(PendingQuestion {
            challenge,
            stale: false,
        });
        events.push(GameEvent::QuestionStarted(challenge));
    }

    fn poll_quiz(&mut self, events: &mut Vec<GameEvent>) {
        let Some(question) = self.pending else {
            return;
        };
        let correct = match self.quiz.poll_result() {
            QuizResult::None => return,
            QuizResult::Correct => true,
            QuizResult::Incorrect => false,
        };
        self.pending = None;
        let challenge = question.challenge;
        if question.stale {
            debug!("dropped answer for {challenge:?} asked before the reset");
            return;
        }
        self.stats.record(correct);
        info!("answer for {challenge:?}: correct={correct}");
        events.push(GameEvent::QuestionAnswered { challenge, correct });

        match (challenge, correct) {
            (Challenge::Gate { id, .. }, true) => self.open_gate(id, events),
            (Challenge::Gate { kind, .. }, false) if kind.blocks_progress() => {
                self.lose_life(events);
            }
            (Challenge::Gate { .. }, false) => debug!("optional gate, no penalty"),
            (Challenge::Boss, true) => self.damage_boss(events),
            (Challenge::Boss, false) => self.apply_boss_penalty(events),
        }
    }

    fn open_gate(&mut self, id: GateId, events: &mut Vec<GameEvent>) {
        let Some(kind) = self.level.gate(id).map(|g| g.kind) else {
            debug!("result for missing gate {id:?} ignored");
            return;
        };
        let Some(removed) = self.level.open_gate(id) else {
            return;
        };
        self.initial.open_gate(id);
        info!("gate {id:?} ({kind:?}) opened, {removed} barrier(s) removed");
        events.push(GameEvent::GateOpened {
            gate: id,
            barriers_removed: removed,
        });
        if kind == GateKind::SpecialKey {
            let keys_held = self.wallet.add();
            info!("key earned, {keys_held} held");
            events.push(GameEvent::KeyEarned { keys_held });
        }
    }

    fn damage_boss(&mut self, events: &mut Vec<GameEvent>) {
        let Some(boss) = self.level.boss.as_mut() else {
            return;
        };
        if boss.defeated {
            return;
        }
        if boss.damage() {
            let removed = self.level.clear_boss();
            self.initial.clear_boss();
            events.push(GameEvent::BossDefeated {
                barriers_removed: removed,
            });
        } else {
            events.push(GameEvent::BossDamaged {
                health_left: boss.health,
            });
        }
    }

    fn complete_level(&mut self, events: &mut Vec<GameEvent>) {
        let time_bonus = self.time_left * self.config.session.time_bonus_per_second;
        self.score += time_bonus;
        self.status = GameStatus::LevelComplete;
        info!(
            "level {} complete, time bonus {time_bonus}",
            self.level.number
        );
        events.push(GameEvent::LevelComplete {
            level: self.level.number,
            time_bonus,
        });
    }
}
