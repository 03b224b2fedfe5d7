//! The player-controlled avatar and its power-up state machine.
//!
//! Size and ability are a single state. `Big` and `Fire` run on buff timers
//! that downgrade to `Small` when they reach zero; `Invincible` runs on the
//! shared immunity timer and hands back the state it interrupted. `Dying` is
//! terminal: the session takes a life and rebuilds the level afterwards.

use log::{debug, info};

use crate::actor::Actor;
use crate::config::GameConfig;
use crate::entities::{Facing, Obstacle, PowerUpKind};
use crate::events::GameEvent;
use crate::geometry::{self, Contacts, Rect};
use crate::input::{FrameInput, Pressed};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AvatarState {
    Small,
    Big,
    Fire,
    Invincible,
    Dying,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Immune, already dying or not alive: nothing changed.
    Ignored,
    /// Lost the buff and dropped to Small.
    Downgraded,
    Died,
}

#[derive(Clone, Debug)]
pub struct Avatar {
    pub actor: Actor,
    pub state: AvatarState,
    /// State handed back when the star runs out.
    pub previous_state: AvatarState,
    /// Buff timer of `previous_state`, held while the star is active.
    pub suspended_timer: u32,
    /// Frames of damage immunity; also counts down the star.
    pub invincibility_timer: u32,
    pub big_timer: u32,
    pub fire_timer: u32,
    pub alive: bool,
    pub facing: Facing,
    pub running: bool,
    pub animation_frame: u32,
    animation_counter: u32,
    tall: bool,
}

/// Count a timer down by one frame. Returns `true` only on the frame it
/// reaches zero; an idle timer stays at zero and never fires.
fn tick_down(timer: &mut u32) -> bool {
    if *timer == 0 {
        return false;
    }
    *timer -= 1;
    *timer == 0
}

impl Avatar {
    pub fn new(x: f32, y: f32, config: &GameConfig) -> Self {
        let rect = Rect::new(x, y, config.avatar.width, config.avatar.small_height);
        Self {
            actor: Actor::new(rect),
            state: AvatarState::Small,
            previous_state: AvatarState::Small,
            suspended_timer: 0,
            invincibility_timer: 0,
            big_timer: 0,
            fire_timer: 0,
            alive: true,
            facing: Facing::Right,
            running: false,
            animation_frame: 0,
            animation_counter: 0,
            tall: false,
        }
    }

    pub fn rect(&self) -> &Rect {
        &self.actor.rect
    }

    pub fn is_tall(&self) -> bool {
        self.tall
    }

    pub fn is_dying(&self) -> bool {
        self.state == AvatarState::Dying
    }

    /// Damage has no effect right now.
    pub fn is_immune(&self) -> bool {
        self.invincibility_timer > 0 || self.state == AvatarState::Invincible
    }

    /// Alive and not in the Dying state: may act, fight and open gates.
    pub fn is_active(&self) -> bool {
        self.alive && !self.is_dying()
    }

    // ── State changes ─────────────────────────────────────────────────────────

    fn set_state(&mut self, to: AvatarState, config: &GameConfig, events: &mut Vec<GameEvent>) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        match to {
            AvatarState::Big => self.set_tall(true, config),
            AvatarState::Small => self.set_tall(false, config),
            AvatarState::Fire | AvatarState::Invincible | AvatarState::Dying => {}
        }
        debug!("avatar state {from:?} -> {to:?}");
        events.push(GameEvent::AvatarStateChanged { from, to });
    }

    fn set_tall(&mut self, tall: bool, config: &GameConfig) {
        if self.tall == tall {
            return;
        }
        self.tall = tall;
        let height = if tall {
            config.avatar.big_height
        } else {
            config.avatar.small_height
        };
        self.actor.rect.resize_height_keep_bottom(height);
    }

    /// Apply a collected power-up.
    pub fn collect(&mut self, kind: PowerUpKind, config: &GameConfig, events: &mut Vec<GameEvent>) {
        let avatar = &config.avatar;
        match (self.state, kind) {
            (AvatarState::Dying, _) => {}
            (AvatarState::Invincible, _) => self.upgrade_suspended(kind, config),
            (AvatarState::Small, PowerUpKind::Mushroom) => {
                self.set_state(AvatarState::Big, config, events);
                self.big_timer = avatar.big_duration;
            }
            (AvatarState::Big, PowerUpKind::Mushroom) => self.big_timer = avatar.big_duration,
            (AvatarState::Fire, PowerUpKind::Mushroom) => {}
            (AvatarState::Small | AvatarState::Big, PowerUpKind::Flower) => {
                self.big_timer = 0;
                self.set_state(AvatarState::Fire, config, events);
                self.fire_timer = avatar.fire_duration;
            }
            (AvatarState::Fire, PowerUpKind::Flower) => self.fire_timer = avatar.fire_duration,
            (_, PowerUpKind::Star) => self.enter_invincible(config, events),
        }
    }

    /// A pickup during the star changes what the star hands back.
    fn upgrade_suspended(&mut self, kind: PowerUpKind, config: &GameConfig) {
        let avatar = &config.avatar;
        match (self.previous_state, kind) {
            (AvatarState::Small | AvatarState::Big, PowerUpKind::Mushroom) => {
                self.previous_state = AvatarState::Big;
                self.suspended_timer = avatar.big_duration;
            }
            (AvatarState::Small | AvatarState::Big | AvatarState::Fire, PowerUpKind::Flower) => {
                self.previous_state = AvatarState::Fire;
                self.suspended_timer = avatar.fire_duration;
            }
            (_, PowerUpKind::Star) => self.invincibility_timer = avatar.star_duration,
            _ => {}
        }
    }

    fn enter_invincible(&mut self, config: &GameConfig, events: &mut Vec<GameEvent>) {
        self.previous_state = self.state;
        self.suspended_timer = match self.state {
            AvatarState::Big => self.big_timer,
            AvatarState::Fire => self.fire_timer,
            _ => 0,
        };
        self.big_timer = 0;
        self.fire_timer = 0;
        self.set_state(AvatarState::Invincible, config, events);
        self.invincibility_timer = config.avatar.star_duration;
    }

    fn leave_invincible(&mut self, config: &GameConfig, events: &mut Vec<GameEvent>) {
        let timer = std::mem::take(&mut self.suspended_timer);
        let restored = match self.previous_state {
            AvatarState::Big | AvatarState::Fire if timer == 0 => AvatarState::Small,
            AvatarState::Invincible | AvatarState::Dying => AvatarState::Small,
            state => state,
        };
        self.set_state(restored, config, events);
        match restored {
            AvatarState::Big => self.big_timer = timer,
            AvatarState::Fire => self.fire_timer = timer,
            _ => {}
        }
    }

    /// Take a hit. Never applies twice inside one immunity window.
    pub fn take_damage(&mut self, config: &GameConfig, events: &mut Vec<GameEvent>) -> DamageOutcome {
        if !self.is_active() || self.is_immune() {
            return DamageOutcome::Ignored;
        }
        match self.state {
            AvatarState::Fire | AvatarState::Big => {
                self.fire_timer = 0;
                self.big_timer = 0;
                self.set_state(AvatarState::Small, config, events);
                self.invincibility_timer = config.avatar.immunity_duration;
                DamageOutcome::Downgraded
            }
            AvatarState::Small => {
                self.die(config, events);
                DamageOutcome::Died
            }
            AvatarState::Invincible | AvatarState::Dying => DamageOutcome::Ignored,
        }
    }

    /// Enter Dying: hop once and fall through everything.
    pub fn die(&mut self, config: &GameConfig, events: &mut Vec<GameEvent>) {
        if self.is_dying() {
            return;
        }
        self.big_timer = 0;
        self.fire_timer = 0;
        self.invincibility_timer = 0;
        self.suspended_timer = 0;
        self.set_state(AvatarState::Dying, config, events);
        self.alive = false;
        self.actor.velocity_x = 0.0;
        self.actor.velocity_y = config.avatar.death_hop;
        info!(
            "avatar died at ({:.0}, {:.0})",
            self.actor.rect.x, self.actor.rect.y
        );
        events.push(GameEvent::AvatarDied);
    }

    /// Grant damage immunity without a state change.
    pub fn grant_immunity(&mut self, frames: u32) {
        self.invincibility_timer = self.invincibility_timer.max(frames);
    }

    // ── Movement ──────────────────────────────────────────────────────────────

    /// Jump if standing on something. Returns whether the jump happened.
    pub fn jump(&mut self, config: &GameConfig) -> bool {
        if !self.actor.on_ground || !self.is_active() {
            return false;
        }
        let avatar = &config.avatar;
        let size = if matches!(self.state, AvatarState::Big | AvatarState::Fire) {
            avatar.size_jump_multiplier
        } else {
            1.0
        };
        let run = if self.running {
            avatar.run_jump_multiplier
        } else {
            1.0
        };
        self.actor.velocity_y = -avatar.jump_force * size * run;
        self.actor.on_ground = false;
        true
    }

    fn read_input(&mut self, input: &FrameInput, pressed: &Pressed, config: &GameConfig) {
        self.running = input.run;
        let speed = if self.running {
            config.avatar.run_speed
        } else {
            config.avatar.walk_speed
        };
        self.actor.velocity_x = 0.0;
        if input.left {
            self.actor.velocity_x = -speed;
            self.facing = Facing::Left;
        } else if input.right {
            self.actor.velocity_x = speed;
            self.facing = Facing::Right;
        }
        if pressed.jump {
            self.jump(config);
        }
    }

    fn advance_animation(&mut self) {
        self.animation_counter += 1;
        let period = if self.running { 3 } else { 5 };
        if self.animation_counter > period {
            self.animation_frame = (self.animation_frame + 1) % 4;
            self.animation_counter = 0;
        }
    }

    fn advance_timers(&mut self, config: &GameConfig, events: &mut Vec<GameEvent>) {
        if tick_down(&mut self.invincibility_timer) && self.state == AvatarState::Invincible {
            self.leave_invincible(config, events);
        }
        if tick_down(&mut self.big_timer) && self.state == AvatarState::Big {
            self.set_state(AvatarState::Small, config, events);
        }
        if tick_down(&mut self.fire_timer) && self.state == AvatarState::Fire {
            self.set_state(AvatarState::Small, config, events);
        }
    }

    /// One frame of avatar logic: animation, timers, gravity, input,
    /// collision and the world bounds, in that order.
    pub fn update(
        &mut self,
        input: &FrameInput,
        pressed: &Pressed,
        obstacles: &mut [Obstacle],
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) -> Contacts {
        self.advance_animation();

        if self.is_dying() {
            let physics = &config.physics;
            self.actor
                .apply_gravity(physics.gravity * 0.5, physics.max_fall_speed);
            self.actor.rect.y += self.actor.velocity_y;
            return Contacts::default();
        }

        self.advance_timers(config, events);
        self.actor
            .apply_gravity(config.physics.gravity, config.physics.max_fall_speed);
        self.read_input(input, pressed, config);

        let contacts = geometry::resolve(&mut self.actor, obstacles);

        if self.actor.rect.x < 0.0 {
            self.actor.rect.x = 0.0;
        }
        if self.actor.below(config.physics.world_height) {
            self.die(config, events);
        }
        contacts
    }
}
