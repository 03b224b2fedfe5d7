//! Tunable constants, grouped by concern and loadable from TOML.
//!
//! Every section is `#[serde(default)]`, so a config file only needs to name
//! the values it changes. Frame counts assume the nominal 60 fps tick.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub avatar: AvatarConfig,
    pub combat: CombatConfig,
    pub session: SessionConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Lower bound of the playable world; passing it is fatal for the avatar.
    pub world_height: f32,
    /// How far below the world an enemy or item may fall before removal.
    pub despawn_margin: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            max_fall_speed: 15.0,
            world_height: 600.0,
            despawn_margin: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub width: f32,
    pub small_height: f32,
    pub big_height: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_force: f32,
    /// Jump multiplier while Big or Fire.
    pub size_jump_multiplier: f32,
    /// Jump multiplier while the run modifier is held.
    pub run_jump_multiplier: f32,
    pub immunity_duration: u32,
    pub star_duration: u32,
    pub big_duration: u32,
    pub fire_duration: u32,
    /// Frames between entering Dying and the life being taken.
    pub death_pause: u32,
    pub death_hop: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            small_height: 32.0,
            big_height: 48.0,
            walk_speed: 5.0,
            run_speed: 8.0,
            jump_force: 15.0,
            size_jump_multiplier: 1.3,
            run_jump_multiplier: 1.2,
            immunity_duration: 120,
            star_duration: 600,
            big_duration: 900,
            fire_duration: 900,
            death_pause: 90,
            death_hop: -8.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// How far below an enemy's top the avatar's pre-move bottom may be and
    /// still count as landing on it. Tuned by play-testing.
    pub stomp_tolerance: f32,
    /// Horizontal slack for the avatar's centre when testing a stomp.
    pub stomp_side_margin: f32,
    pub stomp_rebound: f32,
    pub knockback_distance: f32,
    pub knockback_lift: f32,
    pub boss_knockback_distance: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            stomp_tolerance: 15.0,
            stomp_side_margin: 10.0,
            stomp_rebound: -10.0,
            knockback_distance: 16.0,
            knockback_lift: -4.0,
            boss_knockback_distance: 48.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub lives: u32,
    pub frame_rate: u32,
    pub coins_per_life: u32,
    pub max_fireballs: usize,
    /// Suspend the world while a question is on screen.
    pub freeze_during_quiz: bool,
    /// Horizontal distance at which the boss wakes up.
    pub boss_activation_range: f32,
    /// Extra reach on each side of the boss for starting a boss question.
    pub boss_reach: f32,
    pub time_bonus_per_second: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            frame_rate: 60,
            coins_per_life: 100,
            max_fireballs: 2,
            freeze_during_quiz: true,
            boss_activation_range: 400.0,
            boss_reach: 40.0,
            time_bonus_per_second: 50,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would make the simulation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            }
        }

        if self.physics.gravity <= 0.0 {
            return Err(invalid("physics.gravity", "must be positive"));
        }
        if self.physics.max_fall_speed <= 0.0 {
            return Err(invalid("physics.max_fall_speed", "must be positive"));
        }
        if self.avatar.small_height <= 0.0 || self.avatar.big_height < self.avatar.small_height {
            return Err(invalid(
                "avatar.big_height",
                "heights must be positive and big must not be shorter than small",
            ));
        }
        if self.avatar.jump_force <= 0.0 {
            return Err(invalid("avatar.jump_force", "must be positive"));
        }
        let durations = [
            ("avatar.immunity_duration", self.avatar.immunity_duration),
            ("avatar.star_duration", self.avatar.star_duration),
            ("avatar.big_duration", self.avatar.big_duration),
            ("avatar.fire_duration", self.avatar.fire_duration),
        ];
        for (field, value) in durations {
            if value == 0 {
                return Err(invalid(field, "must be at least one frame"));
            }
        }
        if self.combat.stomp_rebound >= 0.0 {
            return Err(invalid("combat.stomp_rebound", "must point upward (negative)"));
        }
        if self.session.frame_rate == 0 {
            return Err(invalid("session.frame_rate", "must be positive"));
        }
        if self.session.lives == 0 {
            return Err(invalid("session.lives", "must be at least one"));
        }
        Ok(())
    }
}
