//! Avatar-versus-enemy and fireball-versus-enemy contact resolution.

use log::debug;

use crate::avatar::{Avatar, AvatarState, DamageOutcome};
use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::entities::{Fireball, Obstacle};
use crate::events::{DefeatKind, GameEvent};
use crate::geometry::{self, Contacts};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatOutcome {
    /// No contact, or one side was out of play.
    Skipped,
    /// The star swept the enemy away.
    Destroyed { points: u32 },
    Stomped { points: u32 },
    /// Lateral contact: the avatar's damage transition ran.
    Hit(DamageOutcome),
}

/// Did the avatar come down on the enemy from above this frame?
///
/// Axis-separated resolution can leave the avatar's bottom a few pixels
/// inside the enemy, so the test uses the bottom edge from before the
/// vertical move plus a tolerance window, not the current edges.
pub fn is_stomp(avatar: &Avatar, enemy: &Enemy, config: &GameConfig) -> bool {
    let combat = &config.combat;
    let foe = enemy.rect();
    let center = avatar.rect().center_x();
    avatar.actor.is_falling()
        && avatar.actor.previous_bottom <= foe.top() + combat.stomp_tolerance
        && center >= foe.left() - combat.stomp_side_margin
        && center <= foe.right() + combat.stomp_side_margin
}

/// Resolve one avatar/enemy pair for this frame.
pub fn resolve_contact(
    avatar: &mut Avatar,
    enemy: &mut Enemy,
    obstacles: &[Obstacle],
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) -> CombatOutcome {
    if !avatar.is_active() || !enemy.is_hostile() || !avatar.rect().overlaps(enemy.rect()) {
        return CombatOutcome::Skipped;
    }

    if avatar.state == AvatarState::Invincible {
        let points = enemy.destroy();
        debug!("{:?} swept away by the star", enemy.kind);
        events.push(GameEvent::EnemyDefeated {
            kind: enemy.kind,
            how: DefeatKind::Destroyed,
            points,
        });
        return CombatOutcome::Destroyed { points };
    }

    if is_stomp(avatar, enemy, config) {
        let top = enemy.rect().top();
        let points = enemy.crush();
        avatar.actor.velocity_y = config.combat.stomp_rebound;
        avatar.actor.rect.set_bottom(top);
        debug!("{:?} stomped", enemy.kind);
        events.push(GameEvent::EnemyDefeated {
            kind: enemy.kind,
            how: DefeatKind::Stomped,
            points,
        });
        return CombatOutcome::Stomped { points };
    }

    let outcome = avatar.take_damage(config, events);
    if outcome == DamageOutcome::Downgraded {
        knock_back(
            avatar,
            enemy.rect().center_x(),
            config.combat.knockback_distance,
            config.combat.knockback_lift,
            obstacles,
        );
    }
    CombatOutcome::Hit(outcome)
}

/// Push the avatar horizontally away from `from_x`, stopping at walls, and
/// give it a small upward velocity so it separates before the next overlap
/// test.
pub fn knock_back(avatar: &mut Avatar, from_x: f32, distance: f32, lift: f32, obstacles: &[Obstacle]) {
    let direction = if avatar.rect().center_x() < from_x {
        -1.0
    } else {
        1.0
    };
    let walking = avatar.actor.velocity_x;
    avatar.actor.velocity_x = direction * distance;
    let mut contacts = Contacts::default();
    geometry::resolve_horizontal(&mut avatar.actor, obstacles, &mut contacts);
    avatar.actor.velocity_x = walking;
    if avatar.actor.rect.x < 0.0 {
        avatar.actor.rect.x = 0.0;
    }
    avatar.actor.velocity_y = lift;
}

/// Fireballs destroy the first hostile enemy they touch and burn out.
/// Returns the points earned.
pub fn resolve_fireballs(
    fireballs: &mut [Fireball],
    enemies: &mut [Enemy],
    events: &mut Vec<GameEvent>,
) -> u32 {
    let mut earned = 0;
    for fireball in fireballs.iter_mut().filter(|f| f.alive) {
        let target = enemies
            .iter_mut()
            .find(|e| e.is_hostile() && e.rect().overlaps(&fireball.actor.rect));
        if let Some(enemy) = target {
            let points = enemy.destroy();
            fireball.alive = false;
            earned += points;
            events.push(GameEvent::EnemyDefeated {
                kind: enemy.kind,
                how: DefeatKind::Destroyed,
                points,
            });
        }
    }
    earned
}
