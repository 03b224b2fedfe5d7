use quiz_platformer::avatar::{Avatar, AvatarState, DamageOutcome};
use quiz_platformer::combat::*;
use quiz_platformer::config::GameConfig;
use quiz_platformer::enemy::{Enemy, EnemyKind};
use quiz_platformer::entities::*;
use quiz_platformer::events::{DefeatKind, GameEvent};
use quiz_platformer::geometry::{self, Rect};

fn ground() -> Vec<Obstacle> {
    vec![Obstacle::new(
        Rect::new(0.0, 536.0, 1000.0, 64.0),
        ObstacleKind::Ground,
    )]
}

/// Weak enemy standing on the ground at x = 100 (top edge 506).
fn foe() -> Enemy {
    Enemy::new(100.0, 506.0, EnemyKind::Weak)
}

fn fire_avatar(x: f32, y: f32, cfg: &GameConfig) -> Avatar {
    let mut a = Avatar::new(x, y, cfg);
    let mut events = Vec::new();
    a.collect(PowerUpKind::Flower, cfg, &mut events);
    assert_eq!(a.state, AvatarState::Fire);
    a
}

fn contact(
    a: &mut Avatar,
    e: &mut Enemy,
    obstacles: &[Obstacle],
    cfg: &GameConfig,
) -> (CombatOutcome, Vec<GameEvent>) {
    let mut events = Vec::new();
    let outcome = resolve_contact(a, e, obstacles, cfg, &mut events);
    (outcome, events)
}

// ── Stomp ─────────────────────────────────────────────────────────────────────

#[test]
fn falling_onto_enemy_stomps_it() {
    let cfg = GameConfig::default();
    let mut a = Avatar::new(100.0, 472.0, &cfg);
    a.actor.velocity_y = 5.0;
    geometry::resolve_body(&mut a.actor, &ground());
    assert_eq!(a.actor.previous_bottom, 504.0);
    assert_eq!(a.rect().bottom(), 509.0);

    let mut e = foe();
    assert!(is_stomp(&a, &e, &cfg));
    let (outcome, events) = contact(&mut a, &mut e, &ground(), &cfg);

    assert_eq!(outcome, CombatOutcome::Stomped { points: 100 });
    assert_eq!(a.actor.velocity_y, cfg.combat.stomp_rebound);
    assert_eq!(a.rect().bottom(), 506.0);
    assert_eq!(a.state, AvatarState::Small);
    assert!(e.crushed);
    assert_eq!(
        events,
        vec![GameEvent::EnemyDefeated {
            kind: EnemyKind::Weak,
            how: DefeatKind::Stomped,
            points: 100,
        }]
    );
}

#[test]
fn resting_contact_is_not_a_stomp() {
    let cfg = GameConfig::default();
    // Overlapping from above but not falling
    let mut a = Avatar::new(100.0, 480.0, &cfg);
    let mut e = foe();
    assert!(!is_stomp(&a, &e, &cfg));
    let (outcome, _) = contact(&mut a, &mut e, &ground(), &cfg);
    assert_eq!(outcome, CombatOutcome::Hit(DamageOutcome::Died));
}

#[test]
fn falling_past_the_side_margin_is_not_a_stomp() {
    let cfg = GameConfig::default();
    // Centre at 145: beyond the enemy's right edge (130) plus the 10px margin
    let mut a = Avatar::new(129.0, 480.0, &cfg);
    a.actor.velocity_y = 4.0;
    a.actor.previous_bottom = 508.0;
    let e = foe();
    assert!(a.rect().overlaps(e.rect()));
    assert!(!is_stomp(&a, &e, &cfg));
}

// ── Lateral hits ──────────────────────────────────────────────────────────────

#[test]
fn fire_avatar_is_downgraded_and_knocked_back() {
    let cfg = GameConfig::default();
    let mut a = fire_avatar(80.0, 504.0, &cfg);
    let mut e = foe();
    let (outcome, events) = contact(&mut a, &mut e, &ground(), &cfg);

    assert_eq!(outcome, CombatOutcome::Hit(DamageOutcome::Downgraded));
    assert_eq!(a.state, AvatarState::Small);
    assert_eq!(a.fire_timer, 0);
    assert_eq!(a.invincibility_timer, cfg.avatar.immunity_duration);
    // Pushed away from the enemy's centre by the knockback distance
    assert_eq!(a.rect().x, 64.0);
    assert_eq!(a.actor.velocity_y, cfg.combat.knockback_lift);
    assert!(e.is_hostile());
    assert!(events.contains(&GameEvent::AvatarStateChanged {
        from: AvatarState::Fire,
        to: AvatarState::Small,
    }));
}

#[test]
fn knockback_stops_at_walls() {
    let cfg = GameConfig::default();
    let mut a = Avatar::new(80.0, 504.0, &cfg);
    let mut events = Vec::new();
    a.collect(PowerUpKind::Mushroom, &cfg, &mut events);
    assert_eq!(a.rect().height, cfg.avatar.big_height);

    let mut obstacles = ground();
    obstacles.push(Obstacle::new(
        Rect::new(50.0, 400.0, 20.0, 136.0),
        ObstacleKind::Pipe,
    ));
    let mut e = foe();
    let (outcome, _) = contact(&mut a, &mut e, &obstacles, &cfg);
    assert_eq!(outcome, CombatOutcome::Hit(DamageOutcome::Downgraded));
    assert_eq!(a.rect().left(), 70.0);
    assert_eq!(a.rect().bottom(), 536.0);
}

#[test]
fn knockback_never_leaves_the_world() {
    let cfg = GameConfig::default();
    let mut a = Avatar::new(4.0, 504.0, &cfg);
    knock_back(&mut a, 100.0, 16.0, -4.0, &[]);
    assert_eq!(a.rect().x, 0.0);
    assert_eq!(a.actor.velocity_x, 0.0);
}

#[test]
fn small_avatar_dies_on_contact() {
    let cfg = GameConfig::default();
    let mut a = Avatar::new(80.0, 504.0, &cfg);
    let mut e = foe();
    let (outcome, events) = contact(&mut a, &mut e, &ground(), &cfg);
    assert_eq!(outcome, CombatOutcome::Hit(DamageOutcome::Died));
    assert!(a.is_dying());
    assert!(events.contains(&GameEvent::AvatarDied));
}

#[test]
fn immune_avatar_ignores_contact() {
    let cfg = GameConfig::default();
    let mut a = Avatar::new(80.0, 504.0, &cfg);
    a.grant_immunity(10);
    let mut e = foe();
    let (outcome, events) = contact(&mut a, &mut e, &ground(), &cfg);
    assert_eq!(outcome, CombatOutcome::Hit(DamageOutcome::Ignored));
    assert_eq!(a.state, AvatarState::Small);
    assert!(events.is_empty());
}

#[test]
fn invincible_avatar_destroys_on_touch() {
    let cfg = GameConfig::default();
    let mut a = Avatar::new(80.0, 504.0, &cfg);
    let mut events = Vec::new();
    a.collect(PowerUpKind::Star, &cfg, &mut events);
    let mut e = foe();
    let (outcome, _) = contact(&mut a, &mut e, &ground(), &cfg);
    assert_eq!(outcome, CombatOutcome::Destroyed { points: 200 });
    assert!(!e.alive);
    assert_eq!(a.state, AvatarState::Invincible);
}

// ── Skips ─────────────────────────────────────────────────────────────────────

#[test]
fn dying_avatar_is_skipped() {
    let cfg = GameConfig::default();
    let mut a = Avatar::new(80.0, 504.0, &cfg);
    a.die(&cfg, &mut Vec::new());
    let mut e = foe();
    let (outcome, events) = contact(&mut a, &mut e, &ground(), &cfg);
    assert_eq!(outcome, CombatOutcome::Skipped);
    assert!(events.is_empty());
}

#[test]
fn crushed_enemy_is_skipped() {
    let cfg = GameConfig::default();
    let mut a = Avatar::new(80.0, 504.0, &cfg);
    let mut e = foe();
    e.crush();
    let (outcome, _) = contact(&mut a, &mut e, &ground(), &cfg);
    assert_eq!(outcome, CombatOutcome::Skipped);
    assert_eq!(a.state, AvatarState::Small);
}

#[test]
fn distant_enemy_is_skipped() {
    let cfg = GameConfig::default();
    let mut a = Avatar::new(300.0, 504.0, &cfg);
    let mut e = foe();
    let (outcome, _) = contact(&mut a, &mut e, &ground(), &cfg);
    assert_eq!(outcome, CombatOutcome::Skipped);
}

// ── Fireballs ─────────────────────────────────────────────────────────────────

#[test]
fn fireball_destroys_the_enemy_it_touches() {
    let mut fireballs = vec![
        Fireball::thrown_from(&Rect::new(70.0, 500.0, 32.0, 32.0), Facing::Right),
        Fireball::thrown_from(&Rect::new(400.0, 500.0, 32.0, 32.0), Facing::Right),
    ];
    let mut enemies = vec![foe(), Enemy::new(700.0, 496.0, EnemyKind::Armored)];
    let mut events = Vec::new();

    let earned = resolve_fireballs(&mut fireballs, &mut enemies, &mut events);
    assert_eq!(earned, 200);
    assert!(!fireballs[0].alive);
    assert!(fireballs[1].alive);
    assert!(!enemies[0].alive);
    assert!(enemies[1].alive);
    assert_eq!(
        events,
        vec![GameEvent::EnemyDefeated {
            kind: EnemyKind::Weak,
            how: DefeatKind::Destroyed,
            points: 200,
        }]
    );
}

#[test]
fn fireball_ignores_crushed_enemies() {
    let mut fireballs = vec![Fireball::thrown_from(
        &Rect::new(70.0, 500.0, 32.0, 32.0),
        Facing::Right,
    )];
    let mut enemies = vec![foe()];
    enemies[0].crush();
    let earned = resolve_fireballs(&mut fireballs, &mut enemies, &mut Vec::new());
    assert_eq!(earned, 0);
    assert!(fireballs[0].alive);
}
