use quiz_platformer::entities::*;
use quiz_platformer::error::LayoutError;
use quiz_platformer::gate::*;
use quiz_platformer::geometry::Rect;
use quiz_platformer::level::{self, GateSpec, Level, LevelLayout, ObstacleSpec};

use rstest::rstest;

fn barrier(x: f32, owner: BarrierOwner) -> Obstacle {
    Obstacle::barrier(Rect::new(x, 0.0, 20.0, 536.0), owner)
}

fn gate_spec(id: usize, kind: GateKind) -> GateSpec {
    GateSpec {
        id: GateId(id),
        x: 100.0 * id as f32,
        y: 456.0,
        kind,
        keys_required: 0,
    }
}

fn barrier_spec(owner: BarrierOwner) -> ObstacleSpec {
    ObstacleSpec {
        rect: Rect::new(500.0, 0.0, 20.0, 536.0),
        kind: ObstacleKind::Barrier,
        owner: Some(owner),
    }
}

fn layout(gates: Vec<GateSpec>, obstacles: Vec<ObstacleSpec>) -> LevelLayout {
    LevelLayout {
        number: 1,
        world_width: 1000.0,
        spawn: (0.0, 504.0),
        obstacles,
        enemies: Vec::new(),
        gates,
        coins: Vec::new(),
        power_ups: Vec::new(),
        boss: None,
        goal: Rect::new(900.0, 376.0, 20.0, 160.0),
        time_limit: 100,
    }
}

// ── Gate ──────────────────────────────────────────────────────────────────────

#[test]
fn new_gate_is_closed_and_locked() {
    let g = Gate::new(GateId(0), 10.0, 456.0, GateKind::Mandatory, 0);
    assert!(!g.is_open);
    assert!(g.is_locked);
    assert_eq!(g.rect, Rect::new(10.0, 456.0, GATE_WIDTH, GATE_HEIGHT));
}

#[rstest]
#[case(0, 0, true)]
#[case(1, 0, false)]
#[case(1, 1, true)]
#[case(2, 1, false)]
#[case(2, 5, true)]
fn attempt_needs_enough_keys(#[case] required: u32, #[case] held: u32, #[case] allowed: bool) {
    let g = Gate::new(GateId(0), 0.0, 0.0, GateKind::Mandatory, required);
    assert_eq!(g.can_attempt(held), allowed);
}

#[test]
fn open_gate_stays_open_and_refuses_attempts() {
    let mut g = Gate::new(GateId(3), 0.0, 0.0, GateKind::SpecialKey, 0);
    assert!(g.open());
    assert!(g.is_open);
    assert!(!g.is_locked);
    assert!(!g.can_attempt(10));
    // Opening twice changes nothing
    assert!(!g.open());
    assert!(g.is_open);
}

#[rstest]
#[case(GateKind::Mandatory, true)]
#[case(GateKind::SpecialKey, true)]
#[case(GateKind::SecretOptional, false)]
#[case(GateKind::BonusOptional, false)]
fn only_progress_gates_block(#[case] kind: GateKind, #[case] blocks: bool) {
    assert_eq!(kind.blocks_progress(), blocks);
}

#[test]
fn wallet_counts_keys() {
    let mut wallet = KeyWallet::default();
    assert_eq!(wallet.held(), 0);
    assert_eq!(wallet.add(), 1);
    assert_eq!(wallet.add(), 2);
    assert_eq!(wallet.held(), 2);
}

// ── Barriers ──────────────────────────────────────────────────────────────────

#[test]
fn remove_barriers_only_touches_the_owner() {
    let mut obstacles = vec![
        Obstacle::new(Rect::new(0.0, 536.0, 1000.0, 64.0), ObstacleKind::Ground),
        barrier(100.0, BarrierOwner::Gate(GateId(0))),
        barrier(120.0, BarrierOwner::Gate(GateId(0))),
        barrier(300.0, BarrierOwner::Gate(GateId(1))),
        barrier(600.0, BarrierOwner::Boss),
    ];
    assert_eq!(remove_barriers(&mut obstacles, BarrierOwner::Gate(GateId(0))), 2);
    assert_eq!(obstacles.len(), 3);
    assert!(obstacles
        .iter()
        .all(|o| o.owner != Some(BarrierOwner::Gate(GateId(0)))));
    assert_eq!(obstacles[0].kind, ObstacleKind::Ground);

    // Nothing left for that owner
    assert_eq!(remove_barriers(&mut obstacles, BarrierOwner::Gate(GateId(0))), 0);
    assert_eq!(remove_barriers(&mut obstacles, BarrierOwner::Boss), 1);
    assert_eq!(obstacles.len(), 2);
}

// ── Layout validation ─────────────────────────────────────────────────────────

#[test]
fn valid_layout_builds() {
    let l = layout(
        vec![gate_spec(0, GateKind::Mandatory), gate_spec(1, GateKind::BonusOptional)],
        vec![barrier_spec(BarrierOwner::Gate(GateId(0)))],
    );
    let level = Level::build(&l).expect("layout is valid");
    assert_eq!(level.gates.len(), 2);
    assert_eq!(level.barrier_count(BarrierOwner::Gate(GateId(0))), 1);
    assert!(level.gate(GateId(1)).is_some());
    assert!(level.gate(GateId(2)).is_none());
}

#[test]
fn level_opens_a_gate_once() {
    let l = layout(
        vec![gate_spec(0, GateKind::Mandatory)],
        vec![barrier_spec(BarrierOwner::Gate(GateId(0)))],
    );
    let mut level = Level::build(&l).expect("layout is valid");
    assert_eq!(level.open_gate(GateId(0)), Some(1));
    assert!(level.gate(GateId(0)).is_some_and(|g| g.is_open));
    assert_eq!(level.barrier_count(BarrierOwner::Gate(GateId(0))), 0);

    assert_eq!(level.open_gate(GateId(0)), None);
    assert_eq!(level.open_gate(GateId(3)), None);
}

#[test]
fn level_clears_the_boss_and_its_barriers() {
    let mut l = layout(Vec::new(), vec![barrier_spec(BarrierOwner::Boss)]);
    l.boss = Some((700.0, 416.0));
    let mut level = Level::build(&l).expect("layout is valid");
    assert_eq!(level.clear_boss(), 1);
    let boss = level.boss.as_ref().expect("boss placed");
    assert!(boss.defeated && !boss.active);
    assert_eq!(boss.health, 0);
    assert_eq!(level.clear_boss(), 0);
}

#[test]
fn gate_ids_must_be_positional() {
    let l = layout(vec![gate_spec(1, GateKind::Mandatory)], Vec::new());
    assert_eq!(
        l.validate(),
        Err(LayoutError::GateIdMismatch {
            expected: GateId(0),
            found: GateId(1),
        })
    );
}

#[test]
fn barrier_for_missing_gate_is_rejected() {
    let l = layout(
        vec![gate_spec(0, GateKind::Mandatory)],
        vec![barrier_spec(BarrierOwner::Gate(GateId(4)))],
    );
    assert_eq!(l.validate(), Err(LayoutError::UnknownGate(GateId(4))));
}

#[rstest]
#[case(GateKind::SecretOptional)]
#[case(GateKind::BonusOptional)]
fn optional_gate_cannot_own_barriers(#[case] kind: GateKind) {
    let l = layout(
        vec![gate_spec(0, kind)],
        vec![barrier_spec(BarrierOwner::Gate(GateId(0)))],
    );
    assert_eq!(
        Level::build(&l).err(),
        Some(LayoutError::OptionalGateBarrier(GateId(0)))
    );
}

#[test]
fn boss_barrier_needs_a_boss() {
    let mut l = layout(Vec::new(), vec![barrier_spec(BarrierOwner::Boss)]);
    assert_eq!(l.validate(), Err(LayoutError::BossBarrierWithoutBoss));
    l.boss = Some((600.0, 416.0));
    assert_eq!(l.validate(), Ok(()));
}

#[test]
fn builtin_levels_are_valid() {
    for number in 1..=level::BUILTIN_LEVELS {
        let l = level::builtin(number).expect("built-in level exists");
        assert_eq!(l.number, number);
        assert_eq!(l.validate(), Ok(()), "level {number}");
        // Every keyed gate can be satisfied by special-key gates before it
        for (index, g) in l.gates.iter().enumerate() {
            let earlier_keys = l.gates[..index]
                .iter()
                .filter(|e| e.kind == GateKind::SpecialKey && e.x < g.x)
                .count() as u32;
            assert!(g.keys_required <= earlier_keys, "level {number} gate {index}");
        }
    }
    assert!(level::builtin(level::BUILTIN_LEVELS + 1).is_none());
    assert!(level::builtin(0).is_none());
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[test]
fn boss_wakes_within_range_and_stays_awake() {
    let mut boss = Boss::new(1000.0, 416.0);
    assert!(!boss.active);
    assert!(!boss.watch(500.0, 400.0));
    assert!(boss.watch(650.0, 400.0));
    assert!(boss.watch(0.0, 400.0));
}

#[test]
fn boss_reach_extends_both_sides() {
    let boss = Boss::new(1000.0, 416.0);
    let reach = boss.reach(40.0);
    assert_eq!(reach.left(), 960.0);
    assert_eq!(reach.right(), 1140.0);
    assert_eq!(reach.height, BOSS_HEIGHT);
}

#[test]
fn boss_falls_on_the_last_hit() {
    let mut boss = Boss::new(1000.0, 416.0);
    boss.watch(1050.0, 400.0);
    for expected in (1..BOSS_HEALTH).rev() {
        assert!(!boss.damage());
        assert_eq!(boss.health, expected);
    }
    assert!(boss.damage());
    assert!(boss.defeated);
    assert!(!boss.active);
    assert_eq!(boss.health, 0);

    // Defeated bosses take no more hits and never wake again
    assert!(!boss.damage());
    assert!(!boss.watch(1050.0, 400.0));
}
