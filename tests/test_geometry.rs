use quiz_platformer::actor::Actor;
use quiz_platformer::entities::*;
use quiz_platformer::geometry::*;

use rstest::rstest;

fn ground() -> Obstacle {
    Obstacle::new(Rect::new(0.0, 536.0, 1000.0, 64.0), ObstacleKind::Ground)
}

fn wall(x: f32) -> Obstacle {
    Obstacle::new(Rect::new(x, 0.0, 20.0, 536.0), ObstacleKind::Pipe)
}

fn block(x: f32, y: f32) -> Obstacle {
    Obstacle::new(
        Rect::new(x, y, 32.0, 32.0),
        ObstacleKind::Block {
            contents: Some(PowerUpKind::Mushroom),
        },
    )
}

fn actor(x: f32, y: f32, vx: f32, vy: f32) -> Actor {
    Actor::with_velocity(Rect::new(x, y, 32.0, 32.0), vx, vy)
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_edges() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.left(), 10.0);
    assert_eq!(r.right(), 40.0);
    assert_eq!(r.top(), 20.0);
    assert_eq!(r.bottom(), 60.0);
    assert_eq!(r.center_x(), 25.0);
    assert_eq!(r.center_y(), 40.0);
}

#[test]
fn touching_edges_do_not_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let right = Rect::new(10.0, 0.0, 10.0, 10.0);
    let below = Rect::new(0.0, 10.0, 10.0, 10.0);
    assert!(!a.overlaps(&right));
    assert!(!a.overlaps(&below));
    assert!(a.overlaps(&Rect::new(9.0, 9.0, 10.0, 10.0)));
}

#[test]
fn resize_keeps_bottom_edge() {
    let mut r = Rect::new(0.0, 504.0, 32.0, 32.0);
    r.resize_height_keep_bottom(48.0);
    assert_eq!(r.bottom(), 536.0);
    assert_eq!(r.y, 488.0);
}

#[test]
fn widened_grows_both_sides() {
    let r = Rect::new(100.0, 0.0, 50.0, 10.0).widened(40.0);
    assert_eq!(r.left(), 60.0);
    assert_eq!(r.right(), 190.0);
}

// ── Horizontal pass ───────────────────────────────────────────────────────────

#[test]
fn moving_right_into_wall_clamps_without_zeroing_velocity() {
    let mut a = actor(0.0, 100.0, 10.0, 0.0);
    let mut contacts = Contacts::default();
    resolve_horizontal(&mut a, &[wall(35.0)], &mut contacts);
    assert_eq!(a.rect.right(), 35.0);
    assert_eq!(a.velocity_x, 10.0);
    assert!(contacts.right);
    assert!(!contacts.left);
}

#[test]
fn moving_left_into_wall_clamps_to_its_right_edge() {
    let mut a = actor(125.0, 100.0, -10.0, 0.0);
    let mut contacts = Contacts::default();
    resolve_horizontal(&mut a, &[wall(100.0)], &mut contacts);
    assert_eq!(a.rect.left(), 120.0);
    assert!(contacts.left);
}

#[test]
fn free_horizontal_move_is_unchanged() {
    let mut a = actor(0.0, 100.0, 5.0, 0.0);
    let mut contacts = Contacts::default();
    resolve_horizontal(&mut a, &[wall(200.0)], &mut contacts);
    assert_eq!(a.rect.x, 5.0);
    assert!(!contacts.lateral());
}

// ── Vertical pass ─────────────────────────────────────────────────────────────

#[test]
fn landing_snaps_to_top_and_sets_on_ground() {
    let mut a = actor(100.0, 500.0, 0.0, 10.0);
    let mut contacts = Contacts::default();
    resolve_vertical(&mut a, &[ground()], &mut contacts);
    assert_eq!(a.rect.bottom(), 536.0);
    assert_eq!(a.velocity_y, 0.0);
    assert!(a.on_ground);
    assert!(contacts.below);
    assert_eq!(a.previous_bottom, 532.0);
}

#[test]
fn on_ground_is_cleared_when_airborne() {
    let mut a = actor(100.0, 100.0, 0.0, 1.0);
    a.on_ground = true;
    let mut contacts = Contacts::default();
    resolve_vertical(&mut a, &[ground()], &mut contacts);
    assert!(!a.on_ground);
    assert_eq!(a.rect.y, 101.0);
}

#[test]
fn head_bump_marks_block_struck_once() {
    let mut obstacles = vec![block(100.0, 400.0)];
    let mut a = actor(100.0, 440.0, 0.0, -10.0);
    let contacts = resolve(&mut a, &mut obstacles);
    assert!(contacts.above);
    assert_eq!(contacts.struck, Some(0));
    assert_eq!(a.rect.top(), 432.0);
    assert_eq!(a.velocity_y, 0.0);
    assert!(obstacles[0].struck);

    // Already struck: the one-shot signal does not fire again
    a.velocity_y = -10.0;
    a.rect.y = 440.0;
    let again = resolve(&mut a, &mut obstacles);
    assert!(again.above);
    assert_eq!(again.struck, None);
}

#[test]
fn ceiling_that_is_not_a_block_is_never_struck() {
    let mut obstacles = vec![Obstacle::new(
        Rect::new(100.0, 400.0, 64.0, 20.0),
        ObstacleKind::Platform,
    )];
    let mut a = actor(100.0, 425.0, 0.0, -10.0);
    let contacts = resolve(&mut a, &mut obstacles);
    assert!(contacts.above);
    assert_eq!(contacts.struck, None);
    assert!(!obstacles[0].struck);
}

#[test]
fn resolve_body_never_marks_blocks() {
    let obstacles = vec![block(100.0, 400.0)];
    let mut a = actor(100.0, 440.0, 0.0, -10.0);
    let contacts = resolve_body(&mut a, &obstacles);
    assert_eq!(contacts.struck, Some(0));
    assert!(!obstacles[0].struck);
}

// ── Containment ───────────────────────────────────────────────────────────────

#[rstest]
#[case(0.0, 500.0, 8.0, 12.0)]
#[case(300.0, 500.0, -6.0, 15.0)]
#[case(160.0, 450.0, 12.0, -4.0)]
#[case(225.0, 300.0, -15.0, 15.0)]
#[case(50.0, 504.0, 0.0, 0.5)]
fn no_overlap_remains_after_resolution(
    #[case] x: f32,
    #[case] y: f32,
    #[case] vx: f32,
    #[case] vy: f32,
) {
    let mut obstacles = vec![ground(), wall(200.0), block(100.0, 400.0)];
    let mut a = actor(x, y, vx, vy);
    assert!(obstacles.iter().all(|o| !a.rect.overlaps(&o.rect)));
    resolve(&mut a, &mut obstacles);
    for o in &obstacles {
        assert!(!a.rect.overlaps(&o.rect), "{:?} overlaps {:?}", a.rect, o.rect);
    }
}
