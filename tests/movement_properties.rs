//! Headless behaviour tests for the movement core.
//!
//! Every test drives a [`Harness`] (flat floor, explicit Euler integration,
//! 60 Hz ticks) so timing windows can be checked frame by frame without a
//! Rapier pipeline.
//!
//! Covered scenarios:
//! 1. Horizontal momentum is never snapped, only approached.
//! 2. Coyote window: late presses off a ledge stay plain jumps.
//! 3. Jump buffering: presses just before landing fire on the landing tick.
//! 4. The double jump is spent once per airborne phase.
//! 5. Collider, profile and ground threshold always agree after a size change.
//! 6. Landing lock defers fresh presses made right after touching down.

use std::path::Path;

use bevy::math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sizeshift::config::MovementConfig;
use sizeshift::events::MovementEvent;
use sizeshift::movement::MovementInput;
use sizeshift::size::{SizeChange, SizeTier};
use sizeshift::testing::Harness;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn idle() -> MovementInput {
    MovementInput::default()
}

fn press() -> MovementInput {
    MovementInput::jump()
}

/// `Some(double_jump)` if the frame contains a jump.
fn jumped(events: &[MovementEvent]) -> Option<bool> {
    events.iter().find_map(|e| match e {
        MovementEvent::Jumped { double_jump } => Some(*double_jump),
        _ => None,
    })
}

fn landed(events: &[MovementEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, MovementEvent::Landed { .. }))
}

/// Stand still, walk off the edge (the floor disappears), press on the `k`-th
/// airborne frame.
fn walk_off_and_press_on(k: usize) -> Vec<MovementEvent> {
    let mut h = Harness::default();
    h.run(5, idle());
    h.body.floor = None;
    let airborne = h.run(k, idle());
    assert!(airborne.iter().all(|frame| jumped(frame).is_none()));
    h.tick(press())
}

/// Ground jump, then the double jump ten frames later; returns while rising.
fn airborne_with_double_jump_spent() -> Harness {
    let mut h = Harness::default();
    assert_eq!(jumped(&h.tick(press())), Some(false));
    h.run(10, idle());
    assert_eq!(jumped(&h.tick(press())), Some(true));
    h
}

/// Frames until the next `Landed`, with no input.
fn frames_until_landing(h: &mut Harness) -> usize {
    (0..600)
        .find(|_| landed(&h.tick(idle())))
        .expect("body never landed")
}

// ── Momentum ──────────────────────────────────────────────────────────────────

#[test]
fn acceleration_is_monotonic_and_capped() {
    let mut h = Harness::default();
    let top = h.size.profile().move_speed;
    let mut last = 0.0;
    for _ in 0..60 {
        h.tick(MovementInput::forward());
        let speed = h.body.horizontal_speed();
        if last < top - 1e-4 {
            assert!(speed > last, "speed stalled below top: {last} -> {speed}");
        } else {
            assert!((speed - top).abs() < 1e-4, "top speed not held");
        }
        assert!(speed <= top + 1e-4);
        last = speed;
    }
}

#[test]
fn deceleration_is_monotonic() {
    let mut h = Harness::default();
    h.run(60, MovementInput::forward());
    let mut last = h.body.horizontal_speed();
    let mut ticks = 0;
    while last > 0.0 {
        h.tick(idle());
        let speed = h.body.horizontal_speed();
        assert!(speed <= last + 1e-5);
        last = speed;
        ticks += 1;
        assert!(ticks < 120, "never came to rest");
    }
    assert!(ticks > 1, "velocity was snapped to zero");
}

#[test]
fn two_seconds_of_forward_reaches_normal_top_speed() {
    let mut h = Harness::default();
    h.run(120, MovementInput::forward());
    assert!((h.body.horizontal_speed() - 14.0).abs() < 1e-4);
    assert!(h.movement.is_grounded());
}

#[test]
fn camera_yaw_steers_top_speed_direction() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..8 {
        let yaw = rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
        let mut h = Harness::default();
        let input = MovementInput {
            axis: Vec2::Y,
            camera_yaw: yaw,
            ..Default::default()
        };
        h.run(120, input);

        let expected = Vec2::new(-yaw.sin(), -yaw.cos()) * 14.0;
        let actual = Vec2::new(h.body.velocity.x, h.body.velocity.z);
        assert!(
            (actual - expected).length() < 1e-3,
            "yaw {yaw}: expected {expected:?}, got {actual:?}"
        );
    }
}

// ── Coyote time ───────────────────────────────────────────────────────────────

#[test]
fn press_inside_coyote_window_is_a_plain_jump() {
    let events = walk_off_and_press_on(7);
    assert_eq!(jumped(&events), Some(false));
}

#[test]
fn press_after_coyote_window_spends_the_double_jump() {
    let events = walk_off_and_press_on(9);
    assert_eq!(jumped(&events), Some(true));
}

#[test]
fn coyote_jump_keeps_double_jump_available() {
    let mut h = Harness::default();
    h.run(5, idle());
    h.body.floor = None;
    h.run(3, idle());
    assert_eq!(jumped(&h.tick(press())), Some(false));
    h.run(5, idle());
    assert_eq!(jumped(&h.tick(press())), Some(true));
}

// ── Jump buffering ────────────────────────────────────────────────────────────

#[test]
fn press_five_frames_before_landing_jumps_on_landing_tick() {
    let n = frames_until_landing(&mut airborne_with_double_jump_spent());
    assert!(n >= 8);

    let mut h = airborne_with_double_jump_spent();
    h.run(n - 5, idle());
    assert_eq!(jumped(&h.tick(press())), None, "press is only buffered");
    let frames = h.run(5, idle());

    let landing = frames.last().expect("five frames");
    assert!(landed(landing));
    assert_eq!(jumped(landing), Some(false));
    assert!(frames[..4].iter().all(|f| jumped(f).is_none()));

    // Landed is reported before the jump it enabled.
    let land_idx = landing
        .iter()
        .position(|e| matches!(e, MovementEvent::Landed { .. }));
    let jump_idx = landing
        .iter()
        .position(|e| matches!(e, MovementEvent::Jumped { .. }));
    assert!(land_idx < jump_idx);
}

#[test]
fn press_eight_frames_before_landing_expires() {
    let n = frames_until_landing(&mut airborne_with_double_jump_spent());

    let mut h = airborne_with_double_jump_spent();
    h.run(n - 8, idle());
    h.tick(press());
    let frames = h.run(8, idle());

    assert!(landed(frames.last().expect("eight frames")));
    assert!(frames.iter().all(|f| jumped(f).is_none()));
}

// ── Double jump ───────────────────────────────────────────────────────────────

#[test]
fn only_one_air_jump_per_airborne_phase() {
    let mut h = airborne_with_double_jump_spent();
    for _ in 0..600 {
        let events = h.tick(press());
        if landed(&events) {
            return;
        }
        assert!(jumped(&events).is_none(), "second air jump fired");
    }
    panic!("body never landed");
}

#[test]
fn landing_restores_the_double_jump() {
    let mut h = airborne_with_double_jump_spent();
    frames_until_landing(&mut h);
    h.run(10, idle());
    assert_eq!(jumped(&h.tick(press())), Some(false));
    h.run(10, idle());
    assert_eq!(jumped(&h.tick(press())), Some(true));
}

// ── Size ──────────────────────────────────────────────────────────────────────

#[test]
fn growing_near_the_floor_grounds_the_body_immediately() {
    let mut h = Harness::default();
    h.body.position.y = 1.5;
    assert!(!h.grounded_now(), "1.5 is beyond the Normal threshold");
    h.tick(idle());
    assert!(!h.movement.is_grounded());

    assert!(h.grow().is_changed());
    assert_eq!(h.body.collider, Some((0.9, 3.6)));
    assert!(h.grounded_now(), "Large threshold reaches the floor");

    let events = h.tick(idle());
    assert!(matches!(
        events.first(),
        Some(MovementEvent::SizeChanged {
            tier: SizeTier::Large,
            ..
        })
    ));
    assert!(landed(&events));
    assert!(h.movement.is_grounded());
}

#[test]
fn collider_always_matches_active_profile() {
    let mut h = Harness::default();
    for op in [true, true, false, false, false, true] {
        if op {
            h.grow();
        } else {
            h.shrink();
        }
        let p = h.size.profile();
        assert_eq!(h.body.collider, Some((p.capsule_radius, p.capsule_height)));
    }
}

#[test]
fn extremes_are_idempotent() {
    let mut h = Harness::default();
    h.grow();
    h.tick(idle());
    assert_eq!(h.grow(), SizeChange::Unchanged);
    assert!(h.events.is_empty());
    assert_eq!(h.size.tier(), SizeTier::Large);

    h.shrink();
    h.shrink();
    h.tick(idle());
    assert_eq!(h.shrink(), SizeChange::Unchanged);
    assert!(h.events.is_empty());
    assert_eq!(h.body.collider, Some((0.25, 1.0)));
}

// ── Landing lock ──────────────────────────────────────────────────────────────

#[test]
fn fresh_press_after_landing_waits_for_lock() {
    let mut h = Harness::default();
    h.tick(press());
    frames_until_landing(&mut h);

    assert_eq!(jumped(&h.tick(press())), None, "locked on first frame");
    assert_eq!(jumped(&h.tick(idle())), None, "still locked");
    let later: Vec<_> = h.run(2, idle()).iter().filter_map(|f| jumped(f)).collect();
    assert_eq!(later, vec![false], "buffered press fires once the lock clears");
}

// ── Config ────────────────────────────────────────────────────────────────────

#[test]
fn shipped_movement_toml_is_valid() {
    let config = MovementConfig::from_path(Path::new("assets/movement.toml"))
        .expect("assets/movement.toml must parse and validate");
    assert_eq!(config.profiles.normal.move_speed, 14.0);
}
