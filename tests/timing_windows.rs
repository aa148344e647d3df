//! Coyote, buffer and landing-lock windows away from 60 Hz.
//!
//! The windows are authored in frames at 60 Hz but stored in seconds, so they
//! must keep their length in seconds at any frame rate.  Two clocks are used:
//!
//! 1. A fixed 120 Hz tick, where every window spans twice as many frames.
//! 2. A seeded jittered tick between 1/144 s and 1/30 s.  Expected outcomes
//!    are derived from the summed frame times; presses that land within a
//!    hair of a window edge are skipped.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sizeshift::events::MovementEvent;
use sizeshift::movement::MovementInput;
use sizeshift::testing::Harness;

const HZ_120: f32 = 1.0 / 120.0;
const EDGE: f32 = 1e-4;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn idle() -> MovementInput {
    MovementInput::default()
}

fn press() -> MovementInput {
    MovementInput::jump()
}

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

fn harness_at(dt: f32) -> Harness {
    let mut h = Harness::default();
    h.dt = dt;
    h
}

/// Frame times in `[1/144, 1/30)` seconds.
fn jittered(seed: u64, n: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| rng.gen_range(1.0 / 144.0..1.0 / 30.0))
        .collect()
}

/// Harness driven by a recorded list of frame times.
struct Clocked {
    h: Harness,
    dts: Vec<f32>,
    frame: usize,
}

impl Clocked {
    fn new(h: Harness, dts: Vec<f32>) -> Self {
        Self { h, dts, frame: 0 }
    }

    fn tick(&mut self, input: MovementInput) -> Vec<MovementEvent> {
        self.h.dt = self.dts[self.frame];
        self.frame += 1;
        self.h.tick(input)
    }

    /// Seconds covered by frames `from..=to`.
    fn span(&self, from: usize, to: usize) -> f32 {
        self.dts[from..=to].iter().sum()
    }
}

/// Ground jump, then the double jump ten frames later, at the harness rate.
fn spend_double_jump(h: &mut Harness) {
    assert_eq!(jumped(&h.tick(press())), Some(false));
    h.run(10, idle());
    assert_eq!(jumped(&h.tick(press())), Some(true));
}

fn frames_until_landing(h: &mut Harness) -> usize {
    (0..2000)
        .find(|_| landed(&h.tick(idle())))
        .expect("body never landed")
}

// ── 120 Hz ────────────────────────────────────────────────────────────────────

fn walk_off_at_120_and_press_on(k: usize) -> Option<bool> {
    let mut h = harness_at(HZ_120);
    h.run(10, idle());
    h.body.floor = None;
    let airborne = h.run(k, idle());
    assert!(airborne.iter().all(|frame| jumped(frame).is_none()));
    jumped(&h.tick(press()))
}

#[test]
fn coyote_window_spans_sixteen_frames_at_120_hz() {
    assert_eq!(walk_off_at_120_and_press_on(14), Some(false));
    assert_eq!(walk_off_at_120_and_press_on(18), Some(true));
}

#[test]
fn buffer_window_spans_twelve_frames_at_120_hz() {
    let mut dry = harness_at(HZ_120);
    spend_double_jump(&mut dry);
    let n = frames_until_landing(&mut dry);
    assert!(n > 20);

    // Press ten frames before the landing frame: still buffered on landing.
    let mut h = harness_at(HZ_120);
    spend_double_jump(&mut h);
    h.run(n - 10, idle());
    assert_eq!(jumped(&h.tick(press())), None);
    let frames = h.run(10, idle());
    let landing = frames.last().expect("ten frames");
    assert!(landed(landing));
    assert_eq!(jumped(landing), Some(false));

    // Sixteen frames before: expired well before touching down.
    let mut h = harness_at(HZ_120);
    spend_double_jump(&mut h);
    h.run(n - 16, idle());
    h.tick(press());
    let frames = h.run(16, idle());
    assert!(landed(frames.last().expect("sixteen frames")));
    assert!(frames.iter().all(|f| jumped(f).is_none()));
}

#[test]
fn landing_lock_spans_six_frames_at_120_hz() {
    let mut h = harness_at(HZ_120);
    h.tick(press());
    frames_until_landing(&mut h);

    assert_eq!(jumped(&h.tick(press())), None, "locked right after landing");
    let held: Vec<_> = h.run(4, idle()).iter().filter_map(|f| jumped(f)).collect();
    assert!(held.is_empty(), "lock lifted early");
    let released: Vec<_> = h.run(3, idle()).iter().filter_map(|f| jumped(f)).collect();
    assert_eq!(released, vec![false], "buffered press fires once the lock clears");
}

// ── Jittered frame times ──────────────────────────────────────────────────────

#[test]
fn coyote_window_holds_in_seconds_under_jitter() {
    let coyote = Harness::default().config.coyote_duration;
    for seed in [3, 17, 99] {
        let dts = jittered(seed, 64);
        let (mut plain, mut double) = (0, 0);

        for k in 1..24 {
            // Take-off frame 0 opens the window; frames 1..=k count it down.
            let remaining = coyote - dts[1..=k].iter().sum::<f32>();
            if remaining.abs() < EDGE {
                continue;
            }

            let mut h = Harness::default();
            h.run(5, idle());
            h.body.floor = None;
            let mut c = Clocked::new(h, dts.clone());
            for _ in 0..k {
                assert_eq!(jumped(&c.tick(idle())), None);
            }
            let kind = jumped(&c.tick(press()));

            if remaining > 0.0 {
                assert_eq!(kind, Some(false), "seed {seed}, frame {k}: inside the window");
                plain += 1;
            } else {
                assert_eq!(kind, Some(true), "seed {seed}, frame {k}: past the window");
                double += 1;
            }
        }
        assert!(plain > 0 && double > 0, "seed {seed} never crossed the edge");
    }
}

#[test]
fn buffer_window_holds_in_seconds_under_jitter() {
    let buffer = Harness::default().config.jump_buffer_duration;
    for seed in [5, 41, 2024] {
        let dts = jittered(seed, 4000);

        let mut dry = Harness::default();
        spend_double_jump(&mut dry);
        let mut dry = Clocked::new(dry, dts.clone());
        let landing = (0..dts.len())
            .find(|_| landed(&dry.tick(idle())))
            .expect("body never landed");
        assert!(landing > 20);

        let (mut fired, mut expired) = (0, 0);
        for lead in 1..16 {
            let pressed_on = landing - lead;
            let remaining = buffer - dry.span(pressed_on + 1, landing);
            if remaining.abs() < EDGE {
                continue;
            }

            let mut h = Harness::default();
            spend_double_jump(&mut h);
            let mut c = Clocked::new(h, dts.clone());
            for _ in 0..pressed_on {
                c.tick(idle());
            }
            let mut frames = vec![c.tick(press())];
            for _ in 0..lead {
                frames.push(c.tick(idle()));
            }
            let (landing_frame, before) = frames.split_last().expect("frames");
            assert!(landed(landing_frame), "seed {seed}: landing moved");
            assert!(before.iter().all(|f| jumped(f).is_none()));

            if remaining > 0.0 {
                assert_eq!(jumped(landing_frame), Some(false), "seed {seed}, lead {lead}");
                fired += 1;
            } else {
                assert_eq!(jumped(landing_frame), None, "seed {seed}, lead {lead}");
                expired += 1;
            }
        }
        assert!(fired > 0 && expired > 0, "seed {seed} never crossed the edge");
    }
}

#[test]
fn landing_lock_holds_in_seconds_under_jitter() {
    let lock = Harness::default().config.landing_lock_duration;
    for seed in [8, 64, 777] {
        let dts = jittered(seed, 4000);
        let mut h = Harness::default();
        h.tick(press());
        let mut c = Clocked::new(h, dts);

        let landing = (0..4000)
            .find(|_| landed(&c.tick(idle())))
            .expect("body never landed");

        let first = landing + 1;
        let mut kind = jumped(&c.tick(press()));
        let mut fired_on = first;
        while kind.is_none() {
            assert!(fired_on < first + 20, "seed {seed}: buffered press never fired");
            kind = jumped(&c.tick(idle()));
            fired_on += 1;
        }

        assert_eq!(kind, Some(false));
        // The lock starts on the landing frame and counts down from the next.
        let at_fire = c.span(first, fired_on);
        assert!(at_fire >= lock - EDGE, "seed {seed}: fired {at_fire}s after landing");
        if fired_on > first {
            let before = c.span(first, fired_on - 1);
            assert!(before < lock + EDGE, "seed {seed}: held {before}s past the lock");
        }
    }
}
