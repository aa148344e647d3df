//! Centralised movement and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::MovementConfig::default`] is built from these values;
//! `assets/movement.toml` can override any subset at startup.
//!
//! ## Frame-based authoring
//!
//! The timing windows were originally tuned as "N frames at 60 Hz".  They are
//! stored in seconds here and decremented by the frame `dt`, so behaviour is
//! identical at any frame rate.

// ── Timing Windows ────────────────────────────────────────────────────────────

/// Grace period after walking off a ledge during which a jump is still
/// accepted as if grounded.  8 frames at 60 Hz.
pub const COYOTE_DURATION: f32 = 8.0 / 60.0;

/// How long a jump press made before it could be honoured is retried.
/// 6 frames at 60 Hz.
pub const JUMP_BUFFER_DURATION: f32 = 6.0 / 60.0;

/// Post-landing window during which fresh jump presses are deferred through
/// the buffer.  3 frames at 60 Hz.
///
/// Must not exceed [`JUMP_BUFFER_DURATION`] or a deferred press would expire
/// before the lock lifts.
pub const LANDING_LOCK_DURATION: f32 = 3.0 / 60.0;

/// Window after take-off during which the body may still be inside sensor
/// range.  Blocks ground re-jumps and suppresses the coyote window that the
/// take-off would otherwise open.
pub const RECENT_JUMP_WINDOW: f32 = 0.15;

// ── Horizontal Movement ───────────────────────────────────────────────────────

/// Rate (u/s²) at which horizontal velocity pursues the input target.
///
/// At 60.0 the Normal profile reaches full speed (14 u/s) in ~0.23 s.
pub const GROUND_ACCELERATION: f32 = 60.0;

/// Rate (u/s²) at which horizontal velocity bleeds to zero with no input.
pub const GROUND_DECELERATION: f32 = 80.0;

/// Multiplier applied to acceleration and deceleration while airborne.
/// 1.0 = full air control; 0.0 = ballistic.
pub const AIR_CONTROL: f32 = 0.6;

// ── Jumping ───────────────────────────────────────────────────────────────────

/// Double jumps use `jump_force × DOUBLE_JUMP_MULTIPLIER`.
pub const DOUBLE_JUMP_MULTIPLIER: f32 = 1.15;

/// Player collider mass.  Fixed across size tiers so each profile's
/// `jump_force` maps to a predictable take-off speed (`jump_force / mass`).
pub const PLAYER_MASS: f32 = 1.0;

/// Gravity applied by the physics engine (u/s²).
pub const GRAVITY: f32 = -25.0;

// ── Ground Sensor ─────────────────────────────────────────────────────────────

/// Extra probe distance below the capsule base still counted as grounded.
///
/// Too small → flickering grounded state on uneven floors.
/// Too large → jumps become legal a visible distance above the floor.
pub const GROUND_CLEARANCE: f32 = 0.1;

// ── Footsteps ─────────────────────────────────────────────────────────────────

/// Minimum grounded horizontal speed (u/s) before footsteps are emitted.
pub const FOOTSTEP_MIN_SPEED: f32 = 1.5;

/// Distance covered per footstep; period = stride / speed.
pub const FOOTSTEP_STRIDE: f32 = 2.2;

// ── Size Profiles ─────────────────────────────────────────────────────────────

pub const SMALL_SCALE: f32 = 0.5;
pub const SMALL_MOVE_SPEED: f32 = 10.0;
pub const SMALL_JUMP_FORCE: f32 = 9.0;
pub const SMALL_CAPSULE_RADIUS: f32 = 0.25;
pub const SMALL_CAPSULE_HEIGHT: f32 = 1.0;

pub const NORMAL_SCALE: f32 = 1.0;
pub const NORMAL_MOVE_SPEED: f32 = 14.0;
pub const NORMAL_JUMP_FORCE: f32 = 11.0;
pub const NORMAL_CAPSULE_RADIUS: f32 = 0.5;
pub const NORMAL_CAPSULE_HEIGHT: f32 = 2.0;

pub const LARGE_SCALE: f32 = 1.8;
pub const LARGE_MOVE_SPEED: f32 = 11.0;
pub const LARGE_JUMP_FORCE: f32 = 13.0;
pub const LARGE_CAPSULE_RADIUS: f32 = 0.9;
pub const LARGE_CAPSULE_HEIGHT: f32 = 3.6;

// ── Session Flow ──────────────────────────────────────────────────────────────

/// Fade-out delay between a death and the player reappearing at the checkpoint.
pub const RESPAWN_FADE_SECS: f32 = 0.6;

/// Fade delay between a chapter-load request and the new chapter taking over.
pub const CHAPTER_FADE_SECS: f32 = 0.8;

/// Falling below this height counts as a death.
pub const KILL_PLANE_Y: f32 = -30.0;

// ── Gamepad ───────────────────────────────────────────────────────────────────

/// Left-stick magnitude below which stick input is ignored.
pub const GAMEPAD_LEFT_DEADZONE: f32 = 0.15;

/// Camera yaw rate (rad/s) applied by the arrow keys.
pub const CAMERA_TURN_SPEED: f32 = 2.5;
