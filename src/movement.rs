//! Player movement state machine.
//!
//! [`MovementController::update`] runs once per frame and is the only code that
//! writes the player's velocity or jump impulses.
//!
//! ## Per-tick pipeline
//!
//! 1. **Ground**: [`GroundSensor`] probe with the active profile's threshold.
//! 2. **Bookkeeping**: tick timers down, then react to the grounded edge:
//!    landing resets the double jump and starts the landing lock; leaving the
//!    ground opens the coyote window.
//! 3. **Horizontal**: pursue `input direction × move_speed` at a fixed rate.
//!    Velocity is never snapped; it approaches the target without overshoot.
//! 4. **Jump**: resolve a fresh press or a live buffered press against the
//!    legality rules below.  Illegal fresh presses are buffered.
//! 5. **Footsteps**: cadence proportional to grounded speed.
//!
//! ## Jump legality
//!
//! | Kind     | Condition                                                      | Consumes double jump |
//! |----------|----------------------------------------------------------------|----------------------|
//! | `Ground` | grounded, landing lock clear, not still rising from a jump      | no                   |
//! | `Coyote` | airborne, `coyote_timer > 0`                                   | no                   |
//! | `Air`    | airborne, `jumps_used == 0`                                    | yes                  |
//!
//! A press buffered while airborne executes on the landing tick even though
//! the landing lock has just started; the lock only defers presses made after
//! touching down.
//!
//! The controller never fails.  A body without a collider, or a probe that
//! cannot run, reads as airborne and the controller simply keeps integrating
//! input against whatever velocity the body reports.

use bevy::prelude::*;

use crate::body::PlayerBody;
use crate::config::MovementConfig;
use crate::events::{MovementEvent, MovementEvents};
use crate::ground::GroundSensor;
use crate::size::SizeController;

/// One frame of player input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementInput {
    /// `x` = strafe right, `y` = forward.  Lengths above 1 are normalised.
    pub axis: Vec2,
    /// Jump went down this frame.
    pub jump_pressed: bool,
    /// Camera heading (radians around +Y); rotates the input basis.
    pub camera_yaw: f32,
}

impl MovementInput {
    pub fn forward() -> Self {
        Self {
            axis: Vec2::Y,
            ..Default::default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Default::default()
        }
    }

    /// World-space horizontal direction `(x, z)` this input asks for.
    pub fn world_direction(&self) -> Vec2 {
        let axis = self.axis.clamp_length_max(1.0);
        // Bevy's forward is -Z.
        let local = Vec3::new(axis.x, 0.0, -axis.y);
        let world = Quat::from_rotation_y(self.camera_yaw) * local;
        Vec2::new(world.x, world.z)
    }
}

/// Which rule made a jump legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Coyote,
    Air,
}

impl JumpKind {
    #[inline]
    pub fn is_double_jump(self) -> bool {
        self == JumpKind::Air
    }
}

/// Mutable movement record.  Persists for the whole session; only
/// [`MovementState::reset`] (respawn) clears it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementState {
    pub grounded: bool,
    /// Seconds left in which a jump is legal after walking off a ledge.
    pub coyote_timer: f32,
    /// Seconds left in which an early press is still retried.
    pub jump_buffer_timer: f32,
    /// 0 or 1: whether the double jump was spent since the last landing.
    pub jumps_used: u8,
    /// Seconds left in which fresh presses are deferred after landing.
    pub landing_lock_timer: f32,
    pub camera_yaw: f32,
    /// Seconds since take-off still inside the recent-jump window.
    pub recent_jump_timer: f32,
    /// The live buffered press was made while airborne.
    pub buffered_in_air: bool,
    /// Downward speed seen on the last airborne tick.
    pub last_fall_speed: f32,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            grounded: true,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            jumps_used: 0,
            landing_lock_timer: 0.0,
            camera_yaw: 0.0,
            recent_jump_timer: 0.0,
            buffered_in_air: false,
            last_fall_speed: 0.0,
        }
    }
}

impl MovementState {
    /// Respawn reset.  Camera yaw is owned by the input side and survives.
    pub fn reset(&mut self) {
        *self = Self {
            camera_yaw: self.camera_yaw,
            ..Self::default()
        };
    }
}

/// Player movement state machine.  See the module docs for the pipeline.
#[derive(Component, Debug, Clone, Default)]
pub struct MovementController {
    state: MovementState,
    footstep_timer: f32,
}

impl MovementController {
    #[inline]
    pub fn state(&self) -> &MovementState {
        &self.state
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    /// Respawn reset.
    pub fn reset(&mut self) {
        self.state.reset();
        self.footstep_timer = 0.0;
    }

    /// Advance one frame.
    pub fn update<B: PlayerBody + ?Sized>(
        &mut self,
        dt: f32,
        input: &MovementInput,
        body: &mut B,
        size: &SizeController,
        config: &MovementConfig,
        events: &mut MovementEvents,
    ) {
        let profile = size.profile();
        let sensor = GroundSensor::new(config.ground_clearance);
        let grounded = sensor.is_grounded(&*body, profile);
        let velocity = body.linear_velocity();

        self.track_ground(dt, grounded, velocity.y, config, events);
        self.state.camera_yaw = input.camera_yaw;

        // ── Horizontal ────────────────────────────────────────────────────────
        let current = Vec2::new(velocity.x, velocity.z);
        let target = input.world_direction() * profile.move_speed;
        let mut rate = if input.axis.length_squared() > 0.0 {
            config.ground_acceleration
        } else {
            config.ground_deceleration
        };
        if !grounded {
            rate *= config.air_control;
        }
        let horizontal = approach(current, target, rate * dt);
        body.set_linear_velocity(Vec3::new(horizontal.x, velocity.y, horizontal.y));

        // ── Jump ──────────────────────────────────────────────────────────────
        let s = &mut self.state;
        let requested = input.jump_pressed || s.jump_buffer_timer > 0.0;
        let mut jumped = false;
        if requested {
            match legal_jump(s) {
                Some(kind) => {
                    let mut v = body.linear_velocity();
                    if v.y < 0.0 {
                        v.y = 0.0;
                        body.set_linear_velocity(v);
                    }
                    let force = match kind {
                        JumpKind::Air => profile.jump_force * config.double_jump_multiplier,
                        JumpKind::Ground | JumpKind::Coyote => profile.jump_force,
                    };
                    body.apply_impulse(Vec3::Y * force);

                    if kind == JumpKind::Air {
                        s.jumps_used = 1;
                    }
                    s.coyote_timer = 0.0;
                    s.jump_buffer_timer = 0.0;
                    s.buffered_in_air = false;
                    s.recent_jump_timer = config.recent_jump_window;
                    events.push(MovementEvent::Jumped {
                        double_jump: kind.is_double_jump(),
                    });
                    jumped = true;
                }
                None if input.jump_pressed => {
                    s.jump_buffer_timer = config.jump_buffer_duration;
                    s.buffered_in_air = !grounded;
                }
                None => {}
            }
        }

        // ── Footsteps ─────────────────────────────────────────────────────────
        let speed = horizontal.length();
        if grounded && !jumped && speed > config.footstep_min_speed {
            self.footstep_timer += dt;
            let period = config.footstep_stride / speed;
            if self.footstep_timer >= period {
                self.footstep_timer -= period;
                events.push(MovementEvent::Footstep);
            }
        } else {
            self.footstep_timer = 0.0;
        }
    }

    /// Timer decay and grounded-edge transitions.
    fn track_ground(
        &mut self,
        dt: f32,
        grounded: bool,
        vertical_velocity: f32,
        config: &MovementConfig,
        events: &mut MovementEvents,
    ) {
        let s = &mut self.state;
        s.landing_lock_timer = tick_down(s.landing_lock_timer, dt);
        s.jump_buffer_timer = tick_down(s.jump_buffer_timer, dt);
        s.recent_jump_timer = tick_down(s.recent_jump_timer, dt);
        if s.jump_buffer_timer <= 0.0 {
            s.buffered_in_air = false;
        }
        // The guard only covers the rise out of sensor range.
        if grounded && vertical_velocity <= 0.0 {
            s.recent_jump_timer = 0.0;
        }

        let was_grounded = s.grounded;
        s.grounded = grounded;

        if grounded && !was_grounded {
            s.jumps_used = 0;
            s.coyote_timer = 0.0;
            s.landing_lock_timer = config.landing_lock_duration;
            let fall_speed = s.last_fall_speed.max(-vertical_velocity).max(0.0);
            events.push(MovementEvent::Landed { fall_speed });
        } else if !grounded && was_grounded {
            // Taking off from a jump is not walking off a ledge.
            s.coyote_timer = if s.recent_jump_timer > 0.0 {
                0.0
            } else {
                config.coyote_duration
            };
        } else if !grounded {
            s.coyote_timer = tick_down(s.coyote_timer, dt);
        }

        s.last_fall_speed = if grounded {
            0.0
        } else {
            (-vertical_velocity).max(0.0)
        };
    }
}

/// First jump rule that currently applies, in table order.
fn legal_jump(s: &MovementState) -> Option<JumpKind> {
    let lock_clear = s.landing_lock_timer <= 0.0 || s.buffered_in_air;
    if s.grounded && lock_clear && s.recent_jump_timer <= 0.0 {
        Some(JumpKind::Ground)
    } else if !s.grounded && s.coyote_timer > 0.0 {
        Some(JumpKind::Coyote)
    } else if !s.grounded && s.jumps_used == 0 {
        Some(JumpKind::Air)
    } else {
        None
    }
}

#[inline]
fn tick_down(timer: f32, dt: f32) -> f32 {
    (timer - dt).max(0.0)
}

/// Move `current` toward `target` by at most `max_delta`, landing exactly on
/// `target` once within reach.
pub fn approach(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist <= f32::EPSILON {
        target
    } else {
        current + delta / dist * max_delta
    }
}
