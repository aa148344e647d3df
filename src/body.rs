//! Physics capabilities the movement core needs from a rigid body.
//!
//! The core never talks to Rapier directly.  It works against two small
//! traits so the same state machine runs on the live Rapier body
//! ([`crate::rapier_body`]) and on the deterministic
//! [`crate::testing::FlatGroundBody`] used by tests.
//!
//! | Trait | Used by | Provides |
//! |-------|---------|----------|
//! | [`PlayerBody`] | `MovementController`, `GroundSensor` | position, velocity, impulses, downward probe |
//! | [`ColliderSwap`] | `SizeController` | replacing the capsule in place |

use bevy::math::Vec3;

/// Kinematic state and queries of the player's rigid body.
pub trait PlayerBody {
    /// World-space centre of the body.
    fn position(&self) -> Vec3;

    fn linear_velocity(&self) -> Vec3;

    fn set_linear_velocity(&mut self, velocity: Vec3);

    /// Apply an instantaneous impulse.  Mass is the engine's concern.
    fn apply_impulse(&mut self, impulse: Vec3);

    /// `false` while the body has no collider attached (e.g. during startup).
    fn has_collider(&self) -> bool;

    /// Distance from [`Self::position`] straight down to the first surface,
    /// if one lies within `max_distance`.  `None` when nothing was hit or the
    /// query could not run.
    fn probe_down(&self, max_distance: f32) -> Option<f32>;
}

/// Capability to replace the capsule collider attached to a body.
///
/// Implementations must rebuild the shape around the body's current centre;
/// position and velocity are left untouched.
pub trait ColliderSwap {
    /// `height` is the total capsule height including both caps.
    fn replace_capsule(&mut self, radius: f32, height: f32);
}

/// Half-length of the capsule's inner segment for a total `height`.
///
/// Rapier capsules are described by the segment half-length plus the radius;
/// profiles describe total height.  Clamped so a profile whose height equals
/// its diameter degenerates to a sphere instead of a negative segment.
#[inline]
pub fn capsule_half_segment(radius: f32, height: f32) -> f32 {
    (height * 0.5 - radius).max(0.0)
}
