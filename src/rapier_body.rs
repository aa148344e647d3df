//! Rapier3D implementations of the movement core's body traits.
//!
//! [`RapierPlayerBody`] is a short-lived view built inside
//! [`crate::simulation::player_movement_system`] over the player's components.
//! The ground probe is cast by the system (it owns the `ReadRapierContext`)
//! and handed in as a distance, so the view itself holds no context borrow.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::body::{capsule_half_segment, ColliderSwap, PlayerBody};

/// Mutable view over one player's Rapier components for a single tick.
pub struct RapierPlayerBody<'a> {
    pub position: Vec3,
    pub velocity: &'a mut Velocity,
    pub impulse: &'a mut ExternalImpulse,
    pub has_collider: bool,
    /// Result of this tick's downward ray cast.
    pub ground_distance: Option<f32>,
}

impl PlayerBody for RapierPlayerBody<'_> {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity.linvel
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity.linvel = velocity;
    }

    /// Accumulated into `ExternalImpulse`; Rapier applies and clears it on
    /// its next step.
    fn apply_impulse(&mut self, impulse: Vec3) {
        self.impulse.impulse += impulse;
    }

    fn has_collider(&self) -> bool {
        self.has_collider
    }

    fn probe_down(&self, max_distance: f32) -> Option<f32> {
        self.ground_distance.filter(|d| *d <= max_distance)
    }
}

/// Replacing the component in place keeps the entity's `Transform`, so the
/// new capsule is centred where the old one was.  bevy_rapier picks up the
/// changed `Collider` and rebuilds the shape before the next physics step.
impl ColliderSwap for Collider {
    fn replace_capsule(&mut self, radius: f32, height: f32) {
        *self = capsule_collider(radius, height);
    }
}

/// Upright capsule with the given radius and total height.
pub fn capsule_collider(radius: f32, height: f32) -> Collider {
    Collider::capsule_y(capsule_half_segment(radius, height), radius)
}

/// Downward ray filter for the player's ground probe: ignores the player's
/// own body and every sensor (pickups, triggers).
pub fn ground_probe_filter(player: Entity) -> QueryFilter<'static> {
    QueryFilter::default()
        .exclude_rigid_body(player)
        .exclude_sensors()
}
