//! Player module: body entity and input handling.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | `Player` marker and the input resources (`PlayerIntent`, `CameraYaw`, `PreferredGamepad`) |
//! | [`control`] | Input systems: keyboard, gamepad, debug size keys |
//!
//! The movement tick itself lives in [`crate::simulation`]; this module only
//! spawns the body and turns devices into `PlayerIntent`.

pub mod control;
pub mod state;

pub use control::{
    debug_size_keys_system, gamepad_connection_system, gamepad_to_intent_system,
    keyboard_to_intent_system, player_intent_clear_system,
};
pub use state::{CameraYaw, Player, PlayerIntent, PreferredGamepad};

// ── Body spawn ────────────────────────────────────────────────────────────────

use crate::config::MovementConfig;
use crate::events::MovementEvents;
use crate::movement::MovementController;
use crate::rapier_body::capsule_collider;
use crate::session::Checkpoint;
use crate::size::SizeController;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Spawn the player at the current checkpoint, at Normal size.
///
/// Rotation is locked so the capsule stays upright, and friction is zero
/// with a `Min` combine rule so walls never hold the player up; all
/// horizontal braking comes from the movement controller.
pub fn spawn_player(
    mut commands: Commands,
    config: Res<MovementConfig>,
    checkpoint: Res<Checkpoint>,
) {
    let size = SizeController::new(config.profiles);
    let profile = *size.profile();

    commands.spawn((
        Player,
        MovementController::default(),
        size,
        MovementEvents::default(),
        // Physics
        RigidBody::Dynamic,
        capsule_collider(profile.capsule_radius, profile.capsule_height),
        ColliderMassProperties::Mass(config.player_mass),
        Velocity::zero(),
        ExternalImpulse::default(),
        LockedAxes::ROTATION_LOCKED,
        Friction {
            coefficient: 0.0,
            combine_rule: CoefficientCombineRule::Min,
        },
        Ccd::enabled(),
        ActiveEvents::COLLISION_EVENTS,
        // Transform / visibility
        Transform::from_translation(checkpoint.0),
        Visibility::default(),
    ));

    info!("Player spawned at {:?}", checkpoint.0);
}
