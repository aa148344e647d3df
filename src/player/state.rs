//! Player components and input resources.
//!
//! Systems that fill these live in [`super::control`]; the movement tick in
//! [`crate::simulation`] turns them into a [`MovementInput`].

use crate::movement::MovementInput;
use bevy::prelude::*;

/// Marker component for the player body.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Device-independent input for the current frame.
///
/// Cleared at the start of every frame by
/// [`super::control::player_intent_clear_system`], then filled by the keyboard
/// and gamepad systems.  Tests write it directly.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    /// `x` = strafe right, `y` = forward, camera-relative.
    pub axis: Vec2,
    /// Jump went down this frame.
    pub jump_pressed: bool,
}

impl PlayerIntent {
    /// Combine with the camera heading into one frame of movement input.
    pub fn to_input(self, camera_yaw: f32) -> MovementInput {
        MovementInput {
            axis: self.axis.clamp_length_max(1.0),
            jump_pressed: self.jump_pressed,
            camera_yaw,
        }
    }
}

/// Heading of the follow camera in radians around +Y.  Zero looks down -Z.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraYaw(pub f32);

/// The gamepad whose sticks drive the player.  `None` until one connects.
#[derive(Resource, Debug, Default)]
pub struct PreferredGamepad(pub Option<Entity>);
