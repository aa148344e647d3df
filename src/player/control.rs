//! Player input systems.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`player_intent_clear_system`]: resets `PlayerIntent`.
//! 2. [`keyboard_to_intent_system`]: WASD / Space / arrow keys.
//! 3. [`gamepad_to_intent_system`]: left stick, South button, right stick.
//! 4. [`debug_size_keys_system`]: `1` shrinks, `2` grows.
//!
//! Nothing here touches physics.  The movement tick reads the finished
//! `PlayerIntent` and `CameraYaw`, so tests can set those directly and skip
//! the device layer entirely.

use super::state::{CameraYaw, PlayerIntent, PreferredGamepad};
use crate::config::MovementConfig;
use crate::size::{SizeChangeRequest, SizeDirection};
use bevy::input::gamepad::{GamepadAxis, GamepadButton, GamepadConnection, GamepadConnectionEvent};
use bevy::prelude::*;

// ── Step 1: Clear ─────────────────────────────────────────────────────────────

pub fn player_intent_clear_system(mut intent: ResMut<PlayerIntent>) {
    *intent = PlayerIntent::default();
}

// ── Step 2a: Keyboard → Intent ────────────────────────────────────────────────

/// | Key          | Effect                      |
/// |--------------|-----------------------------|
/// | W / S        | `axis.y = ±1`               |
/// | A / D        | `axis.x = ∓1`               |
/// | Space        | jump (on press)             |
/// | ← / →        | turn the camera             |
pub fn keyboard_to_intent_system(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<MovementConfig>,
    mut intent: ResMut<PlayerIntent>,
    mut yaw: ResMut<CameraYaw>,
) {
    let mut axis = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if axis != Vec2::ZERO {
        intent.axis = axis;
    }

    intent.jump_pressed |= keys.just_pressed(KeyCode::Space);

    let turn = time.delta_secs() * config.camera_turn_speed;
    if keys.pressed(KeyCode::ArrowLeft) {
        yaw.0 += turn;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        yaw.0 -= turn;
    }
}

// ── Step 2b: Gamepad connection ────────────────────────────────────────────────

/// The most recently connected gamepad is always preferred.
pub fn gamepad_connection_system(
    mut events: MessageReader<GamepadConnectionEvent>,
    mut preferred: ResMut<PreferredGamepad>,
) {
    for event in events.read() {
        match &event.connection {
            GamepadConnection::Connected { .. } => {
                preferred.0 = Some(event.gamepad);
                info!(
                    "[gamepad] Gamepad {:?} connected (now preferred)",
                    event.gamepad
                );
            }
            GamepadConnection::Disconnected => {
                info!("[gamepad] Gamepad {:?} disconnected", event.gamepad);
                if preferred.0 == Some(event.gamepad) {
                    preferred.0 = None;
                }
            }
        }
    }
}

// ── Step 2c: Gamepad → Intent ─────────────────────────────────────────────────

/// Left stick moves (ignored inside the deadzone), South jumps, right stick X
/// turns the camera.  Does nothing without a [`PreferredGamepad`].
pub fn gamepad_to_intent_system(
    preferred: Res<PreferredGamepad>,
    gamepads: Query<&Gamepad>,
    time: Res<Time>,
    config: Res<MovementConfig>,
    mut intent: ResMut<PlayerIntent>,
    mut yaw: ResMut<CameraYaw>,
) {
    let Some(gamepad_entity) = preferred.0 else {
        return;
    };
    let Ok(gamepad) = gamepads.get(gamepad_entity) else {
        return;
    };

    intent.jump_pressed |= gamepad.just_pressed(GamepadButton::South);

    let rx = gamepad.get(GamepadAxis::RightStickX).unwrap_or(0.0);
    if rx.abs() >= config.gamepad_left_deadzone {
        yaw.0 -= rx * config.camera_turn_speed * time.delta_secs();
    }

    let lx = gamepad.get(GamepadAxis::LeftStickX).unwrap_or(0.0);
    let ly = gamepad.get(GamepadAxis::LeftStickY).unwrap_or(0.0);
    let stick = Vec2::new(lx, ly);
    if stick.length() < config.gamepad_left_deadzone {
        return;
    }
    intent.axis = stick.clamp_length_max(1.0);
}

// ── Step 2d: Debug size keys ──────────────────────────────────────────────────

pub fn debug_size_keys_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut requests: MessageWriter<SizeChangeRequest>,
) {
    if keys.just_pressed(KeyCode::Digit1) {
        requests.write(SizeChangeRequest {
            direction: SizeDirection::Shrink,
        });
    }
    if keys.just_pressed(KeyCode::Digit2) {
        requests.write(SizeChangeRequest {
            direction: SizeDirection::Grow,
        });
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
