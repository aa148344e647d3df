//! Movement plugins and the per-frame systems that drive the movement core.
//!
//! ## Frame order (`Update`, chained sets)
//!
//! | Set | Systems |
//! |-----|---------|
//! | [`MovementSet::Input`] | intent clear, keyboard, gamepad, debug size keys |
//! | [`MovementSet::Session`] | kill plane, respawn / chapter-load progress |
//! | [`MovementSet::Size`] | pickup collection, [`apply_size_requests_system`] |
//! | [`MovementSet::Tick`] | [`player_movement_system`] |
//! | [`MovementSet::Emit`] | [`emit_movement_events_system`] |
//!
//! Size changes are applied before the tick, so the ground probe in the same
//! frame already uses the new profile's threshold.  Rapier steps afterwards in
//! `PostUpdate`.
//!
//! [`MovementPlugin`] carries no device input so it can run under
//! `MinimalPlugins`; [`PlayerInputPlugin`] adds keyboard and gamepad.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::config::MovementConfig;
use crate::events::{MovementEvent, MovementEvents};
use crate::ground::GroundSensor;
use crate::movement::MovementController;
use crate::player::{
    debug_size_keys_system, gamepad_connection_system, gamepad_to_intent_system,
    keyboard_to_intent_system, player_intent_clear_system, CameraYaw, Player, PlayerIntent,
    PreferredGamepad,
};
use crate::rapier_body::{ground_probe_filter, RapierPlayerBody};
use crate::size::{SizeChange, SizeChangeRequest, SizeController};

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementSet {
    Input,
    Session,
    Size,
    Tick,
    Emit,
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementConfig>()
            .init_resource::<PlayerIntent>()
            .init_resource::<CameraYaw>()
            .add_message::<SizeChangeRequest>()
            .add_message::<MovementEvent>()
            .configure_sets(
                Update,
                (
                    MovementSet::Input,
                    MovementSet::Session,
                    MovementSet::Size,
                    MovementSet::Tick,
                    MovementSet::Emit,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    apply_size_requests_system.in_set(MovementSet::Size),
                    player_movement_system.in_set(MovementSet::Tick),
                    emit_movement_events_system.in_set(MovementSet::Emit),
                ),
            )
            .add_systems(Update, log_movement_events_system.after(MovementSet::Emit));
    }
}

pub struct PlayerInputPlugin;

impl Plugin for PlayerInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PreferredGamepad>().add_systems(
            Update,
            (
                player_intent_clear_system,
                gamepad_connection_system,
                keyboard_to_intent_system,
                gamepad_to_intent_system,
                debug_size_keys_system,
            )
                .chain()
                .in_set(MovementSet::Input),
        );
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Apply the configured gravity to Rapier.
pub fn setup_physics_config(
    mut rapier: Query<&mut RapierConfiguration>,
    config: Res<MovementConfig>,
) {
    for mut cfg in rapier.iter_mut() {
        cfg.gravity = Vec3::Y * config.gravity;
    }
}

// ── Size ──────────────────────────────────────────────────────────────────────

/// Apply every pending [`SizeChangeRequest`] to the player, in order.
/// Requests at an extreme tier are no-ops.
pub fn apply_size_requests_system(
    mut requests: MessageReader<SizeChangeRequest>,
    mut q: Query<(&mut SizeController, &mut Collider, &mut MovementEvents), With<Player>>,
) {
    let Ok((mut size, mut collider, mut events)) = q.single_mut() else {
        requests.clear();
        return;
    };

    for request in requests.read() {
        match size.apply(*request, &mut *collider, &mut events) {
            SizeChange::Changed { from, to } => {
                info!("Size {} -> {}", from.label(), to.label());
            }
            SizeChange::Unchanged => {
                debug!(
                    "Size request {:?} ignored at {}",
                    request.direction,
                    size.tier().label()
                );
            }
        }
    }
}

// ── Tick ──────────────────────────────────────────────────────────────────────

/// Run one movement tick for each player.
///
/// The ground ray is cast here, from the body centre straight down to the
/// active profile's threshold, and handed to [`RapierPlayerBody`] as a
/// distance.  Without a Rapier context (headless apps) the tick is skipped.
#[allow(clippy::type_complexity)]
pub fn player_movement_system(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    yaw: Res<CameraYaw>,
    config: Res<MovementConfig>,
    rapier_context: ReadRapierContext,
    mut q: Query<
        (
            Entity,
            &Transform,
            &mut Velocity,
            &mut ExternalImpulse,
            Has<Collider>,
            &mut MovementController,
            &SizeController,
            &mut MovementEvents,
        ),
        With<Player>,
    >,
) {
    let Ok(rapier) = rapier_context.single() else {
        return;
    };

    let dt = time.delta_secs();
    let input = intent.to_input(yaw.0);
    let sensor = GroundSensor::new(config.ground_clearance);

    for (entity, transform, mut velocity, mut impulse, has_collider, mut movement, size, mut events) in
        q.iter_mut()
    {
        let origin = transform.translation;
        let ground_distance = rapier
            .cast_ray(
                origin,
                Vec3::NEG_Y,
                sensor.threshold(size.profile()),
                true,
                ground_probe_filter(entity),
            )
            .map(|(_, toi)| toi);

        let mut body = RapierPlayerBody {
            position: origin,
            velocity: &mut *velocity,
            impulse: &mut *impulse,
            has_collider,
            ground_distance,
        };
        movement.update(dt, &input, &mut body, size, &config, &mut events);
    }
}

// ── Emit ──────────────────────────────────────────────────────────────────────

/// Drain every player's event list into [`MovementEvent`] messages, preserving
/// per-player order.
pub fn emit_movement_events_system(
    mut q: Query<&mut MovementEvents>,
    mut writer: MessageWriter<MovementEvent>,
) {
    for mut events in q.iter_mut() {
        if events.is_empty() {
            continue;
        }
        for event in events.drain() {
            writer.write(event);
        }
    }
}

/// Stand-in audio / presentation consumer.
pub fn log_movement_events_system(mut reader: MessageReader<MovementEvent>) {
    for event in reader.read() {
        match event {
            MovementEvent::Jumped { double_jump } => debug!("jump (double: {double_jump})"),
            MovementEvent::Landed { fall_speed } => debug!("landed at {fall_speed:.2} u/s"),
            MovementEvent::Footstep => trace!("footstep"),
            MovementEvent::SizeChanged { tier, .. } => debug!("size now {}", tier.label()),
        }
    }
}
