//! Size pickups.
//!
//! A pickup is a fixed sensor ball.  When the player's capsule starts
//! overlapping it, [`size_pickup_collection_system`] writes a
//! [`SizeChangeRequest`] and, unless the pickup is reusable, despawns it.
//! The request is applied later in the same frame by
//! [`crate::simulation::apply_size_requests_system`].

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::player::Player;
use crate::simulation::{apply_size_requests_system, MovementSet};
use crate::size::{SizeChangeRequest, SizeDirection};

const PICKUP_RADIUS: f32 = 0.6;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePickup {
    pub direction: SizeDirection,
    /// Stays in the world after being touched.
    pub reusable: bool,
}

pub struct PickupPlugin;

impl Plugin for PickupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            size_pickup_collection_system
                .in_set(MovementSet::Size)
                .before(apply_size_requests_system),
        );
    }
}

pub fn spawn_size_pickup(
    commands: &mut Commands,
    position: Vec3,
    direction: SizeDirection,
    reusable: bool,
) -> Entity {
    commands
        .spawn((
            SizePickup {
                direction,
                reusable,
            },
            Transform::from_translation(position),
            Visibility::default(),
            Collider::ball(PICKUP_RADIUS),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id()
}

pub fn size_pickup_collection_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    q_pickup: Query<&SizePickup>,
    q_player: Query<Entity, With<Player>>,
    mut requests: MessageWriter<SizeChangeRequest>,
) {
    let Ok(player_entity) = q_player.single() else {
        return;
    };

    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        let pickup_entity = if e2 == player_entity {
            e1
        } else if e1 == player_entity {
            e2
        } else {
            continue;
        };
        let Ok(pickup) = q_pickup.get(pickup_entity) else {
            continue;
        };

        requests.write(SizeChangeRequest {
            direction: pickup.direction,
        });
        debug!("Picked up {:?} at {:?}", pickup.direction, pickup_entity);

        if !pickup.reusable {
            commands.entity(pickup_entity).despawn();
        }
    }
}
