//! Camera, player model and fade overlay.
//!
//! None of this feeds back into movement.  The model is a child of the player
//! body so it can be scaled freely; scaling the body's own `Transform` would
//! also scale its collider.

use bevy::prelude::*;

use crate::events::MovementEvent;
use crate::player::{CameraYaw, Player};
use crate::session::{PendingChapterLoad, PendingRespawn};
use crate::size::SizeController;

/// Camera distance behind and above the player at scale 1.
const CAMERA_BACK: f32 = 8.0;
const CAMERA_UP: f32 = 3.0;

#[derive(Component)]
pub struct PlayerModel;

#[derive(Component)]
pub struct FadeOverlay;

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, CAMERA_UP, CAMERA_BACK).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        FadeOverlay,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::BLACK.with_alpha(0.0)),
    ));
    info!("Camera spawned");
}

/// Orbit behind the player at the current [`CameraYaw`], pulled back in
/// proportion to the active size.
pub fn camera_follow_system(
    q_player: Query<(&Transform, &SizeController), With<Player>>,
    mut q_camera: Query<&mut Transform, (With<Camera3d>, Without<Player>)>,
    yaw: Res<CameraYaw>,
) {
    let Ok((player, size)) = q_player.single() else {
        return;
    };
    let Ok(mut cam) = q_camera.single_mut() else {
        return;
    };

    let scale = size.profile().scale;
    let offset = Quat::from_rotation_y(yaw.0) * Vec3::new(0.0, CAMERA_UP, CAMERA_BACK) * scale;
    cam.translation = player.translation + offset;
    cam.look_at(player.translation, Vec3::Y);
}

/// Give a freshly spawned player a visible capsule, built at Normal size.
pub fn attach_player_model_system(
    mut commands: Commands,
    query: Query<(Entity, &SizeController), Added<Player>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, size) in query.iter() {
        let normal = size.profiles().normal;
        let mesh = meshes.add(Capsule3d::new(
            normal.capsule_radius,
            normal.capsule_height - 2.0 * normal.capsule_radius,
        ));
        let material = materials.add(Color::srgb(0.95, 0.55, 0.2));
        let scale = size.profile().scale / normal.scale;

        commands.entity(entity).with_children(|parent| {
            parent.spawn((
                PlayerModel,
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_scale(Vec3::splat(scale)),
            ));
        });
    }
}

/// Rescale the model whenever the size tier changes.
pub fn sync_player_model_scale_system(
    mut reader: MessageReader<MovementEvent>,
    q_player: Query<&SizeController, With<Player>>,
    mut q_model: Query<&mut Transform, With<PlayerModel>>,
) {
    let Some(profile) = reader.read().fold(None, |last, event| match event {
        MovementEvent::SizeChanged { profile, .. } => Some(*profile),
        _ => last,
    }) else {
        return;
    };
    let Ok(size) = q_player.single() else {
        return;
    };

    let scale = profile.scale / size.profiles().normal.scale;
    for mut transform in q_model.iter_mut() {
        transform.scale = Vec3::splat(scale);
    }
}

/// Darken the screen while a respawn or chapter load is fading.
pub fn fade_overlay_system(
    respawn: Res<PendingRespawn>,
    chapter: Res<PendingChapterLoad>,
    mut q: Query<&mut BackgroundColor, With<FadeOverlay>>,
) {
    let alpha = if respawn.0.is_some() || chapter.0.is_some() {
        1.0
    } else {
        0.0
    };
    for mut color in q.iter_mut() {
        color.0.set_alpha(alpha);
    }
}
