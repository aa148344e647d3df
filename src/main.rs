use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;
use std::env;

use sizeshift::config::{self, MovementConfig};
use sizeshift::graphics;
use sizeshift::level;
use sizeshift::pickup::PickupPlugin;
use sizeshift::player;
use sizeshift::session::{ChapterCatalog, ChapterId, Checkpoint, CurrentChapter, SessionPlugin};
use sizeshift::simulation::{self, MovementPlugin, PlayerInputPlugin};

/// `SIZESHIFT_CHAPTER=<n>` starts in chapter `n` instead of the first one.
fn starting_chapter_from_env(
    catalog: Res<ChapterCatalog>,
    mut current: ResMut<CurrentChapter>,
    mut checkpoint: ResMut<Checkpoint>,
) {
    let Ok(raw) = env::var("SIZESHIFT_CHAPTER") else {
        return;
    };
    let Ok(n) = raw.trim().parse::<u32>() else {
        warn!("SIZESHIFT_CHAPTER={raw:?} is not a chapter number; ignoring");
        return;
    };
    match catalog.resolve(ChapterId(n)) {
        Ok(chapter) => {
            current.0 = chapter.id;
            checkpoint.0 = chapter.spawn;
            info!("Starting in chapter {:?} ({})", chapter.id, chapter.name);
        }
        Err(e) => warn!("{e}; starting in the default chapter"),
    }
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Sizeshift".into(),
            resolution: WindowResolution::new(1280, 720),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.9)))
    // Compiled defaults; load_movement_config overwrites them from
    // assets/movement.toml (if present) in the Startup schedule.
    .insert_resource(MovementConfig::default())
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
    .add_plugins((MovementPlugin, PlayerInputPlugin, SessionPlugin, PickupPlugin))
    .add_systems(
        Startup,
        (
            // Load config first so every other startup system sees the final values.
            config::load_movement_config,
            simulation::setup_physics_config.after(config::load_movement_config),
            graphics::setup_camera,
            level::spawn_course,
            starting_chapter_from_env,
            player::spawn_player
                .after(config::load_movement_config)
                .after(starting_chapter_from_env),
        ),
    )
    .add_systems(
        Update,
        (
            graphics::attach_player_model_system,
            graphics::sync_player_model_scale_system.after(simulation::MovementSet::Emit),
            graphics::camera_follow_system.after(simulation::MovementSet::Tick),
            graphics::fade_overlay_system,
        ),
    );

    app.run();
}
