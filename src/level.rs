//! The test course: one strip of geometry per chapter.
//!
//! | Chapter | Spawn | Obstacle |
//! |---------|-------|----------|
//! | 1 Threshold  | `(0, 2, 0)`    | stepped blocks and a gap wide enough to need a double jump |
//! | 2 Crawlspace | `(0, 2, -40)`  | a low tunnel only the Small tier fits through |
//! | 3 Canopy     | `(30, 8, -40)` | a high ledge only the Large tier's jump reaches |

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::pickup::spawn_size_pickup;
use crate::size::SizeDirection;

/// An axis-aligned static box.
struct Block {
    center: Vec3,
    half: Vec3,
    color: Color,
}

impl Block {
    fn new(center: Vec3, half: Vec3, color: Color) -> Self {
        Self {
            center,
            half,
            color,
        }
    }
}

fn course_blocks() -> Vec<Block> {
    let ground = Color::srgb(0.35, 0.4, 0.35);
    let stone = Color::srgb(0.55, 0.55, 0.6);
    let wood = Color::srgb(0.5, 0.35, 0.2);

    vec![
        // Threshold
        Block::new(Vec3::new(0.0, -0.5, -5.0), Vec3::new(6.0, 0.5, 10.0), ground),
        Block::new(Vec3::new(3.0, 0.5, -8.0), Vec3::new(1.5, 0.5, 1.5), stone),
        Block::new(Vec3::new(3.0, 1.0, -11.0), Vec3::new(1.5, 1.0, 1.5), stone),
        Block::new(Vec3::new(0.0, -0.5, -25.0), Vec3::new(6.0, 0.5, 4.0), ground),
        // Crawlspace
        Block::new(Vec3::new(0.0, -0.5, -45.0), Vec3::new(6.0, 0.5, 10.0), ground),
        Block::new(Vec3::new(-3.5, 1.5, -48.0), Vec3::new(2.5, 1.5, 3.0), wood),
        Block::new(Vec3::new(3.5, 1.5, -48.0), Vec3::new(2.5, 1.5, 3.0), wood),
        // Tunnel roof at y = 1.3: too low for Normal (2.0), fine for Small (1.0).
        Block::new(Vec3::new(0.0, 2.15, -48.0), Vec3::new(1.0, 0.85, 3.0), wood),
        // Canopy
        Block::new(Vec3::new(30.0, 5.5, -40.0), Vec3::new(5.0, 0.5, 5.0), ground),
        Block::new(Vec3::new(30.0, 8.0, -49.0), Vec3::new(3.0, 0.5, 3.0), stone),
    ]
}

/// Startup system: build every chapter's geometry and pickups.
pub fn spawn_course(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let blocks = course_blocks();
    for block in &blocks {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(block.half * 2.0))),
            MeshMaterial3d(materials.add(block.color)),
            Transform::from_translation(block.center),
            RigidBody::Fixed,
            Collider::cuboid(block.half.x, block.half.y, block.half.z),
        ));
    }

    let pickup_mesh = meshes.add(Sphere::new(0.4));
    let grow = materials.add(Color::srgb(0.3, 0.9, 0.3));
    let shrink = materials.add(Color::srgb(0.9, 0.3, 0.6));
    let pickups = [
        (Vec3::new(0.0, 1.0, -40.0), SizeDirection::Shrink, true, &shrink),
        (Vec3::new(0.0, 1.0, -55.0), SizeDirection::Grow, true, &grow),
        (Vec3::new(30.0, 7.0, -38.0), SizeDirection::Grow, false, &grow),
    ];
    for (position, direction, reusable, material) in pickups {
        let entity = spawn_size_pickup(&mut commands, position, direction, reusable);
        commands
            .entity(entity)
            .insert((Mesh3d(pickup_mesh.clone()), MeshMaterial3d(material.clone())));
    }

    info!(
        "Course spawned: {} blocks, {} pickups",
        blocks.len(),
        pickups.len()
    );
}
