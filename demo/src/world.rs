use crate::camera::LOCK_MARKER;
use bevy::prelude::*;

const PILLARS: usize = 12;
const PILLAR_RING: f32 = 11.0;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("World setup");

    commands.spawn((
        // Ground
        Transform::from_xyz(0., 0., 0.),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(50., 50.).build())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::linear_rgb(0.2, 0.3, 0.25),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
    ));

    // Pillars outside the patrol circle, so walking and head bob read clearly.
    let pillar = meshes.add(Cuboid::new(1.0, 3.0, 1.0));
    let stone = materials.add(Color::srgb_u8(124, 144, 255));
    for i in 0..PILLARS {
        let angle = i as f32 / PILLARS as f32 * std::f32::consts::TAU;
        commands.spawn((
            Mesh3d(pillar.clone()),
            MeshMaterial3d(stone.clone()),
            Transform::from_xyz(angle.cos() * PILLAR_RING, 1.5, angle.sin() * PILLAR_RING),
        ));
    }

    // Security camera housing at the lock point.
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(0.4, 0.3, 0.6))),
        MeshMaterial3d(materials.add(Color::srgb_u8(40, 40, 40))),
        Transform::from_translation(LOCK_MARKER + Vec3::Y * 0.5),
    ));

    // light
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            range: 60.0,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));
}
