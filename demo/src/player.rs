use crate::{
    camera::{CameraRigHost, RigSystems},
    transform::{from_rig_quat, to_iso},
};
use bevy::prelude::*;
use std::f32::consts::TAU;

/// The walking body the camera rides on.
#[derive(Component)]
pub struct Player;

/// Progress around the patrol circle, radians.
#[derive(Component, Default)]
pub struct Stride {
    pub angle: f32,
}

const PATROL_RADIUS: f32 = 8.0;
const WALK_SPEED: f32 = 1.6;
const EYE_HEIGHT: f32 = 1.6;
const BOB_AMPLITUDE: f32 = 0.04;
const STEPS_PER_LAP: f32 = 24.0;
/// Weapon root in the player's space.
const HAND_OFFSET: Vec3 = Vec3::new(0.25, 1.4, -0.5);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_player);
    app.add_systems(
        FixedUpdate,
        (walk, write_anchors).chain().in_set(RigSystems::Anchors),
    );
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let stride = Stride::default();
    commands.spawn((
        Player,
        patrol_pose(stride.angle),
        stride,
        Mesh3d(meshes.add(Capsule3d::new(0.3, 1.2))),
        MeshMaterial3d(materials.add(Color::srgb_u8(220, 140, 90))),
    ));
}

/// Pose on the patrol circle, facing along the direction of travel.
fn patrol_pose(angle: f32) -> Transform {
    let (sin, cos) = angle.sin_cos();
    let position = Vec3::new(cos, 0.0, sin) * PATROL_RADIUS;
    let heading = Vec3::new(-sin, 0.0, cos);
    Transform::from_translation(position).looking_to(heading, Vec3::Y)
}

fn head_height(angle: f32) -> f32 {
    let steps = angle / TAU * STEPS_PER_LAP;
    EYE_HEIGHT + BOB_AMPLITUDE * (steps * TAU).sin().abs()
}

fn walk(time: Res<Time>, player: Single<(&mut Transform, &mut Stride), With<Player>>) {
    let (mut transform, mut stride) = player.into_inner();
    stride.angle = (stride.angle + WALK_SPEED / PATROL_RADIUS * time.delta_secs()) % TAU;
    *transform = patrol_pose(stride.angle);
}

/// Publishes the head and weapon poses for the rig's next fixed tick.
pub fn write_anchors(
    host: NonSend<CameraRigHost>,
    player: Single<(&Transform, &Stride), With<Player>>,
) {
    let (transform, stride) = *player;

    let mut head = *transform;
    head.translation = transform.transform_point(Vec3::Y * head_height(stride.angle));
    host.head.set(to_iso(&head));

    let mut hand = *transform;
    hand.translation = transform.transform_point(HAND_OFFSET);
    hand.rotation = transform.rotation * from_rig_quat(&host.aim.pose_rotation());
    host.weapon_root.set(to_iso(&hand));
}
