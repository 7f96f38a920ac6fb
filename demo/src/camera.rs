use crate::{
    config::DemoConfig,
    input::InputAction,
    player::{self, Player},
    transform::{apply_iso, to_iso},
};
use bevy::{
    camera::Exposure,
    pbr::{AtmosphereMode, AtmosphereSettings},
    prelude::*,
};
use camera_rig::{
    AimController, Anchor, CameraLock, CameraRig, Iso, Quat as RigQuat, RigError,
    Vec3 as RigVec3,
};
use leafwing_input_manager::prelude::*;

/// Where the security-camera lock looks from.
pub const LOCK_MARKER: Vec3 = Vec3::new(9.0, 5.0, 9.0);

/// Weapon placement relative to the eye while aiming.
const AIM_POSE: RigVec3 = RigVec3::new(0.0, -0.1, -0.5);
/// Slight inward cant of the weapon in the aim pose, radians.
const AIM_CANT: f32 = 0.15;

/// Ordering of the fixed-step rig work.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigSystems {
    /// Move the player and write the world anchors the rig reads.
    Anchors,
    Tick,
}

/// Everything the rig needs on the host side. Not `Send`: the rig shares its sources
/// through `Rc`, so this lives as a non-send resource on the main thread.
pub struct CameraRigHost {
    pub rig: CameraRig,
    pub head: Anchor,
    pub weapon_root: Anchor,
    pub lock: CameraLock,
    pub aim: AimController,
}

impl CameraRigHost {
    pub fn new(config: &DemoConfig) -> Result<Self, RigError> {
        let head = Anchor::default();
        let rig = CameraRig::builder()
            .reference_frame(Iso::identity())
            .body_anchor(head.clone())
            .settings(config.rig)
            .build()?;

        let weapon_root = Anchor::default();
        let mut aim = AimController::new(weapon_root.clone(), config.aim);
        aim.set_pose(
            AIM_POSE,
            RigQuat::from_axis_angle(&RigVec3::z_axis(), AIM_CANT),
        );

        let marker = Transform::from_translation(LOCK_MARKER).looking_at(Vec3::ZERO, Vec3::Y);
        let lock = CameraLock::new(Anchor::new(to_iso(&marker)), config.lock);

        Ok(Self {
            rig,
            head,
            weapon_root,
            lock,
            aim,
        })
    }
}

/// The camera whose transform the rig drives.
#[derive(Component)]
pub struct RigCamera;

pub(super) fn plugin(app: &mut App) {
    app.configure_sets(FixedUpdate, (RigSystems::Anchors, RigSystems::Tick).chain());

    app.add_systems(Startup, add_camera);
    app.add_systems(PostStartup, (player::write_anchors, start_rig).chain());
    app.add_systems(FixedUpdate, tick_rig.in_set(RigSystems::Tick));
    app.add_systems(Update, (handle_camera_actions, present_rig).chain());
}

fn add_camera(mut commands: Commands) {
    commands.spawn((
        RigCamera,
        Exposure { ev100: 16.0 },
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        Transform::default(),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                1000.0, // Fog distance
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
        AtmosphereSettings {
            rendering_method: AtmosphereMode::Raymarched,
            ..default()
        },
    ));
}

/// Snaps the rig onto the freshly spawned player so the first frame doesn't sweep in
/// from the origin.
fn start_rig(mut host: NonSendMut<CameraRigHost>, player: Single<&Transform, With<Player>>) {
    if let Err(err) = host.rig.set_reference_frame(to_iso(&player)) {
        error!("player spawned with an invalid pose: {err}");
        return;
    }
    host.rig.start();
}

fn tick_rig(
    time: Res<Time>,
    mut host: NonSendMut<CameraRigHost>,
    player: Single<&Transform, With<Player>>,
) {
    if let Err(err) = host.rig.set_reference_frame(to_iso(&player)) {
        warn!("skipping rig tick: {err}");
        return;
    }
    host.aim.update(time.delta_secs());
    host.rig.fixed_tick(time.delta_secs());
}

fn handle_camera_actions(
    actions: Res<ActionState<InputAction>>,
    mut host: NonSendMut<CameraRigHost>,
) {
    let CameraRigHost { rig, lock, aim, .. } = &mut *host;

    if actions.just_pressed(&InputAction::Aim) {
        aim.aim(rig);
    }
    if actions.just_released(&InputAction::Aim) {
        aim.stop_aim(rig);
    }

    if actions.just_pressed(&InputAction::ToggleLock) {
        if lock.is_engaged() {
            lock.release(rig);
        } else {
            lock.engage(rig);
        }
    }
    if actions.just_pressed(&InputAction::DropLock) {
        lock.release_instant(rig);
    }
}

fn present_rig(
    time: Res<Time>,
    mut host: NonSendMut<CameraRigHost>,
    mut camera: Single<&mut Transform, With<RigCamera>>,
) {
    host.rig.render_frame(time.delta_secs());
    apply_iso(&mut camera, &host.rig.world_transform());
}
