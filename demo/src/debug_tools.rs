//! Debug/performance tooling for native dev builds.
//!
//! This plugin is compiled/used only when the caller gates it behind `dev_native`
//! (`#[cfg(feature = "dev_native")] mod debug_tools;` in `main.rs`).

use crate::camera::CameraRigHost;
use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;

/// Marker for the rig state readout.
#[derive(Component)]
struct RigStatusText;

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, (spawn_perf_ui, spawn_rig_status));
    app.add_systems(Update, update_rig_status);
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

fn spawn_rig_status(mut commands: Commands) {
    commands.spawn((
        RigStatusText,
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
    ));
}

fn update_rig_status(
    host: NonSend<CameraRigHost>,
    mut text: Single<&mut Text, With<RigStatusText>>,
) {
    let rig = &host.rig;
    let mut status = format!(
        "phase: {:?}  aiming: {}  locked: {}\n",
        rig.phase(),
        host.aim.is_aiming(),
        host.lock.is_engaged(),
    );
    for entry in rig.position_stack().entries() {
        status.push_str(&format!(
            "pos  p{:<5} blend {:.2} rate {:+.2} {}\n",
            entry.priority,
            entry.blend,
            entry.blend_rate,
            if entry.active { "active" } else { "" },
        ));
    }
    for entry in rig.rotation_stack().entries() {
        status.push_str(&format!(
            "rot  p{:<5} blend {:.2} rate {:+.2} {}\n",
            entry.priority,
            entry.blend,
            entry.blend_rate,
            if entry.active { "active" } else { "" },
        ));
    }
    text.0 = status;
}
