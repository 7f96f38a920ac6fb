use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Held to aim down sights.
    Aim,
    /// Engage or release the security-camera lock.
    ToggleLock,
    /// Cut straight back to first person.
    DropLock,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::Aim, MouseButton::Right);
    input_map.insert(InputAction::ToggleLock, KeyCode::KeyC);
    input_map.insert(InputAction::DropLock, KeyCode::KeyX);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());
}
