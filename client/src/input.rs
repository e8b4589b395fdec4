use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use shared::DirectionalInput;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map
        .insert(InputAction::MoveForward, KeyCode::KeyW)
        .insert(InputAction::MoveForward, KeyCode::ArrowUp)
        .insert(InputAction::MoveBackward, KeyCode::KeyS)
        .insert(InputAction::MoveBackward, KeyCode::ArrowDown)
        .insert(InputAction::MoveLeft, KeyCode::KeyA)
        .insert(InputAction::MoveLeft, KeyCode::ArrowLeft)
        .insert(InputAction::MoveRight, KeyCode::KeyD)
        .insert(InputAction::MoveRight, KeyCode::ArrowRight);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());
}

/// Directional flags for this frame. Either binding of a direction counts.
pub fn directional_input(actions: &ActionState<InputAction>) -> DirectionalInput {
    DirectionalInput {
        forward: actions.pressed(&InputAction::MoveForward),
        backward: actions.pressed(&InputAction::MoveBackward),
        left: actions.pressed(&InputAction::MoveLeft),
        right: actions.pressed(&InputAction::MoveRight),
    }
}
