use bevy::prelude::*;

/// Per-session player context read by the movement step and the UI handlers.
#[derive(Resource, Debug, Default)]
pub struct Session {
    /// Root entity of the rig the player controls, once a character has been picked.
    pub active_rig: Option<Entity>,
    /// While the code field has focus, key presses are text, not movement.
    pub code_field_focused: bool,
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Session>();
}
