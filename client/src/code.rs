use crate::{
    math::{from_na, to_na},
    rig::Rig,
    session::Session,
};
use bevy::prelude::*;
use shared::codec;

/// Shown to the player whenever a code cannot be applied.
pub const INVALID_CODE_MESSAGE: &str = "Invalid game code!";

/// Request to show a code for the active rig's position.
#[derive(Message, Debug, Clone, Copy)]
pub struct GenerateCode;

/// Request to apply the code currently typed into the code field.
#[derive(Message, Debug, Clone, Copy)]
pub struct ApplyCode;

/// Text typed into the code field.
#[derive(Resource, Debug, Default)]
pub struct CodeInput(pub String);

/// What the code panel currently displays.
#[derive(Resource, Debug, Default)]
pub struct CodeStatus {
    pub generated: Option<String>,
    pub error: Option<&'static str>,
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<CodeInput>();
    app.init_resource::<CodeStatus>();
    app.add_message::<GenerateCode>();
    app.add_message::<ApplyCode>();
    app.add_systems(Update, (on_generate_code, on_apply_code));
}

fn on_generate_code(
    mut msgs: MessageReader<GenerateCode>,
    session: Res<Session>,
    rigs: Query<(&Transform, &Rig)>,
    mut status: ResMut<CodeStatus>,
) {
    for _ in msgs.read() {
        let Some(rig) = session.active_rig else {
            debug!("No active rig to generate a code for");
            continue;
        };
        let Ok((transform, rig)) = rigs.get(rig) else {
            continue;
        };

        let code = codec::encode(to_na(transform.translation));
        info!("Generated position code {code} for {}", rig.character);
        status.generated = Some(code);
        status.error = None;
    }
}

/// Overwrite the active rig's position from the typed code, bypassing collision.
fn on_apply_code(
    mut msgs: MessageReader<ApplyCode>,
    input: Res<CodeInput>,
    session: Res<Session>,
    mut rigs: Query<&mut Transform, With<Rig>>,
    mut status: ResMut<CodeStatus>,
) {
    for _ in msgs.read() {
        let code = input.0.trim();
        if code.is_empty() {
            continue;
        }
        let Some(rig) = session.active_rig else {
            continue;
        };
        let Ok(mut transform) = rigs.get_mut(rig) else {
            continue;
        };

        match codec::decode(code) {
            Ok(position) => {
                transform.translation = from_na(&position);
                status.error = None;
                info!("Applied position code, rig now at {}", transform.translation);
            }
            Err(err) => {
                warn!("Rejected position code: {err}");
                status.error = Some(INVALID_CODE_MESSAGE);
            }
        }
    }
}
