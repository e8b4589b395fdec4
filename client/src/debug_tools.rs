//! Debug/performance tooling for native dev builds.
//!
//! Perf overlay plus collider gizmos for the arena statics and the active rig's capsule.
//! F3 toggles the gizmos.

use crate::{movement::CollisionWorld, session::Session};
use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;
use shared::{
    ColliderShapeDef, capsule_center_height,
    constants::{CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS},
};

const STATIC_GIZMO: Color = Color::srgb(1.0, 0.6, 0.1);
const CAPSULE_GIZMO: Color = Color::srgb(0.2, 1.0, 0.4);

#[derive(Resource, Debug)]
struct ShowColliders(bool);

impl Default for ShowColliders {
    fn default() -> Self {
        Self(true)
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.init_resource::<ShowColliders>();
    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(
        Update,
        (
            toggle_colliders,
            draw_colliders.run_if(|show: Res<ShowColliders>| show.0),
        )
            .chain(),
    );
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

fn toggle_colliders(keys: Res<ButtonInput<KeyCode>>, mut show: ResMut<ShowColliders>) {
    if keys.just_pressed(KeyCode::F3) {
        show.0 = !show.0;
    }
}

fn draw_colliders(
    mut gizmos: Gizmos,
    collision: Res<CollisionWorld>,
    session: Res<Session>,
    rigs: Query<&Transform>,
) {
    // Planes are unbounded; the floor mesh already shows where they are.
    for def in collision.statics() {
        if let ColliderShapeDef::Cuboid { half_extents } = &def.shape {
            let transform = Transform::from_xyz(def.translation.x, def.translation.y, def.translation.z)
                .with_scale(Vec3::new(half_extents.x, half_extents.y, half_extents.z) * 2.0);
            gizmos.cuboid(transform, STATIC_GIZMO);
        }
    }

    let Some(rig) = session.active_rig else {
        return;
    };
    let Ok(transform) = rigs.get(rig) else {
        return;
    };
    let center = transform.translation + Vec3::Y * capsule_center_height();
    gizmos.primitive_3d(
        &Capsule3d::new(CAPSULE_RADIUS, CAPSULE_HALF_HEIGHT * 2.0),
        Isometry3d::from_translation(center),
        CAPSULE_GIZMO,
    );
}
