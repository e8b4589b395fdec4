use std::collections::BTreeMap;

use crate::{
    input::{InputAction, directional_input},
    math::{from_na, to_na},
    rig::Rig,
    session::Session,
};
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use shared::{
    ControllerSettings, MOVE_SPEED_MPS, RapierQueryWorld, WorldStaticDef, move_with_collisions,
    planar_displacement, rapier_world::rapier3d::control::KinematicCharacterController,
};

/// Collidable arena statics and the query world built from them.
#[derive(Resource)]
pub struct CollisionWorld {
    statics: BTreeMap<u32, WorldStaticDef>,
    world: RapierQueryWorld,
    controller: KinematicCharacterController,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self {
            statics: BTreeMap::new(),
            world: RapierQueryWorld::empty(),
            controller: ControllerSettings::default().controller(),
        }
    }
}

impl CollisionWorld {
    /// Add statics, keyed by id. Ids already present are kept as they are.
    ///
    /// Returns the ids that were new; the query world is rebuilt only if there were any.
    pub fn insert_statics(&mut self, defs: impl IntoIterator<Item = WorldStaticDef>) -> Vec<u32> {
        let mut added = Vec::new();
        for def in defs {
            if self.statics.contains_key(&def.id) {
                continue;
            }
            added.push(def.id);
            self.statics.insert(def.id, def);
        }

        if !added.is_empty() {
            self.world = RapierQueryWorld::build(self.statics.values().cloned().collect());
            debug!(
                "Rebuilt collision world with {} colliders",
                self.world.collider_count()
            );
        }
        added
    }

    pub fn statics(&self) -> impl Iterator<Item = &WorldStaticDef> {
        self.statics.values()
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<CollisionWorld>();
    app.add_systems(Update, move_active_rig);
}

/// Per-frame movement of the active rig from the held directional keys.
fn move_active_rig(
    time: Res<Time>,
    actions: Res<ActionState<InputAction>>,
    session: Res<Session>,
    collision: Res<CollisionWorld>,
    mut rigs: Query<&mut Transform, With<Rig>>,
) {
    if session.code_field_focused {
        return;
    }
    let Some(rig) = session.active_rig else {
        return;
    };
    let Ok(mut transform) = rigs.get_mut(rig) else {
        return;
    };

    let input = directional_input(&actions);
    if input.is_idle() {
        return;
    }

    let dt = time.delta_secs();
    let desired = planar_displacement(input, MOVE_SPEED_MPS, dt);
    let next = move_with_collisions(
        &collision.world,
        &collision.controller,
        to_na(transform.translation),
        desired,
        dt,
    );
    transform.translation = from_na(&next);
}
