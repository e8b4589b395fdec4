//! Rapier-based query world for the arena's collidable statics.
//!
//! The arena never moves once built, so the query structures are built once from a list
//! of static definitions and rebuilt only when the list changes (arena generation).
//! Nothing here steps a simulation; it only backs scene queries and the Rapier
//! `KinematicCharacterController`.

// Re-export Rapier so the client can name controller/query types without its own dependency.
pub use rapier3d;

use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::prelude::*;

/// Immutable collidable volume of the arena.
///
/// Conventions
/// - Units are meters.
/// - For planes the normal is `rotation * +Y` and
///   `dist = dot(normal, translation) + offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable identifier; also fixes insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
}

impl WorldStaticDef {
    /// Axis-aligned static at `translation`.
    pub fn at(id: u32, translation: Vector<f32>, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
        }
    }
}

/// Collider shapes the arena uses.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space). The rendered floor size is a mesh concern only.
    Plane { offset_along_normal: f32 },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },
}

/// Rapier sets plus the phases needed to hand out a borrowed `QueryPipeline`.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build a query world from static definitions, inserted in `id` order.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in defs.into_iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            let collider = collider_from_def(&def);
            colliders.insert_with_parent(collider, rb_handle, &mut bodies);
        }

        // Collision detection only (no dynamics): fills the BVH and contact graph.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();

        let hooks = ();
        let events = ();

        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &hooks,
            &events,
        );

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    /// An empty world; every move is unobstructed.
    pub fn empty() -> Self {
        Self::build(Vec::new())
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Borrowed `QueryPipeline` view for scene queries and the KCC.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }
}

impl Default for RapierQueryWorld {
    fn default() -> Self {
        Self::empty()
    }
}

/// Build a collider with identity local transform; the pose lives on the parent body.
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // The parent body already carries the pose, so only the offset along the
            // normal is applied locally.
            let halfspace = HalfSpace::new(Vector::y_axis());
            ColliderBuilder::new(SharedShape::new(halfspace))
                .translation(Vector::y() * *offset_along_normal)
                .build()
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_one_collider_per_def() {
        let world = RapierQueryWorld::build(vec![
            WorldStaticDef::at(
                2,
                vector![0.0, 2.5, 0.0],
                ColliderShapeDef::Cuboid {
                    half_extents: vector![60.0, 2.5, 60.0],
                },
            ),
            WorldStaticDef::at(
                1,
                Vector::zeros(),
                ColliderShapeDef::Plane {
                    offset_along_normal: 0.0,
                },
            ),
        ]);
        assert_eq!(world.collider_count(), 2);
        assert_eq!(world.bodies.len(), 2);
    }

    #[test]
    fn empty_world_has_no_colliders() {
        assert_eq!(RapierQueryWorld::default().collider_count(), 0);
    }
}
