use rapier3d::control::{CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

use crate::constants::{CAPSULE_GROUND_CLEARANCE, CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS};
use crate::rapier_world::RapierQueryWorld;

/// Below this squared length a requested move is dropped.
const SMALLEST_MOVE_DISTANCE_SQ: f32 = 1.0e-10;

/// The four directional flags read once per frame.
///
/// Each flag is the OR of its two key bindings (letter key or arrow key).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionalInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionalInput {
    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }
}

/// Displacement for one frame: each held direction adds a `speed * dt` step on its axis.
///
/// Forward is -Z and right is +X. Steps are summed without normalisation, so holding
/// two perpendicular directions moves `sqrt(2)` times as far as holding one.
pub fn planar_displacement(input: DirectionalInput, speed_mps: f32, dt_seconds: f32) -> Vector<f32> {
    let step = speed_mps * dt_seconds;
    let mut delta = Vector::zeros();
    if input.forward {
        delta += vector![0.0, 0.0, -step];
    }
    if input.backward {
        delta += vector![0.0, 0.0, step];
    }
    if input.left {
        delta += vector![-step, 0.0, 0.0];
    }
    if input.right {
        delta += vector![step, 0.0, 0.0];
    }
    delta
}

/// Character controller configuration, in meters and degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerSettings {
    /// Gap kept between the capsule and obstacles. Small but non-zero for stability.
    pub offset: f32,
    pub max_slope_climb_deg: f32,
    pub min_slope_slide_deg: f32,
    /// Slide along obstacles instead of stopping dead.
    pub slide: bool,
    /// Increase if the character gets stuck when sliding.
    pub normal_nudge_factor: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            offset: 0.01,
            max_slope_climb_deg: 45.0,
            min_slope_slide_deg: 30.0,
            slide: true,
            normal_nudge_factor: 1.0e-4,
        }
    }
}

impl ControllerSettings {
    /// Rapier controller for planar walking: no autostep and no ground snapping, so a rig
    /// keeps its height and the 5 m stage is a wall.
    pub fn controller(&self) -> KinematicCharacterController {
        KinematicCharacterController {
            offset: CharacterLength::Absolute(self.offset),
            max_slope_climb_angle: self.max_slope_climb_deg.to_radians(),
            min_slope_slide_angle: self.min_slope_slide_deg.to_radians(),
            snap_to_ground: None,
            autostep: None,
            slide: self.slide,
            normal_nudge_factor: self.normal_nudge_factor,
            ..KinematicCharacterController::default()
        }
    }
}

/// Height of the collision capsule's center above the rig root.
pub fn capsule_center_height() -> f32 {
    CAPSULE_GROUND_CLEARANCE + CAPSULE_RADIUS + CAPSULE_HALF_HEIGHT
}

/// Move a rig root by `desired`, resolved against the static world.
///
/// Returns the new root translation.
pub fn move_with_collisions(
    world: &RapierQueryWorld,
    controller: &KinematicCharacterController,
    root: Vector<f32>,
    desired: Vector<f32>,
    dt_seconds: f32,
) -> Vector<f32> {
    if desired.norm_squared() <= SMALLEST_MOVE_DISTANCE_SQ {
        return root;
    }

    let center = root + vector![0.0, capsule_center_height(), 0.0];
    let query_pipeline = world.query_pipeline(QueryFilter::default());
    let corrected = controller.move_shape(
        dt_seconds,
        &query_pipeline,
        &Capsule::new_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS),
        &Isometry::translation(center.x, center.y, center.z),
        desired,
        |_| {},
    );

    root + corrected.translation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::essential_statics;
    use crate::constants::{MOVE_SPEED_MPS, STAGE_SIZE};

    const FORWARD: DirectionalInput = DirectionalInput {
        forward: true,
        backward: false,
        left: false,
        right: false,
    };

    #[test]
    fn idle_input_does_not_move() {
        let input = DirectionalInput::default();
        assert!(input.is_idle());
        assert_eq!(planar_displacement(input, MOVE_SPEED_MPS, 0.016), Vector::zeros());
    }

    #[test]
    fn each_direction_maps_to_its_axis() {
        let dt = 0.5;
        let step = MOVE_SPEED_MPS * dt;
        let cases = [
            (FORWARD, vector![0.0, 0.0, -step]),
            (
                DirectionalInput {
                    backward: true,
                    ..Default::default()
                },
                vector![0.0, 0.0, step],
            ),
            (
                DirectionalInput {
                    left: true,
                    ..Default::default()
                },
                vector![-step, 0.0, 0.0],
            ),
            (
                DirectionalInput {
                    right: true,
                    ..Default::default()
                },
                vector![step, 0.0, 0.0],
            ),
        ];
        for (input, expected) in cases {
            assert!((planar_displacement(input, MOVE_SPEED_MPS, dt) - expected).norm() < 1.0e-6);
        }
    }

    #[test]
    fn displacement_scales_with_frame_time() {
        let one = planar_displacement(FORWARD, MOVE_SPEED_MPS, 0.016).norm();
        let two = planar_displacement(FORWARD, MOVE_SPEED_MPS, 0.032).norm();
        assert!((two - 2.0 * one).abs() < 1.0e-6);
    }

    #[test]
    fn diagonal_moves_further_than_one_axis() {
        let diagonal = DirectionalInput {
            forward: true,
            right: true,
            ..Default::default()
        };
        let single = planar_displacement(FORWARD, MOVE_SPEED_MPS, 0.1).norm();
        let both = planar_displacement(diagonal, MOVE_SPEED_MPS, 0.1).norm();
        assert!(both > single);
        assert!((both - single * std::f32::consts::SQRT_2).abs() < 1.0e-5);
    }

    #[test]
    fn opposite_directions_cancel() {
        let input = DirectionalInput {
            forward: true,
            backward: true,
            left: true,
            right: true,
        };
        assert!(planar_displacement(input, MOVE_SPEED_MPS, 0.1).norm() < 1.0e-6);
    }

    #[test]
    fn open_ground_move_is_unobstructed() {
        let world = RapierQueryWorld::build(essential_statics());
        let controller = ControllerSettings::default().controller();
        let start = vector![100.0, 0.0, 100.0];
        let desired = vector![1.0, 0.0, -1.0];

        let end = move_with_collisions(&world, &controller, start, desired, 0.1);
        let moved = end - start;
        assert!((moved.x - desired.x).abs() < 1.0e-3);
        assert!((moved.z - desired.z).abs() < 1.0e-3);
    }

    #[test]
    fn stage_wall_blocks_the_rig() {
        let world = RapierQueryWorld::build(essential_statics());
        let controller = ControllerSettings::default().controller();
        let wall_x = -STAGE_SIZE * 0.5;
        let start = vector![wall_x - 10.0, 0.0, 0.0];

        let end = move_with_collisions(&world, &controller, start, vector![20.0, 0.0, 0.0], 0.1);
        assert!(end.x < wall_x - CAPSULE_RADIUS + 0.1, "went through: {}", end.x);
        assert!(end.x > start.x + 5.0, "barely moved: {}", end.x);
        assert!(end.y.abs() < 1.0e-3);
    }

    #[test]
    fn tiny_moves_are_dropped() {
        let world = RapierQueryWorld::empty();
        let controller = ControllerSettings::default().controller();
        let start = vector![1.0, 2.0, 3.0];
        assert_eq!(
            move_with_collisions(&world, &controller, start, Vector::zeros(), 0.016),
            start
        );
    }
}
