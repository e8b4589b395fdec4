use nalgebra::Vector3;

/// Third-person follow camera tuning.
///
/// `acceleration` and `max_speed` are per reference frame (see
/// [`CAMERA_REFERENCE_FPS`](crate::constants::CAMERA_REFERENCE_FPS)); callers pass a
/// `frame_scale` of `dt * fps` to stay frame-rate independent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowCameraSettings {
    /// Horizontal distance kept from the target.
    pub radius: f32,
    /// Height above the target.
    pub height_offset: f32,
    /// Angle around the target, in degrees, measured from the target's forward (-Z).
    /// 180 puts the camera behind the target.
    pub rotation_offset_deg: f32,
    /// Fraction of the remaining distance covered per reference frame (doubled on X/Z).
    pub acceleration: f32,
    /// Per-axis cap on the distance covered per reference frame.
    pub max_speed: f32,
}

impl Default for FollowCameraSettings {
    fn default() -> Self {
        Self {
            radius: 15.0,
            height_offset: 4.0,
            rotation_offset_deg: 180.0,
            acceleration: 0.05,
            max_speed: 20.0,
        }
    }
}

impl FollowCameraSettings {
    /// Where the camera wants to be for a target at `target` turned by `target_yaw` radians.
    pub fn desired_position(&self, target: Vector3<f32>, target_yaw: f32) -> Vector3<f32> {
        let angle = self.rotation_offset_deg.to_radians() + target_yaw;
        target
            + Vector3::new(
                -self.radius * angle.sin(),
                self.height_offset,
                -self.radius * angle.cos(),
            )
    }
}

/// Advance the camera one step toward its desired position behind the target.
pub fn follow_step(
    settings: &FollowCameraSettings,
    camera: Vector3<f32>,
    target: Vector3<f32>,
    target_yaw: f32,
    frame_scale: f32,
) -> Vector3<f32> {
    let delta = settings.desired_position(target, target_yaw) - camera;
    let frame_scale = frame_scale.max(0.0);
    // Compounded per reference frame so long frames never step past the desired point.
    let gain = |rate: f32| 1.0 - (1.0 - rate.clamp(0.0, 1.0)).powf(frame_scale);
    let planar = gain(settings.acceleration * 2.0);
    let vertical = gain(settings.acceleration);
    let cap = settings.max_speed * frame_scale;
    let clamp = |v: f32| v.clamp(-cap, cap);

    camera
        + Vector3::new(
            clamp(delta.x * planar),
            clamp(delta.y * vertical),
            clamp(delta.z * planar),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offset_sits_behind_and_above() {
        let settings = FollowCameraSettings::default();
        let desired = settings.desired_position(Vector3::new(1.0, 0.0, 2.0), 0.0);
        assert!((desired - Vector3::new(1.0, 4.0, 17.0)).norm() < 1.0e-4);
    }

    #[test]
    fn converges_on_the_desired_position() {
        let settings = FollowCameraSettings::default();
        let target = Vector3::new(5.0, 0.0, -3.0);
        let mut camera = Vector3::new(0.0, 10.0, -10.0);
        for _ in 0..2000 {
            camera = follow_step(&settings, camera, target, 0.0, 1.0);
        }
        assert!((camera - settings.desired_position(target, 0.0)).norm() < 1.0e-2);
    }

    #[test]
    fn step_is_capped_per_axis() {
        let settings = FollowCameraSettings::default();
        let camera = Vector3::zeros();
        let next = follow_step(&settings, camera, Vector3::new(10_000.0, 0.0, 0.0), 0.0, 1.0);
        assert!((next.x - settings.max_speed).abs() < 1.0e-4);
        assert!(next.z.abs() <= settings.max_speed + 1.0e-4);
    }

    #[test]
    fn long_frames_do_not_overshoot() {
        let settings = FollowCameraSettings::default();
        let target = Vector3::zeros();
        let desired = settings.desired_position(target, 0.0);
        let camera = desired + Vector3::new(3.0, -2.0, -4.0);

        for frame_scale in [1.0, 10.0, 30.0, 120.0] {
            let next = follow_step(&settings, camera, target, 0.0, frame_scale);
            for axis in 0..3 {
                let before = camera[axis] - desired[axis];
                let after = next[axis] - desired[axis];
                assert!(after.abs() <= before.abs() + 1.0e-4, "axis {axis} at {frame_scale}");
                assert!(after * before >= -1.0e-4, "axis {axis} crossed at {frame_scale}");
            }
        }
    }

    #[test]
    fn one_reference_frame_matches_the_nominal_rate() {
        let settings = FollowCameraSettings::default();
        let target = Vector3::zeros();
        let desired = settings.desired_position(target, 0.0);
        let camera = desired + Vector3::new(1.0, 1.0, 1.0);

        let next = follow_step(&settings, camera, target, 0.0, 1.0);
        let moved = next - camera;
        assert!((moved.x + settings.acceleration * 2.0).abs() < 1.0e-5);
        assert!((moved.y + settings.acceleration).abs() < 1.0e-5);
    }

    #[test]
    fn zero_frame_scale_holds_still() {
        let settings = FollowCameraSettings::default();
        let camera = Vector3::new(3.0, 3.0, 3.0);
        assert_eq!(
            follow_step(&settings, camera, Vector3::zeros(), 0.0, 0.0),
            camera
        );
    }
}
