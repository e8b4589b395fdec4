use crate::math::{from_na, to_na};
use bevy::{core_pipeline::tonemapping::Tonemapping, prelude::*};
use shared::{CAMERA_REFERENCE_FPS, CAMERA_START, FollowCameraSettings, follow_step};

/// Third-person follow camera. Has no target until a character is picked.
#[derive(Component, Debug, Default)]
pub struct FollowCamera {
    pub settings: FollowCameraSettings,
    pub target: Option<Entity>,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(PostUpdate, follow_target);
}

fn add_camera(mut commands: Commands) {
    let [x, y, z] = CAMERA_START;
    commands.spawn((
        Name::new("FollowCam"),
        Camera3d::default(),
        Tonemapping::AcesFitted,
        FollowCamera::default(),
        Transform::from_xyz(x, y, z).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn follow_target(
    time: Res<Time>,
    mut cameras: Query<(&FollowCamera, &mut Transform)>,
    targets: Query<&Transform, Without<FollowCamera>>,
) {
    let frame_scale = time.delta_secs() * CAMERA_REFERENCE_FPS;

    for (follow, mut cam_tf) in &mut cameras {
        let Some(target) = follow.target else {
            continue;
        };
        let Ok(target_tf) = targets.get(target) else {
            continue;
        };

        let (yaw, _, _) = target_tf.rotation.to_euler(EulerRot::YXZ);
        let next = follow_step(
            &follow.settings,
            to_na(cam_tf.translation),
            to_na(target_tf.translation),
            yaw,
            frame_scale,
        );
        cam_tf.translation = from_na(&next);
        cam_tf.look_at(target_tf.translation, Vec3::Y);
    }
}
