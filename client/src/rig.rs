use crate::{camera::FollowCamera, math::srgba, session::Session};
use bevy::prelude::*;
use shared::{CharacterId, PartShape, PartSpec, SPAWN_POINT, rig_spec};

/// Root of a character rig. Children are the rig's primitive parts.
#[derive(Component, Debug)]
pub struct Rig {
    pub character: CharacterId,
}

/// Sent by the selection buttons.
#[derive(Message, Debug, Clone, Copy)]
pub struct SelectCharacter(pub CharacterId);

pub(super) fn plugin(app: &mut App) {
    app.add_message::<SelectCharacter>();
    app.add_systems(Update, on_select_character);
}

fn on_select_character(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut msgs: MessageReader<SelectCharacter>,
    mut session: ResMut<Session>,
    mut camera: Single<&mut FollowCamera>,
) {
    // Several clicks in one frame: the last one wins.
    let Some(&SelectCharacter(character)) = msgs.read().last() else {
        return;
    };

    if let Some(previous) = session.active_rig.take() {
        commands.entity(previous).despawn();
    }

    let rig = spawn_rig(&mut commands, &mut meshes, &mut materials, character);
    session.active_rig = Some(rig);
    camera.target = Some(rig);

    info!("Selected {character}, rig {rig}");
}

/// Spawn the rig for `character` at the spawn point and return its root.
pub fn spawn_rig(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    character: CharacterId,
) -> Entity {
    let spec = rig_spec(character);
    let [x, y, z] = SPAWN_POINT;
    debug!("Spawning {} with {} parts", spec.root_name, spec.part_count());

    commands
        .spawn((
            Name::new(spec.root_name),
            Rig { character },
            Transform::from_xyz(x, y, z),
            Visibility::default(),
        ))
        .with_children(|parent| {
            for part in spec.expanded() {
                parent.spawn((
                    Name::new(part.name),
                    Mesh3d(meshes.add(part_mesh(&part.shape))),
                    MeshMaterial3d(materials.add(part_material(&part))),
                    part_transform(&part),
                ));
            }
        })
        .id()
}

fn part_mesh(shape: &PartShape) -> Mesh {
    match *shape {
        PartShape::Box {
            width,
            height,
            depth,
        } => Cuboid::new(width, height, depth).into(),
        PartShape::Sphere { diameter } => Sphere::new(diameter * 0.5).mesh().uv(32, 18),
        PartShape::Cylinder {
            height,
            diameter_top,
            diameter_bottom,
        } => {
            if diameter_top == diameter_bottom {
                Cylinder::new(diameter_top * 0.5, height).into()
            } else if diameter_top <= 0.0 {
                Cone {
                    radius: diameter_bottom * 0.5,
                    height,
                }
                .into()
            } else {
                ConicalFrustum {
                    radius_top: diameter_top * 0.5,
                    radius_bottom: diameter_bottom * 0.5,
                    height,
                }
                .into()
            }
        }
        PartShape::Plane { width, height } => {
            Plane3d::new(Vec3::NEG_Z, Vec2::new(width * 0.5, height * 0.5)).into()
        }
    }
}

fn part_material(part: &PartSpec) -> StandardMaterial {
    let translucent = part.alpha < 1.0;
    StandardMaterial {
        base_color: srgba(part.color, part.alpha),
        alpha_mode: if translucent {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        // Planes have a single face; show it from both sides.
        double_sided: matches!(part.shape, PartShape::Plane { .. }),
        cull_mode: match part.shape {
            PartShape::Plane { .. } => None,
            _ => StandardMaterial::default().cull_mode,
        },
        perceptual_roughness: 0.8,
        ..default()
    }
}

fn part_transform(part: &PartSpec) -> Transform {
    let [rx, ry, rz] = part.rotation;
    Transform {
        translation: Vec3::from_array(part.offset),
        rotation: Quat::from_euler(EulerRot::YXZ, ry, rx, rz),
        scale: Vec3::from_array(part.scale),
    }
}
