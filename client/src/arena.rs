//! Arena scene: lights and floor at startup, the stage on demand, decorations and the
//! skybox after a short delay.

use crate::{camera::FollowCamera, math::srgb, movement::CollisionWorld};
use bevy::{
    asset::LoadState,
    core_pipeline::Skybox,
    prelude::*,
    render::render_resource::{TextureViewDescriptor, TextureViewDimension},
};
use shared::{
    ArenaProgress, ColliderShapeDef, DecorationKind, SKYBOX_CUBEMAP_PATH, SKYBOX_SIZE,
    WorldStaticDef, arena::{FLOOR_COLOR, STAGE_COLOR},
    constants::FLOOR_SIZE, decoration_sets, essential_statics, floor_static,
};

/// Arena generation progress for this session.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct Arena(pub ArenaProgress);

/// Sent by the "generate arena" control.
#[derive(Message, Debug, Clone, Copy)]
pub struct GenerateArena;

/// Visual of a collidable static, tagged with its static id.
#[derive(Component, Debug)]
pub struct ArenaStatic(pub u32);

/// Non-collidable decorative instance.
#[derive(Component, Debug)]
pub struct Decoration;

/// Plain box standing in for the sky until the cubemap arrives.
#[derive(Component, Debug)]
pub struct SkyboxShell;

/// In-flight cubemap load. Removed once the load settles either way.
#[derive(Resource, Debug)]
struct CubemapLoad(Handle<Image>);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Arena>();
    app.add_message::<GenerateArena>();
    app.add_systems(Startup, setup);
    app.add_systems(
        Update,
        (
            on_generate_arena,
            spawn_decorations_when_due,
            apply_cubemap.run_if(resource_exists::<CubemapLoad>),
        )
            .chain(),
    );
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut collision: ResMut<CollisionWorld>,
) {
    // Sky light from above plus a weak bounce from below, roughly a hemispheric light.
    commands.spawn((
        Name::new("SkyLight"),
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(40.0, 100.0, 60.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        Name::new("GroundBounce"),
        DirectionalLight {
            illuminance: 1_500.0,
            color: Color::srgb(0.6, 0.6, 0.65),
            ..default()
        },
        Transform::default().looking_to(Vec3::Y, Vec3::Z),
    ));

    // Floor exists before any arena is generated so a rig can stand right away.
    let floor = floor_static();
    spawn_static_visual(&mut commands, &mut meshes, &mut materials, &floor);
    collision.insert_statics([floor]);
}

fn on_generate_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut msgs: MessageReader<GenerateArena>,
    mut arena: ResMut<Arena>,
    mut collision: ResMut<CollisionWorld>,
) {
    for _ in msgs.read() {
        if let Err(err) = arena.begin() {
            warn!("Ignoring arena request: {err}");
            continue;
        }

        let statics = essential_statics();
        let added = collision.insert_statics(statics.iter().cloned());
        for def in statics.iter().filter(|d| added.contains(&d.id)) {
            spawn_static_visual(&mut commands, &mut meshes, &mut materials, def);
        }
        info!("Arena generation started ({} new statics)", added.len());
    }
}

fn spawn_static_visual(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    def: &WorldStaticDef,
) {
    let (name, mesh, color): (&str, Mesh, _) = match &def.shape {
        ColliderShapeDef::Plane { .. } => (
            "arenaFloor",
            Plane3d::default().mesh().size(FLOOR_SIZE, FLOOR_SIZE).build(),
            FLOOR_COLOR,
        ),
        ColliderShapeDef::Cuboid { half_extents } => (
            "mainStage",
            Cuboid::new(
                half_extents.x * 2.0,
                half_extents.y * 2.0,
                half_extents.z * 2.0,
            )
            .into(),
            STAGE_COLOR,
        ),
    };

    commands.spawn((
        Name::new(name),
        ArenaStatic(def.id),
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: srgb(color),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_xyz(def.translation.x, def.translation.y, def.translation.z),
    ));
}

fn spawn_decorations_when_due(
    mut commands: Commands,
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut arena: ResMut<Arena>,
) {
    if !arena.tick(time.delta()) {
        return;
    }

    // One master mesh/material per set; instances share the handles so they batch.
    let mut count = 0;
    for set in decoration_sets() {
        let mesh = meshes.add(match set.kind {
            DecorationKind::Platform { size, height } => Mesh::from(Cuboid::new(size, height, size)),
            DecorationKind::Pillar { height, diameter } => {
                Mesh::from(Cylinder::new(diameter * 0.5, height))
            }
        });
        let material = materials.add(StandardMaterial {
            base_color: srgb(set.color),
            ..default()
        });

        for (index, position) in set.positions.iter().enumerate() {
            commands.spawn((
                Name::new(set.instance_name(index)),
                Decoration,
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(Vec3::from_array(*position)),
            ));
            count += 1;
        }
    }

    commands.spawn((
        Name::new("skyBox"),
        SkyboxShell,
        Mesh3d(meshes.add(Cuboid::from_length(SKYBOX_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::BLACK,
            unlit: true,
            cull_mode: None,
            double_sided: true,
            ..default()
        })),
        Transform::default(),
    ));

    commands.insert_resource(CubemapLoad(asset_server.load(SKYBOX_CUBEMAP_PATH)));
    info!("Spawned {count} decorations, loading {SKYBOX_CUBEMAP_PATH}");
}

/// Why a loaded skybox image cannot be used as a cubemap.
#[derive(thiserror::Error, Debug, PartialEq)]
enum CubemapError {
    #[error("image is no longer in the asset store")]
    Missing,
    #[error("{width}x{height} is not six square faces stacked vertically")]
    NotSixFaces { width: u32, height: u32 },
    #[error("image has {0} array layers, a cubemap needs 6")]
    LayerCount(u32),
    #[error("cannot split into faces: {0}")]
    Reinterpret(String),
}

/// Turn a vertically stacked six-face image into a cube texture, in place.
fn prepare_cubemap(image: &mut Image) -> Result<(), CubemapError> {
    match image.texture_descriptor.array_layer_count() {
        1 => {
            let (width, height) = (image.width(), image.height());
            if width == 0 || height != width * 6 {
                return Err(CubemapError::NotSixFaces { width, height });
            }
            image
                .reinterpret_stacked_2d_as_array(6)
                .map_err(|err| CubemapError::Reinterpret(err.to_string()))?;
        }
        6 => {}
        layers => return Err(CubemapError::LayerCount(layers)),
    }
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    Ok(())
}

/// Attach the cubemap once it arrives. A failed or malformed load only costs the sky
/// texture; the black shell stays.
fn apply_cubemap(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    load: Res<CubemapLoad>,
    mut images: ResMut<Assets<Image>>,
    cameras: Query<Entity, With<FollowCamera>>,
    mut shells: Query<&mut Visibility, With<SkyboxShell>>,
) {
    match asset_server.load_state(load.0.id()) {
        LoadState::Loaded => {}
        LoadState::Failed(err) => {
            warn!("Skybox cubemap failed to load, keeping a plain sky: {err}");
            commands.remove_resource::<CubemapLoad>();
            return;
        }
        _ => return,
    }

    let prepared = images
        .get_mut(&load.0)
        .ok_or(CubemapError::Missing)
        .and_then(|mut image| prepare_cubemap(&mut image));
    if let Err(err) = prepared {
        warn!("Skybox cubemap unusable, keeping a plain sky: {err}");
        commands.remove_resource::<CubemapLoad>();
        return;
    }

    for camera in &cameras {
        commands.entity(camera).insert(Skybox {
            image: load.0.clone(),
            brightness: 1000.0,
            ..default()
        });
    }
    // The untextured shell would hide the camera skybox.
    for mut visibility in &mut shells {
        *visibility = Visibility::Hidden;
    }
    commands.remove_resource::<CubemapLoad>();
    info!("Skybox cubemap loaded");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::{
        asset::RenderAssetUsages,
        render::render_resource::{Extent3d, TextureDimension, TextureFormat},
    };

    fn solid_image(width: u32, height: u32) -> Image {
        Image::new_fill(
            Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            &[40, 80, 160, 255],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        )
    }

    #[test]
    fn stacked_faces_become_a_cube() {
        let mut image = solid_image(8, 48);
        assert_eq!(prepare_cubemap(&mut image), Ok(()));
        assert_eq!(image.texture_descriptor.array_layer_count(), 6);
        let view = image.texture_view_descriptor.as_ref().and_then(|v| v.dimension);
        assert_eq!(view, Some(TextureViewDimension::Cube));
    }

    #[test]
    fn single_square_image_is_rejected() {
        let mut image = solid_image(16, 16);
        assert_eq!(
            prepare_cubemap(&mut image),
            Err(CubemapError::NotSixFaces {
                width: 16,
                height: 16
            })
        );
        assert!(image.texture_view_descriptor.is_none());
    }

    #[test]
    fn bundled_skybox_is_six_stacked_faces() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join(SKYBOX_CUBEMAP_PATH);
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[12..16], b"IHDR");
        let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
        assert!(width > 0);
        assert_eq!(height, width * 6);
    }

    #[test]
    fn wrong_face_count_is_rejected() {
        let mut image = solid_image(8, 32);
        assert!(matches!(
            prepare_cubemap(&mut image),
            Err(CubemapError::NotSixFaces { .. })
        ));
        assert_eq!(image.texture_descriptor.array_layer_count(), 1);
    }
}
