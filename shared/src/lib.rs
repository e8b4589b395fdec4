pub mod arena;
pub mod camera;
pub mod character;
pub mod codec;
pub mod constants;
pub mod movement;
pub mod rapier_world;

pub use arena::{
    ArenaError, ArenaProgress, DecorationKind, DecorationSet, decoration_sets, essential_statics,
    floor_static,
};
pub use camera::{FollowCameraSettings, follow_step};
pub use character::{CharacterId, PartShape, PartSpec, Rgb, RigSpec, rig_spec};
pub use codec::CodecError;
pub use constants::{
    CAMERA_REFERENCE_FPS, CAMERA_START, DECORATIONS_DELAY, MOVE_SPEED_MPS, SKYBOX_CUBEMAP_PATH,
    SKYBOX_SIZE, SPAWN_POINT,
};
pub use movement::{
    ControllerSettings, DirectionalInput, capsule_center_height, move_with_collisions,
    planar_displacement,
};
pub use rapier_world::{ColliderShapeDef, RapierQueryWorld, WorldStaticDef};
