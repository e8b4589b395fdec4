use std::time::Duration;

/// Walking speed of the active rig in world units per second.
pub const MOVE_SPEED_MPS: f32 = 10.0;

/// Delay between "generate arena" and the creation of the decorative elements.
///
/// The floor and the main stage exist immediately; platforms, pillars and the skybox
/// arrive after this delay so the first frames stay cheap.
pub const DECORATIONS_DELAY: Duration = Duration::from_millis(500);

/// Where a freshly selected rig is placed (root translation).
pub const SPAWN_POINT: [f32; 3] = [0.0, 0.0, 0.0];

/// Side length of the square arena floor.
pub const FLOOR_SIZE: f32 = 300.0;

/// Main stage footprint (X/Z) and height.
pub const STAGE_SIZE: f32 = 120.0;
pub const STAGE_HEIGHT: f32 = 5.0;

/// Decorative platform footprint (X/Z) and thickness.
pub const PLATFORM_SIZE: f32 = 40.0;
pub const PLATFORM_HEIGHT: f32 = 3.0;

/// Decorative pillar dimensions.
pub const PILLAR_HEIGHT: f32 = 30.0;
pub const PILLAR_DIAMETER: f32 = 5.0;

/// Edge length of the skybox cube.
pub const SKYBOX_SIZE: f32 = 1000.0;

/// Vertically stacked six-face cubemap, relative to the asset root.
pub const SKYBOX_CUBEMAP_PATH: &str = "environment/skybox.png";

/// Collision capsule wrapped around every rig (meters).
///
/// The rigs are built from loose primitives; collision uses this single capsule
/// whose bottom sits `CAPSULE_GROUND_CLEARANCE` above the root.
pub const CAPSULE_RADIUS: f32 = 0.5;
pub const CAPSULE_HALF_HEIGHT: f32 = 0.6;
pub const CAPSULE_GROUND_CLEARANCE: f32 = 0.05;

/// Initial world position of the follow camera, before any target is bound.
pub const CAMERA_START: [f32; 3] = [0.0, 10.0, -10.0];

/// Reference frame rate the follow camera constants were tuned at.
pub const CAMERA_REFERENCE_FPS: f32 = 60.0;

/// Number of decimal places kept per axis in a position code.
pub const CODE_DECIMALS: usize = 2;
