//! Arena layout and the deferred-generation state machine.
//!
//! The floor and the main stage are collidable and created synchronously so the player
//! can stand and move at once. Platforms, pillars and the skybox are purely decorative:
//! they are created once [`DECORATIONS_DELAY`] has elapsed after generation started.
//! Decorations never arriving (or a missing cubemap) leaves the arena playable.

use std::time::Duration;

use rapier3d::prelude::{Vector, vector};

use crate::character::Rgb;
use crate::constants::{
    DECORATIONS_DELAY, PILLAR_DIAMETER, PILLAR_HEIGHT, PLATFORM_HEIGHT, PLATFORM_SIZE,
    STAGE_HEIGHT, STAGE_SIZE,
};
use crate::rapier_world::{ColliderShapeDef, WorldStaticDef};

pub const FLOOR_ID: u32 = 1;
pub const STAGE_ID: u32 = 2;

pub const FLOOR_COLOR: Rgb = Rgb::new(0.1, 0.1, 0.1);
pub const STAGE_COLOR: Rgb = Rgb::new(0.3, 0.3, 0.3);
pub const PLATFORM_COLOR: Rgb = Rgb::new(0.4, 0.4, 0.4);
pub const PILLAR_COLOR: Rgb = Rgb::new(0.2, 0.2, 0.2);

/// World positions of the decorative platform instances.
pub const PLATFORM_POSITIONS: [[f32; 3]; 4] = [
    [80.0, 10.0, 80.0],
    [-80.0, 12.0, 80.0],
    [80.0, 8.0, -80.0],
    [-80.0, 15.0, -80.0],
];

/// World positions of the decorative pillar instances.
pub const PILLAR_POSITIONS: [[f32; 3]; 2] = [[-120.0, 15.0, 0.0], [120.0, 15.0, 0.0]];

/// Ground plane at y = 0. Present from scene creation onward.
pub fn floor_static() -> WorldStaticDef {
    WorldStaticDef::at(
        FLOOR_ID,
        Vector::zeros(),
        ColliderShapeDef::Plane {
            offset_along_normal: 0.0,
        },
    )
}

/// Main stage box, resting on the floor and centered on the origin.
pub fn stage_static() -> WorldStaticDef {
    WorldStaticDef::at(
        STAGE_ID,
        vector![0.0, STAGE_HEIGHT * 0.5, 0.0],
        ColliderShapeDef::Cuboid {
            half_extents: vector![STAGE_SIZE * 0.5, STAGE_HEIGHT * 0.5, STAGE_SIZE * 0.5],
        },
    )
}

/// Collidable statics created synchronously by arena generation.
pub fn essential_statics() -> Vec<WorldStaticDef> {
    vec![floor_static(), stage_static()]
}

/// A master mesh and where its lightweight instances go.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorationSet {
    pub name: &'static str,
    pub kind: DecorationKind,
    pub color: Rgb,
    pub positions: &'static [[f32; 3]],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DecorationKind {
    Platform { size: f32, height: f32 },
    Pillar { height: f32, diameter: f32 },
}

impl DecorationSet {
    /// Name of the `index`th instance, e.g. `platform2`.
    pub fn instance_name(&self, index: usize) -> String {
        format!("{}{index}", self.name)
    }
}

/// Decorative (non-collidable) instanced geometry.
pub fn decoration_sets() -> [DecorationSet; 2] {
    [
        DecorationSet {
            name: "platform",
            kind: DecorationKind::Platform {
                size: PLATFORM_SIZE,
                height: PLATFORM_HEIGHT,
            },
            color: PLATFORM_COLOR,
            positions: &PLATFORM_POSITIONS,
        },
        DecorationSet {
            name: "pillar",
            kind: DecorationKind::Pillar {
                height: PILLAR_HEIGHT,
                diameter: PILLAR_DIAMETER,
            },
            color: PILLAR_COLOR,
            positions: &PILLAR_POSITIONS,
        },
    ]
}

/// Returned when arena generation is requested twice in one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    #[error("the arena has already been generated")]
    AlreadyGenerated,
}

/// Progress of arena generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArenaProgress {
    /// Nothing but the initial floor exists.
    #[default]
    NotStarted,
    /// Floor and stage exist; decorations are due in `remaining`.
    Deferred { remaining: Duration },
    /// Everything has been created.
    Complete,
}

impl ArenaProgress {
    /// Start generation. Allowed exactly once per session.
    pub fn begin(&mut self) -> Result<(), ArenaError> {
        self.begin_with_delay(DECORATIONS_DELAY)
    }

    pub fn begin_with_delay(&mut self, delay: Duration) -> Result<(), ArenaError> {
        match self {
            ArenaProgress::NotStarted => {
                log::debug!("arena generation started, decorations in {delay:?}");
                *self = ArenaProgress::Deferred { remaining: delay };
                Ok(())
            }
            _ => Err(ArenaError::AlreadyGenerated),
        }
    }

    /// Advance the deferred step by `elapsed`.
    ///
    /// Returns `true` exactly once: on the tick where the decorations become due.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let ArenaProgress::Deferred { remaining } = self else {
            return false;
        };
        match remaining.checked_sub(elapsed) {
            Some(left) if !left.is_zero() => {
                *remaining = left;
                false
            }
            _ => {
                log::debug!("arena decorations due");
                *self = ArenaProgress::Complete;
                true
            }
        }
    }

    /// Whether generation has been requested (the trigger should be disabled).
    pub fn has_started(&self) -> bool {
        !matches!(self, ArenaProgress::NotStarted)
    }

    /// Whether the decorative elements should exist.
    #[cfg(test)]
    pub fn decorations_ready(&self) -> bool {
        matches!(self, ArenaProgress::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_can_only_begin_once() {
        let mut progress = ArenaProgress::default();
        assert!(!progress.has_started());
        assert_eq!(progress.begin(), Ok(()));
        assert!(progress.has_started());
        assert_eq!(progress.begin(), Err(ArenaError::AlreadyGenerated));

        while !progress.tick(Duration::from_millis(100)) {}
        assert_eq!(progress.begin(), Err(ArenaError::AlreadyGenerated));
    }

    #[test]
    fn decorations_wait_for_the_delay() {
        let mut progress = ArenaProgress::default();
        progress.begin().unwrap();
        assert!(!progress.decorations_ready());

        assert!(!progress.tick(Duration::from_millis(200)));
        assert!(!progress.tick(Duration::from_millis(200)));
        assert!(!progress.decorations_ready());

        assert!(progress.tick(Duration::from_millis(200)));
        assert!(progress.decorations_ready());
    }

    #[test]
    fn completion_is_reported_once() {
        let mut progress = ArenaProgress::default();
        progress.begin_with_delay(Duration::from_millis(16)).unwrap();
        assert!(progress.tick(Duration::from_millis(16)));
        assert!(!progress.tick(Duration::from_millis(16)));
        assert!(progress.decorations_ready());
    }

    #[test]
    fn ticking_before_begin_does_nothing() {
        let mut progress = ArenaProgress::default();
        assert!(!progress.tick(Duration::from_secs(10)));
        assert_eq!(progress, ArenaProgress::NotStarted);
    }

    #[test]
    fn stage_rests_on_the_floor() {
        let stage = stage_static();
        let ColliderShapeDef::Cuboid { half_extents } = stage.shape else {
            panic!("stage should be a cuboid");
        };
        assert!((stage.translation.y - half_extents.y).abs() < 1.0e-6);
        assert_eq!(essential_statics().len(), 2);
    }

    #[test]
    fn decoration_instances_are_named_by_index() {
        let [platforms, pillars] = decoration_sets();
        assert_eq!(platforms.positions.len(), 4);
        assert_eq!(pillars.positions.len(), 2);
        assert_eq!(platforms.instance_name(3), "platform3");
        assert_eq!(pillars.instance_name(0), "pillar0");
    }
}
