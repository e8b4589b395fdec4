//! Character rig tables.
//!
//! Every selectable character is a fixed list of primitive parts parented to one root.
//! Symmetric parts are listed once with a mirror entry and expanded by
//! [`PartSpec::mirror_clone`], so the tables never repeat a left/right pair by hand.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_8, PI};
use std::fmt;
use std::str::FromStr;

/// Linear-ish RGB triple in `[0, 1]`, matching the flat colors of the rigs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

const SKIN: Rgb = Rgb::new(1.0, 0.87, 0.77);
const MARIO_RED: Rgb = Rgb::new(0.8, 0.0, 0.0);
const OVERALL_BLUE: Rgb = Rgb::new(0.2, 0.2, 0.8);
const LINK_GREEN: Rgb = Rgb::new(0.1, 0.8, 0.1);
const KIRBY_PINK: Rgb = Rgb::new(1.0, 0.75, 0.8);
const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
const SAMUS_YELLOW: Rgb = Rgb::new(1.0, 0.8, 0.0);
const VISOR_BLUE: Rgb = Rgb::new(0.2, 0.2, 1.0);
const ARMOR_GRAY: Rgb = Rgb::new(0.5, 0.5, 0.5);
const FOX_ORANGE: Rgb = Rgb::new(1.0, 0.5, 0.1);
const FOX_SLEEVE: Rgb = Rgb::new(1.0, 0.4, 0.1);

/// The five selectable characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CharacterId {
    #[default]
    Mario,
    Link,
    Kirby,
    Samus,
    Fox,
}

impl CharacterId {
    pub const ALL: [CharacterId; 5] = [
        CharacterId::Mario,
        CharacterId::Link,
        CharacterId::Kirby,
        CharacterId::Samus,
        CharacterId::Fox,
    ];

    /// Identifier carried by the selection buttons.
    pub fn key(self) -> &'static str {
        match self {
            CharacterId::Mario => "mario",
            CharacterId::Link => "link",
            CharacterId::Kirby => "kirby",
            CharacterId::Samus => "samus",
            CharacterId::Fox => "fox",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CharacterId::Mario => "Mario",
            CharacterId::Link => "Link",
            CharacterId::Kirby => "Kirby",
            CharacterId::Samus => "Samus",
            CharacterId::Fox => "Fox",
        }
    }

    /// Resolve a selection identifier. Anything unrecognised selects the default character.
    pub fn from_key(key: &str) -> Self {
        key.parse().unwrap_or_default()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a selection identifier names no character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown character `{0}`")]
pub struct UnknownCharacter(pub String);

impl FromStr for CharacterId {
    type Err = UnknownCharacter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        CharacterId::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownCharacter(key.to_owned()))
    }
}

/// Primitive a rig part is made of. Dimensions are full sizes, not half extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartShape {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { diameter: f32 },
    /// Y-aligned. A zero top diameter makes a cone with its apex at +Y.
    Cylinder {
        height: f32,
        diameter_top: f32,
        diameter_bottom: f32,
    },
    /// Vertical quad in the XY plane, facing -Z.
    Plane { width: f32, height: f32 },
}

impl PartShape {
    pub fn cylinder(height: f32, diameter: f32) -> Self {
        PartShape::Cylinder {
            height,
            diameter_top: diameter,
            diameter_bottom: diameter,
        }
    }

    pub fn cone(height: f32, diameter_bottom: f32) -> Self {
        PartShape::Cylinder {
            height,
            diameter_top: 0.0,
            diameter_bottom,
        }
    }
}

/// Second copy of a part, identical except for its name and X offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mirror {
    pub name: &'static str,
    pub x: f32,
}

/// One primitive of a rig, positioned relative to the rig root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartSpec {
    pub name: &'static str,
    pub shape: PartShape,
    pub offset: [f32; 3],
    /// Euler angles in radians (X, Y, Z).
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub color: Rgb,
    /// Opacity; anything below 1.0 is rendered blended.
    pub alpha: f32,
    pub mirror: Option<Mirror>,
}

impl PartSpec {
    pub fn new(name: &'static str, shape: PartShape, color: Rgb) -> Self {
        Self {
            name,
            shape,
            offset: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            color,
            alpha: 1.0,
            mirror: None,
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.offset = [x, y, z];
        self
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = [x, y, z];
        self
    }

    pub fn scaled(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = [x, y, z];
        self
    }

    pub fn translucent(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Also build a copy of this part named `name` at X = `x`.
    pub fn mirrored(mut self, name: &'static str, x: f32) -> Self {
        self.mirror = Some(Mirror { name, x });
        self
    }

    /// The clone described by [`PartSpec::mirrored`], if any.
    pub fn mirror_clone(&self) -> Option<PartSpec> {
        let mirror = self.mirror?;
        let mut clone = *self;
        clone.name = mirror.name;
        clone.offset[0] = mirror.x;
        clone.mirror = None;
        Some(clone)
    }
}

/// Full description of one character's rig.
#[derive(Clone, Debug, PartialEq)]
pub struct RigSpec {
    pub character: CharacterId,
    pub root_name: &'static str,
    pub parts: Vec<PartSpec>,
}

impl RigSpec {
    /// Parts in build order with every mirror materialised right after its source.
    pub fn expanded(&self) -> Vec<PartSpec> {
        self.parts
            .iter()
            .flat_map(|part| {
                let mut base = *part;
                base.mirror = None;
                std::iter::once(base).chain(part.mirror_clone())
            })
            .collect()
    }

    /// Number of child primitives the rig root ends up with.
    pub fn part_count(&self) -> usize {
        self.parts.len() + self.parts.iter().filter(|p| p.mirror.is_some()).count()
    }
}

/// Torso, head, arms and legs shared by the humanoid characters.
fn humanoid(
    torso: Rgb,
    arms: Rgb,
    legs: Rgb,
    names: [&'static str; 6],
) -> (PartSpec, PartSpec, PartSpec, PartSpec) {
    let [torso_name, head_name, left_arm, right_arm, left_leg, right_leg] = names;
    (
        PartSpec::new(
            torso_name,
            PartShape::Box {
                width: 1.0,
                height: 1.5,
                depth: 0.6,
            },
            torso,
        )
        .at(0.0, 0.75, 0.0),
        PartSpec::new(head_name, PartShape::Sphere { diameter: 0.8 }, SKIN).at(0.0, 1.6, 0.0),
        PartSpec::new(left_arm, PartShape::cylinder(1.0, 0.3), arms)
            .rotated(0.0, 0.0, FRAC_PI_2)
            .at(-0.75, 1.2, 0.0)
            .mirrored(right_arm, 0.75),
        PartSpec::new(left_leg, PartShape::cylinder(1.0, 0.35), legs)
            .at(-0.25, 0.5, 0.0)
            .mirrored(right_leg, 0.25),
    )
}

/// The fixed rig table for `character`.
pub fn rig_spec(character: CharacterId) -> RigSpec {
    let (root_name, parts) = match character {
        CharacterId::Mario => {
            let (torso, head, arm, leg) = humanoid(
                MARIO_RED,
                OVERALL_BLUE,
                OVERALL_BLUE,
                [
                    "MarioTorso",
                    "MarioHead",
                    "MarioLeftArm",
                    "MarioRightArm",
                    "MarioLeftLeg",
                    "MarioRightLeg",
                ],
            );
            let cap = PartSpec::new("MarioCap", PartShape::Sphere { diameter: 0.9 }, MARIO_RED)
                .scaled(1.0, 0.5, 1.0)
                .at(0.0, 2.05, 0.0);
            ("MarioRoot", vec![torso, head, cap, arm, leg])
        }
        CharacterId::Link => {
            let (torso, head, arm, leg) = humanoid(
                LINK_GREEN,
                SKIN,
                LINK_GREEN,
                [
                    "LinkTorso",
                    "LinkHead",
                    "LinkLeftArm",
                    "LinkRightArm",
                    "LinkLeftLeg",
                    "LinkRightLeg",
                ],
            );
            let hat = PartSpec::new("LinkHat", PartShape::cone(0.5, 0.8), LINK_GREEN)
                .rotated(0.0, 0.0, PI)
                .at(0.0, 2.05, 0.0);
            ("LinkRoot", vec![torso, head, hat, arm, leg])
        }
        CharacterId::Kirby => {
            let body = PartSpec::new("KirbyBody", PartShape::Sphere { diameter: 1.2 }, KIRBY_PINK);
            let eye = PartSpec::new("KirbyLeftEye", PartShape::Sphere { diameter: 0.2 }, BLACK)
                .at(-0.2, 0.1, -0.55)
                .mirrored("KirbyRightEye", 0.2);
            ("KirbyRoot", vec![body, eye])
        }
        CharacterId::Samus => {
            let (torso, head, arm, leg) = humanoid(
                SAMUS_YELLOW,
                ARMOR_GRAY,
                ARMOR_GRAY,
                [
                    "SamusTorso",
                    "SamusHead",
                    "SamusLeftArm",
                    "SamusRightArm",
                    "SamusLeftLeg",
                    "SamusRightLeg",
                ],
            );
            let visor = PartSpec::new(
                "SamusVisor",
                PartShape::Plane {
                    width: 0.7,
                    height: 0.35,
                },
                VISOR_BLUE,
            )
            .at(0.0, 1.6, -0.4)
            .rotated(-FRAC_PI_8, 0.0, 0.0)
            .translucent(0.6);
            ("SamusRoot", vec![torso, head, visor, arm, leg])
        }
        CharacterId::Fox => {
            let torso = PartSpec::new(
                "FoxTorso",
                PartShape::Box {
                    width: 0.9,
                    height: 1.4,
                    depth: 0.5,
                },
                FOX_ORANGE,
            )
            .at(0.0, 0.7, 0.0);
            let head =
                PartSpec::new("FoxHead", PartShape::Sphere { diameter: 0.7 }, SKIN).at(0.0, 1.4, 0.0);
            let ear = PartSpec::new("FoxLeftEar", PartShape::cone(0.3, 0.2), FOX_ORANGE)
                .rotated(0.0, 0.0, PI)
                .at(-0.15, 1.75, 0.0)
                .mirrored("FoxRightEar", 0.15);
            let arm = PartSpec::new("FoxLeftArm", PartShape::cylinder(0.8, 0.25), FOX_SLEEVE)
                .rotated(0.0, 0.0, FRAC_PI_2)
                .at(-0.55, 1.1, 0.0)
                .mirrored("FoxRightArm", 0.55);
            let leg = PartSpec::new("FoxLeftLeg", PartShape::cylinder(1.0, 0.3), FOX_ORANGE)
                .at(-0.25, 0.4, 0.0)
                .mirrored("FoxRightLeg", 0.25);
            ("FoxRoot", vec![torso, head, ear, arm, leg])
        }
    };

    RigSpec {
        character,
        root_name,
        parts,
    }
}
