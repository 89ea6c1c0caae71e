use serde::{Deserialize, Serialize};
use std::fmt;

/// Group id carried by points that no committed lasso has claimed.
pub const UNSELECTED: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Returned by `screen_to_world` when the view transform cannot be inverted.
    pub const INVALID: Vec2 = Vec2 {
        x: f32::MAX,
        y: f32::MAX,
    };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x != f32::MAX && self.y != f32::MAX && self.x.is_finite() && self.y.is_finite()
    }
}

/// Index of a view within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub usize);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Linear RGB with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const GRAY: Rgb = Rgb([0.6, 0.6, 0.6]);
    pub const BLACK: Rgb = Rgb([0.0, 0.0, 0.0]);
    pub const WHITE: Rgb = Rgb([1.0, 1.0, 1.0]);

    pub fn r(&self) -> f32 {
        self.0[0]
    }
    pub fn g(&self) -> f32 {
        self.0[1]
    }
    pub fn b(&self) -> f32 {
        self.0[2]
    }
}

/// Screen position in CSS pixels relative to the canvas' top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenPos {
    pub x: f32,
    pub y: f32,
}

impl ScreenPos {
    pub const fn new(x: f32, y: f32) -> Self {
        ScreenPos { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

impl PointerButton {
    /// Maps a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Option<PointerButton> {
        match button {
            0 => Some(PointerButton::Primary),
            1 => Some(PointerButton::Auxiliary),
            2 => Some(PointerButton::Secondary),
            _ => None,
        }
    }
}

/// What the embedded points stand for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    Instance,
    Variable,
    Time,
}

/// Which of the two chained reductions produced the embedding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    First,
    Second,
}

/// Role of a view, resolved once from its wire code.
///
/// The six codes name the entity being embedded followed by the order in which
/// the other two axes were reduced, e.g. `Z_n_dt` embeds instances after
/// reducing variables, then time points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewRole {
    pub entity: Entity,
    pub stage: Stage,
}

impl ViewRole {
    pub const ALL: [ViewRole; 6] = [
        ViewRole::new(Entity::Instance, Stage::First),
        ViewRole::new(Entity::Instance, Stage::Second),
        ViewRole::new(Entity::Variable, Stage::First),
        ViewRole::new(Entity::Variable, Stage::Second),
        ViewRole::new(Entity::Time, Stage::First),
        ViewRole::new(Entity::Time, Stage::Second),
    ];

    pub const fn new(entity: Entity, stage: Stage) -> Self {
        ViewRole { entity, stage }
    }

    pub fn code(&self) -> &'static str {
        match (self.entity, self.stage) {
            (Entity::Instance, Stage::First) => "Z_n_dt",
            (Entity::Instance, Stage::Second) => "Z_n_td",
            (Entity::Variable, Stage::First) => "Z_d_nt",
            (Entity::Variable, Stage::Second) => "Z_d_tn",
            (Entity::Time, Stage::First) => "Z_t_dn",
            (Entity::Time, Stage::Second) => "Z_t_nd",
        }
    }

    pub fn from_code(code: &str) -> Option<ViewRole> {
        ViewRole::ALL.into_iter().find(|r| r.code() == code)
    }
}

impl fmt::Display for ViewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ViewRole {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for ViewRole {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let code = String::deserialize(d)?;
        ViewRole::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown view role '{}'", code)))
    }
}
