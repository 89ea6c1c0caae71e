use crate::error::EngineError;
use crate::model::{Rgb, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub point: PointDefaults,
    pub line: LineDefaults,
    pub transform: TransformDefaults,
    pub interaction: InteractionConfig,
    pub render: RenderConfig,
    pub palette: Palette,
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document; missing keys keep their defaults.
    pub fn from_json_str(s: &str) -> Result<EngineConfig, EngineError> {
        let cfg: EngineConfig = serde_json::from_str(s)?;
        Ok(cfg)
    }
}

/// Per-point attribute values used when a record omits them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointDefaults {
    pub size: f32,
    pub opacity: f32,
    pub color: Rgb,
    pub outer_ring_color: Rgb,
    pub outer_ring_opacity: f32,
    pub shape: f32,
}

impl Default for PointDefaults {
    fn default() -> Self {
        PointDefaults {
            size: 4.0,
            opacity: 0.9,
            color: Rgb::GRAY,
            outer_ring_color: Rgb([0.5, 0.5, 0.5]),
            outer_ring_opacity: 0.9,
            shape: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineDefaults {
    pub color: Rgb,
    pub opacity: f32,
}

impl Default for LineDefaults {
    fn default() -> Self {
        LineDefaults {
            color: Rgb::GRAY,
            opacity: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformDefaults {
    pub translate: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for TransformDefaults {
    fn default() -> Self {
        TransformDefaults {
            translate: Vec2::new(0.0, 0.0),
            rotation: 0.0,
            scale: Vec2::new(0.9, 0.9),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionConfig {
    pub wheel_sensitivity: f32,
    pub pan_sensitivity: f32,
    /// A lasso path must hold more than this many scalars to be closed.
    pub min_closing_scalars: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig {
            wheel_sensitivity: 0.05,
            pan_sensitivity: 0.002,
            min_closing_scalars: 6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub point_size_min: f32,
    pub point_size_max: f32,
    pub point_size_pow: f32,
    pub clear_color: [f32; 4],
    /// Radius of the focus ring in world units.
    pub focus_radius: f32,
    pub focus_segments: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            point_size_min: 2.0,
            point_size_max: 4.0,
            point_size_pow: 1.0,
            clear_color: [1.0, 1.0, 1.0, 1.0],
            focus_radius: 0.02,
            focus_segments: 24,
        }
    }
}

/// Group colors, indexed by group id modulo the palette length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub Vec<Rgb>);

impl Palette {
    pub fn color(&self, group: u32) -> Rgb {
        if self.0.is_empty() {
            return Rgb::GRAY;
        }
        self.0[group as usize % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        // Tableau 10
        Palette(vec![
            Rgb([0.306, 0.475, 0.655]),
            Rgb([0.949, 0.557, 0.169]),
            Rgb([0.882, 0.341, 0.349]),
            Rgb([0.463, 0.718, 0.698]),
            Rgb([0.349, 0.631, 0.310]),
            Rgb([0.929, 0.788, 0.282]),
            Rgb([0.690, 0.478, 0.631]),
            Rgb([1.000, 0.616, 0.655]),
            Rgb([0.612, 0.459, 0.373]),
            Rgb([0.729, 0.690, 0.675]),
        ])
    }
}
