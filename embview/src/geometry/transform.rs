//! Affine view transforms and screen/world coordinate mapping.
//!
//! Matrices are stored as 16 floats in the order WebGL expects for
//! `uniformMatrix4fv(.., false, ..)`: the upper-left 2×2 block holds
//! rotation and scale, entries 12 and 13 hold the translation.

use crate::model::{ScreenPos, Vec2};

pub type Mat4 = [f32; 16];

pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Build the view matrix from translate, rotation (radians) and anisotropic scale.
///
/// ```text
/// [ sx·cosθ   sx·sinθ  0  0 ]
/// [ -sy·sinθ  sy·cosθ  0  0 ]
/// [ 0         0        1  0 ]
/// [ tx        ty       0  1 ]
/// ```
pub fn build_transform(translate: Vec2, rotation: f32, scale: Vec2) -> Mat4 {
    let (sin, cos) = rotation.sin_cos();
    [
        scale.x * cos, scale.x * sin, 0.0, 0.0, //
        -scale.y * sin, scale.y * cos, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        translate.x, translate.y, 0.0, 1.0,
    ]
}

#[inline]
fn linear_block(m: &Mat4) -> (f64, f64, f64, f64) {
    // [x'; y'] = [[a, b], [c, d]] · [x; y]
    (m[0] as f64, m[4] as f64, m[1] as f64, m[5] as f64)
}

/// Map a pixel position to world space.
///
/// Returns [`Vec2::INVALID`] when the transform's 2×2 block is singular
/// (zero scale on either axis).
pub fn screen_to_world(screen: ScreenPos, width: f32, height: f32, m: &Mat4) -> Vec2 {
    let ndc_x = -1.0 + 2.0 * screen.x as f64 / width as f64;
    let ndc_y = 1.0 - 2.0 * screen.y as f64 / height as f64;
    let xr = ndc_x - m[12] as f64;
    let yr = ndc_y - m[13] as f64;
    let (a, b, c, d) = linear_block(m);
    let det = a * d - b * c;
    if det == 0.0 || !det.is_finite() {
        return Vec2::INVALID;
    }
    Vec2 {
        x: ((d * xr - b * yr) / det) as f32,
        y: ((-c * xr + a * yr) / det) as f32,
    }
}

/// Map a world position to pixels; inverse of [`screen_to_world`].
pub fn world_to_screen(world: Vec2, width: f32, height: f32, m: &Mat4) -> ScreenPos {
    let (a, b, c, d) = linear_block(m);
    let (x, y) = (world.x as f64, world.y as f64);
    let ndc_x = a * x + b * y + m[12] as f64;
    let ndc_y = c * x + d * y + m[13] as f64;
    ScreenPos {
        x: ((ndc_x + 1.0) * 0.5 * width as f64) as f32,
        y: ((1.0 - ndc_y) * 0.5 * height as f64) as f32,
    }
}

/// Decomposed view transform plus its materialized matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
    translate: Vec2,
    rotation: f32,
    scale: Vec2,
    matrix: Mat4,
}

impl ViewTransform {
    pub fn new(translate: Vec2, rotation: f32, scale: Vec2) -> Self {
        ViewTransform {
            translate,
            rotation,
            scale,
            matrix: build_transform(translate, rotation, scale),
        }
    }

    pub fn identity() -> Self {
        ViewTransform::new(Vec2::new(0.0, 0.0), 0.0, Vec2::new(1.0, 1.0))
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn translate_by(&mut self, dx: f32, dy: f32) {
        self.translate.x += dx;
        self.translate.y += dy;
        self.recompute();
    }

    pub fn scale_by(&mut self, factor: f32) {
        self.scale.x *= factor;
        self.scale.y *= factor;
        self.recompute();
    }

    pub fn rotate_by(&mut self, radians: f32) {
        self.rotation += radians;
        self.recompute();
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.matrix = build_transform(self.translate, self.rotation, self.scale);
    }
}
