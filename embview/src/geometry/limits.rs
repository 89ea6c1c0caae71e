// Centralized ingestion limits to harden against untrusted point data

// Dataset size caps
pub const MAX_POINTS: usize = 2_000_000;
pub const MAX_LINE_VERTICES: usize = 4_000_000;

// Lasso paths longer than this stop growing; the gesture still closes normally
pub const MAX_LASSO_SCALARS: usize = 200_000;

// Focus ring chords; configuration values above this are clamped
pub const MAX_FOCUS_SEGMENTS: usize = 1_024;

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 = 10_000_000.0;
pub const SIZE_MAX: f32 = 1_000.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_size_bounds(s: f32) -> bool { s.is_finite() && s >= 0.0 && s <= SIZE_MAX }

#[inline]
pub fn in_unit_range(v: f32) -> bool { v.is_finite() && (0.0..=1.0).contains(&v) }
