//! Point, line and focus geometry owned by a view.
//!
//! Attributes are stored as parallel flat `f32` arrays in the layout the GPU
//! passes consume directly. Lengths are kept consistent by construction; a
//! mismatch is a bug and trips an assertion rather than surfacing as an error.

use crate::config::{LineDefaults, PointDefaults};
use crate::error::EngineError;
use crate::geometry::limits::{
    in_coord_bounds, in_size_bounds, in_unit_range, MAX_FOCUS_SEGMENTS, MAX_LINE_VERTICES,
    MAX_POINTS,
};
use crate::model::{Rgb, Vec2};
use serde::{Deserialize, Serialize};

/// One point as supplied by the host. Missing attributes take configured defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub color: Option<Rgb>,
    #[serde(default)]
    pub opacity: Option<f32>,
    #[serde(default)]
    pub size: Option<f32>,
    #[serde(default)]
    pub shape: Option<f32>,
    #[serde(default)]
    pub outer_ring_color: Option<Rgb>,
    #[serde(default)]
    pub outer_ring_opacity: Option<f32>,
}

impl PointRecord {
    pub fn at(x: f32, y: f32) -> Self {
        PointRecord {
            x,
            y,
            color: None,
            opacity: None,
            size: None,
            shape: None,
            outer_ring_color: None,
            outer_ring_opacity: None,
        }
    }
}

/// Per-point visual attributes that can be carried across linked views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Colors,
    Opacities,
    OuterRingColors,
    OuterRingOpacities,
    Sizes,
    Shapes,
}

impl Attribute {
    pub fn components(&self) -> usize {
        match self {
            Attribute::Colors | Attribute::OuterRingColors => 3,
            _ => 1,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PointSet {
    positions: Vec<f32>,
    colors: Vec<f32>,
    opacities: Vec<f32>,
    outer_ring_colors: Vec<f32>,
    outer_ring_opacities: Vec<f32>,
    sizes: Vec<f32>,
    shapes: Vec<f32>,
    default_colors: Vec<f32>,
    default_opacities: Vec<f32>,
}

impl PointSet {
    pub fn from_records(
        records: &[PointRecord],
        defaults: &PointDefaults,
    ) -> Result<PointSet, EngineError> {
        if records.len() > MAX_POINTS {
            return Err(EngineError::Limit {
                what: "point count",
                max: MAX_POINTS,
            });
        }
        let n = records.len();
        let mut ps = PointSet {
            positions: Vec::with_capacity(n * 2),
            colors: Vec::with_capacity(n * 3),
            opacities: Vec::with_capacity(n),
            outer_ring_colors: Vec::with_capacity(n * 3),
            outer_ring_opacities: Vec::with_capacity(n),
            sizes: Vec::with_capacity(n),
            shapes: Vec::with_capacity(n),
            default_colors: Vec::new(),
            default_opacities: Vec::new(),
        };
        for (index, r) in records.iter().enumerate() {
            if !in_coord_bounds(r.x) || !in_coord_bounds(r.y) {
                return Err(EngineError::Dataset {
                    index,
                    reason: "coordinate is not finite or out of bounds",
                });
            }
            let color = r.color.unwrap_or(defaults.color);
            let ring = r.outer_ring_color.unwrap_or(defaults.outer_ring_color);
            if !color.0.iter().chain(ring.0.iter()).all(|&c| in_unit_range(c)) {
                return Err(EngineError::Dataset {
                    index,
                    reason: "color component outside [0, 1]",
                });
            }
            let opacity = r.opacity.unwrap_or(defaults.opacity);
            let ring_opacity = r.outer_ring_opacity.unwrap_or(defaults.outer_ring_opacity);
            if !in_unit_range(opacity) || !in_unit_range(ring_opacity) {
                return Err(EngineError::Dataset {
                    index,
                    reason: "opacity outside [0, 1]",
                });
            }
            let size = r.size.unwrap_or(defaults.size);
            if !in_size_bounds(size) {
                return Err(EngineError::Dataset {
                    index,
                    reason: "size is not finite or out of bounds",
                });
            }
            let shape = r.shape.unwrap_or(defaults.shape);
            if !shape.is_finite() {
                return Err(EngineError::Dataset {
                    index,
                    reason: "shape is not finite",
                });
            }
            ps.positions.extend_from_slice(&[r.x, r.y]);
            ps.colors.extend_from_slice(&color.0);
            ps.opacities.push(opacity);
            ps.outer_ring_colors.extend_from_slice(&ring.0);
            ps.outer_ring_opacities.push(ring_opacity);
            ps.sizes.push(size);
            ps.shapes.push(shape);
        }
        ps.default_colors = ps.colors.clone();
        ps.default_opacities = ps.opacities.clone();
        Ok(ps)
    }

    /// Points at flat `[x0, y0, x1, y1, ..]` positions with every other attribute defaulted.
    pub fn from_positions(
        positions: &[f32],
        defaults: &PointDefaults,
    ) -> Result<PointSet, EngineError> {
        if positions.len() % 2 != 0 {
            return Err(EngineError::Dataset {
                index: positions.len() / 2,
                reason: "odd number of coordinates",
            });
        }
        let records: Vec<PointRecord> = positions
            .chunks_exact(2)
            .map(|c| PointRecord::at(c[0], c[1]))
            .collect();
        PointSet::from_records(&records, defaults)
    }

    pub fn from_json_value(
        v: serde_json::Value,
        defaults: &PointDefaults,
    ) -> Result<PointSet, EngineError> {
        let records: Vec<PointRecord> = serde_json::from_value(v)?;
        PointSet::from_records(&records, defaults)
    }

    pub fn len(&self) -> usize {
        self.opacities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opacities.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.positions[2 * i], self.positions[2 * i + 1])
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    pub fn outer_ring_colors(&self) -> &[f32] {
        &self.outer_ring_colors
    }

    pub fn outer_ring_opacities(&self) -> &[f32] {
        &self.outer_ring_opacities
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn shapes(&self) -> &[f32] {
        &self.shapes
    }

    pub fn color(&self, i: usize) -> Rgb {
        Rgb([self.colors[3 * i], self.colors[3 * i + 1], self.colors[3 * i + 2]])
    }

    pub fn default_color(&self, i: usize) -> Rgb {
        Rgb([
            self.default_colors[3 * i],
            self.default_colors[3 * i + 1],
            self.default_colors[3 * i + 2],
        ])
    }

    pub fn set_color(&mut self, i: usize, c: Rgb) {
        self.colors[3 * i..3 * i + 3].copy_from_slice(&c.0);
    }

    pub fn attribute(&self, attr: Attribute) -> &[f32] {
        match attr {
            Attribute::Colors => &self.colors,
            Attribute::Opacities => &self.opacities,
            Attribute::OuterRingColors => &self.outer_ring_colors,
            Attribute::OuterRingOpacities => &self.outer_ring_opacities,
            Attribute::Sizes => &self.sizes,
            Attribute::Shapes => &self.shapes,
        }
    }

    /// Mutable view of an attribute array. The length is fixed by the point count.
    pub fn attribute_mut(&mut self, attr: Attribute) -> &mut [f32] {
        match attr {
            Attribute::Colors => &mut self.colors,
            Attribute::Opacities => &mut self.opacities,
            Attribute::OuterRingColors => &mut self.outer_ring_colors,
            Attribute::OuterRingOpacities => &mut self.outer_ring_opacities,
            Attribute::Sizes => &mut self.sizes,
            Attribute::Shapes => &mut self.shapes,
        }
    }

    pub fn restore_default_colors(&mut self) {
        debug_assert_eq!(self.colors.len(), self.default_colors.len());
        self.colors.copy_from_slice(&self.default_colors);
    }

    pub fn restore_default_opacities(&mut self) {
        debug_assert_eq!(self.opacities.len(), self.default_opacities.len());
        self.opacities.copy_from_slice(&self.default_opacities);
    }

    pub(crate) fn assert_consistent(&self) {
        let n = self.len();
        assert_eq!(self.positions.len(), 2 * n);
        assert_eq!(self.colors.len(), 3 * n);
        assert_eq!(self.outer_ring_colors.len(), 3 * n);
        assert_eq!(self.outer_ring_opacities.len(), n);
        assert_eq!(self.sizes.len(), n);
        assert_eq!(self.shapes.len(), n);
        assert_eq!(self.default_colors.len(), 3 * n);
        assert_eq!(self.default_opacities.len(), n);
    }
}

/// Line segments in segment-pair layout: vertices `2k` and `2k + 1` form segment `k`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineSet {
    pub vertices: Vec<f32>,
    pub colors: Vec<f32>,
    pub opacities: Vec<f32>,
}

impl LineSet {
    /// One segment per `(source, target)` point index pair.
    pub fn from_edges(
        points: &PointSet,
        edges: &[(u32, u32)],
        defaults: &LineDefaults,
    ) -> Result<LineSet, EngineError> {
        if edges.len() * 2 > MAX_LINE_VERTICES {
            return Err(EngineError::Limit {
                what: "line vertex count",
                max: MAX_LINE_VERTICES,
            });
        }
        let mut lines = LineSet {
            vertices: Vec::with_capacity(edges.len() * 4),
            colors: Vec::with_capacity(edges.len() * 6),
            opacities: Vec::with_capacity(edges.len() * 2),
        };
        for (index, &(a, b)) in edges.iter().enumerate() {
            let (a, b) = (a as usize, b as usize);
            if a >= points.len() || b >= points.len() {
                return Err(EngineError::Dataset {
                    index,
                    reason: "edge endpoint is not a point index",
                });
            }
            for p in [points.position(a), points.position(b)] {
                lines.vertices.extend_from_slice(&[p.x, p.y]);
                lines.colors.extend_from_slice(&defaults.color.0);
                lines.opacities.push(defaults.opacity);
            }
        }
        Ok(lines)
    }

    /// Two scalars per vertex, three per color, one opacity per vertex.
    pub fn check(&self) -> Result<(), EngineError> {
        let n = self.vertices.len() / 2;
        if self.vertices.len() % 2 != 0 || self.colors.len() != n * 3 || self.opacities.len() != n {
            return Err(EngineError::Dataset {
                index: n,
                reason: "line vertex, color and opacity counts disagree",
            });
        }
        if n > MAX_LINE_VERTICES {
            return Err(EngineError::Limit {
                what: "line vertex count",
                max: MAX_LINE_VERTICES,
            });
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Segment-pair vertices of a ring of `segments` chords around `center`.
/// The count is clamped to `[3, MAX_FOCUS_SEGMENTS]`.
pub fn focus_ring(center: Vec2, radius: f32, segments: usize) -> Vec<f32> {
    let segments = segments.clamp(3, MAX_FOCUS_SEGMENTS);
    let step = std::f32::consts::TAU / segments as f32;
    let mut out = Vec::with_capacity(segments * 4);
    for k in 0..segments {
        let (s0, c0) = (k as f32 * step).sin_cos();
        let (s1, c1) = ((k + 1) as f32 * step).sin_cos();
        out.extend_from_slice(&[
            center.x + radius * c0,
            center.y + radius * s0,
            center.x + radius * c1,
            center.y + radius * s1,
        ]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> PointDefaults {
        PointDefaults::default()
    }

    #[test]
    fn records_fill_missing_attributes_from_defaults() {
        let mut red = PointRecord::at(1.0, 2.0);
        red.color = Some(Rgb([1.0, 0.0, 0.0]));
        red.opacity = Some(0.4);
        let ps = PointSet::from_records(&[red, PointRecord::at(3.0, 4.0)], &defaults()).unwrap();
        ps.assert_consistent();
        assert_eq!(ps.len(), 2);
        assert_eq!(ps.position(1), Vec2::new(3.0, 4.0));
        assert_eq!(ps.color(0), Rgb([1.0, 0.0, 0.0]));
        assert_eq!(ps.color(1), Rgb::GRAY);
        assert_eq!(ps.opacities(), &[0.4, 0.9]);
        assert_eq!(ps.sizes(), &[4.0, 4.0]);
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let recs = [PointRecord::at(0.0, 0.0), PointRecord::at(f32::NAN, 1.0)];
        match PointSet::from_records(&recs, &defaults()) {
            Err(EngineError::Dataset { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected {:?}", other.map(|p| p.len())),
        }
        assert!(PointSet::from_positions(&[0.0, 1.0e38], &defaults()).is_err());
        assert!(PointSet::from_positions(&[0.0, 1.0, 2.0], &defaults()).is_err());
    }

    #[test]
    fn json_records_use_camel_case() {
        let v = serde_json::json!([
            {"x": 0.5, "y": -0.5, "outerRingOpacity": 0.2},
            {"x": 0.0, "y": 0.0, "color": [0.0, 1.0, 0.0]}
        ]);
        let ps = PointSet::from_json_value(v, &defaults()).unwrap();
        assert_eq!(ps.outer_ring_opacities(), &[0.2, 0.9]);
        assert_eq!(ps.default_color(1), Rgb([0.0, 1.0, 0.0]));
    }

    #[test]
    fn restore_defaults_undoes_edits() {
        let mut ps = PointSet::from_positions(&[0.0, 0.0, 1.0, 1.0], &defaults()).unwrap();
        ps.set_color(1, Rgb::BLACK);
        ps.attribute_mut(Attribute::Opacities)[0] = 0.1;
        ps.restore_default_colors();
        ps.restore_default_opacities();
        assert_eq!(ps.color(1), Rgb::GRAY);
        assert_eq!(ps.opacities(), &[0.9, 0.9]);
    }

    #[test]
    fn lines_from_edges_use_point_positions() {
        let ps = PointSet::from_positions(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0], &defaults()).unwrap();
        let lines = LineSet::from_edges(&ps, &[(0, 1), (1, 2)], &LineDefaults::default()).unwrap();
        assert_eq!(lines.vertex_count(), 4);
        assert_eq!(&lines.vertices[..4], &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(lines.opacities, vec![0.5; 4]);
        assert!(LineSet::from_edges(&ps, &[(0, 3)], &LineDefaults::default()).is_err());
    }

    #[test]
    fn focus_ring_closes_on_itself() {
        let ring = focus_ring(Vec2::new(1.0, 1.0), 0.5, 8);
        assert_eq!(ring.len(), 8 * 4);
        let n = ring.len();
        assert!((ring[0] - ring[n - 2]).abs() < 1e-5);
        assert!((ring[1] - ring[n - 1]).abs() < 1e-5);
    }

    #[test]
    fn focus_ring_segment_count_is_capped() {
        let ring = focus_ring(Vec2::new(0.0, 0.0), 0.1, usize::MAX);
        assert_eq!(ring.len(), MAX_FOCUS_SEGMENTS * 4);
        assert_eq!(focus_ring(Vec2::new(0.0, 0.0), 0.1, 0).len(), 3 * 4);
    }

    #[test]
    fn mismatched_line_arrays_fail_check() {
        let odd = LineSet {
            vertices: vec![0.0, 0.0, 1.0],
            colors: vec![0.5; 3],
            opacities: vec![1.0],
        };
        assert!(matches!(odd.check(), Err(EngineError::Dataset { .. })));
        let short_colors = LineSet {
            vertices: vec![0.0, 0.0, 1.0, 1.0],
            colors: vec![0.5; 3],
            opacities: vec![1.0; 2],
        };
        assert!(short_colors.check().is_err());
        assert!(LineSet::default().check().is_ok());
    }
}
