//! Per-view selection record: points, lasso path, view transform, overlays and
//! group assignment.

use crate::config::{EngineConfig, Palette, TransformDefaults};
use crate::error::EngineError;
use crate::geometry::limits::MAX_LASSO_SCALARS;
use crate::geometry::polygon::{classify_flat, vertices_from_flat};
use crate::geometry::transform::ViewTransform;
use crate::model::{Vec2, UNSELECTED};
use crate::points::{focus_ring, LineSet, PointSet};

/// Result of running the commit algorithm over the current lasso path.
#[derive(Clone, Debug, PartialEq)]
pub enum CommitOutcome {
    /// Nothing was enclosed; the selection was reset and `group_count` is 0.
    Cleared,
    /// `selected` points were moved into `group`.
    Committed {
        group: u32,
        selected: usize,
        mask: Vec<bool>,
    },
}

impl CommitOutcome {
    /// Group count the chart should be told about after this commit.
    pub fn group_count(&self) -> u32 {
        match self {
            CommitOutcome::Cleared => 0,
            CommitOutcome::Committed { group, .. } => group + 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SelectionState {
    points: PointSet,
    lasso: Vec<f32>,
    transform: ViewTransform,
    transform_defaults: TransformDefaults,
    lines: LineSet,
    focus: Vec<f32>,
    focus_radius: f32,
    focus_segments: usize,
    groups: Vec<u32>,
    group_count: u32,
    palette: Palette,
}

impl SelectionState {
    pub fn new(points: PointSet, config: &EngineConfig) -> Self {
        points.assert_consistent();
        let groups = vec![UNSELECTED; points.len()];
        let mut st = SelectionState {
            points,
            lasso: Vec::new(),
            transform: ViewTransform::identity(),
            transform_defaults: config.transform.clone(),
            lines: LineSet::default(),
            focus: Vec::new(),
            focus_radius: config.render.focus_radius,
            focus_segments: config.render.focus_segments,
            groups,
            group_count: 0,
            palette: config.palette.clone(),
        };
        st.reset_transform();
        st
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut PointSet {
        &mut self.points
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn lasso(&self) -> &[f32] {
        &self.lasso
    }

    pub fn lines(&self) -> &LineSet {
        &self.lines
    }

    pub fn focus(&self) -> &[f32] {
        &self.focus
    }

    pub fn groups(&self) -> &[u32] {
        &self.groups
    }

    pub fn group_count(&self) -> u32 {
        self.group_count
    }

    pub fn reset_transform(&mut self) {
        let d = &self.transform_defaults;
        self.transform = ViewTransform::new(d.translate, d.rotation, d.scale);
    }

    pub fn translate_by(&mut self, dx: f32, dy: f32) {
        self.transform.translate_by(dx, dy);
    }

    pub fn scale_by(&mut self, factor: f32) {
        self.transform.scale_by(factor);
    }

    pub fn rotate_by(&mut self, radians: f32) {
        self.transform.rotate_by(radians);
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.transform.set_rotation(radians);
    }

    pub fn reset_selection(&mut self) {
        self.lasso.clear();
        self.groups.fill(UNSELECTED);
        self.group_count = 0;
        self.points.restore_default_colors();
        self.points.restore_default_opacities();
    }

    pub fn restore_default_opacities(&mut self) {
        self.points.restore_default_opacities();
    }

    pub fn clear_lasso(&mut self) {
        self.lasso.clear();
    }

    /// Append a world-space sample, keeping segment-pair layout.
    ///
    /// Returns false when the sample was dropped (invalid position or the path
    /// has reached its length cap).
    pub fn push_lasso_vertex(&mut self, p: Vec2) -> bool {
        if !p.is_valid() || self.lasso.len() + 4 > MAX_LASSO_SCALARS {
            return false;
        }
        let n = self.lasso.len();
        if n >= 4 {
            let (px, py) = (self.lasso[n - 2], self.lasso[n - 1]);
            self.lasso.extend_from_slice(&[px, py]);
        }
        self.lasso.extend_from_slice(&[p.x, p.y]);
        true
    }

    /// Close the path with a segment from the last vertex back to the first.
    pub fn close_lasso(&mut self) {
        let n = self.lasso.len();
        if n < 2 {
            return;
        }
        let (lx, ly) = (self.lasso[n - 2], self.lasso[n - 1]);
        let (fx, fy) = (self.lasso[0], self.lasso[1]);
        self.lasso.extend_from_slice(&[lx, ly, fx, fy]);
    }

    /// Replace the lasso path outright, e.g. from a host-drawn polygon.
    pub fn set_lasso(&mut self, flat: Vec<f32>) {
        self.lasso = flat;
    }

    /// Classify the points against the current lasso path and update groups.
    pub fn commit_lasso(&mut self) -> CommitOutcome {
        let polygon = vertices_from_flat(&self.lasso);
        let mask = classify_flat(self.points.positions(), &polygon);
        let selected = mask.iter().filter(|&&m| m).count();
        if selected == 0 {
            log::info!("empty lasso, clearing selection");
            self.reset_selection();
            return CommitOutcome::Cleared;
        }
        let group = self.group_count;
        let color = self.palette.color(group);
        for (i, _) in mask.iter().enumerate().filter(|(_, &m)| m) {
            self.groups[i] = group;
            self.points.set_color(i, color);
        }
        self.group_count += 1;
        log::info!("committed {} points to group {}", selected, group);
        CommitOutcome::Committed {
            group,
            selected,
            mask,
        }
    }

    /// Replace the line overlay. Mismatched arrays are rejected and the old lines kept.
    pub fn set_lines(&mut self, lines: LineSet) -> Result<(), EngineError> {
        lines.check()?;
        self.lines = lines;
        Ok(())
    }

    pub fn clear_lines(&mut self) {
        self.lines = LineSet::default();
    }

    pub fn set_focus(&mut self, center: Vec2) {
        self.focus = focus_ring(center, self.focus_radius, self.focus_segments);
    }

    pub fn clear_focus(&mut self) {
        self.focus.clear();
    }
}
