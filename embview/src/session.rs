//! Views, their links and the two external collaborators, wired together.
//!
//! Every event entry point first drains the inbound message queue, then routes
//! the event to the owning view's controller, redraws, and on a lasso commit
//! propagates linked attributes and notifies the collaborators.

use crate::config::EngineConfig;
use crate::error::{EngineError, LinkError};
use crate::interaction::{Commit, InteractionController, Reaction};
use crate::link::{LinkBinding, Synchronizer};
use crate::model::{PointerButton, ScreenPos, Vec2, ViewId, ViewRole};
use crate::points::{LineSet, PointSet};
use crate::protocol::{group_rows, InboundMessage, OutboundMessage, SummaryKind};
use crate::render::{FrameStats, RenderPipeline, Surface};
use crate::state::{CommitOutcome, SelectionState};
use serde_json::Value;
use std::collections::VecDeque;

/// Read-only view of a view's group assignment, handed to the chart.
#[derive(Clone, Copy, Debug)]
pub struct ViewData<'a> {
    pub id: ViewId,
    pub role: ViewRole,
    pub groups: &'a [u32],
}

/// Draws the non-GPU charts around the canvas.
pub trait ChartCollaborator {
    fn chart(&mut self, data: &ViewData<'_>, group_count: u32);
    /// Reply from the aggregation service, forwarded unchanged.
    fn summary(&mut self, _kind: SummaryKind, _content: &Value) {}
}

/// Transport to the remote aggregation service.
pub trait AggregationCollaborator {
    fn send(&mut self, msg: &OutboundMessage);
}

/// Collaborator that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Detached;

impl ChartCollaborator for Detached {
    fn chart(&mut self, _data: &ViewData<'_>, _group_count: u32) {}
}

impl AggregationCollaborator for Detached {
    fn send(&mut self, _msg: &OutboundMessage) {}
}

pub struct View<S: Surface> {
    id: ViewId,
    role: ViewRole,
    state: SelectionState,
    controller: InteractionController,
    pipeline: RenderPipeline<S>,
    last_frame: FrameStats,
}

impl<S: Surface> View<S> {
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn role(&self) -> ViewRole {
        self.role
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn surface(&self) -> &S {
        self.pipeline.surface()
    }

    pub fn last_frame(&self) -> &FrameStats {
        &self.last_frame
    }

    fn redraw(&mut self) -> Result<(), EngineError> {
        self.last_frame = self.pipeline.redraw(&self.state)?;
        Ok(())
    }

    fn data(&self) -> ViewData<'_> {
        ViewData {
            id: self.id,
            role: self.role,
            groups: self.state.groups(),
        }
    }
}

pub struct SessionBuilder<S: Surface> {
    config: EngineConfig,
    data_key: String,
    views: Vec<(ViewRole, PointSet, S)>,
    links: Vec<LinkBinding>,
    chart: Box<dyn ChartCollaborator>,
    aggregation: Box<dyn AggregationCollaborator>,
}

impl<S: Surface> SessionBuilder<S> {
    pub fn new(config: EngineConfig) -> Self {
        SessionBuilder {
            config,
            data_key: String::new(),
            views: Vec::new(),
            links: Vec::new(),
            chart: Box::new(Detached),
            aggregation: Box::new(Detached),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = key.into();
        self
    }

    pub fn chart(mut self, chart: Box<dyn ChartCollaborator>) -> Self {
        self.chart = chart;
        self
    }

    pub fn aggregation(mut self, aggregation: Box<dyn AggregationCollaborator>) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn add_view(&mut self, role: ViewRole, points: PointSet, surface: S) -> ViewId {
        self.views.push((role, points, surface));
        ViewId(self.views.len() - 1)
    }

    pub fn link(&mut self, binding: LinkBinding) {
        self.links.push(binding);
    }

    /// Link `a` and `b` in both directions on the same attribute.
    pub fn link_both(&mut self, a: ViewId, b: ViewId, attr: crate::points::Attribute) {
        self.links.push(LinkBinding::same(a, b, attr));
        self.links.push(LinkBinding::same(b, a, attr));
    }

    /// Validate roles and links, compile every view's programs and draw once.
    pub fn build(self) -> Result<Session<S>, EngineError> {
        for (i, (role, _, _)) in self.views.iter().enumerate() {
            if self.views[..i].iter().any(|(r, _, _)| r == role) {
                return Err(EngineError::DuplicateRole(role.code().to_string()));
            }
        }
        for b in &self.links {
            for id in [b.source, b.target] {
                if id.0 >= self.views.len() {
                    return Err(EngineError::UnknownView(id.0));
                }
            }
            if b.source == b.target {
                return Err(LinkError::SelfLink.into());
            }
            let m = Synchronizer::validate(b, &self.views[b.source.0].1, &self.views[b.target.0].1)?;
            log::debug!("link {} -> {}: {:?}", b.source, b.target, m);
        }

        let mut views = Vec::with_capacity(self.views.len());
        for (i, (role, points, surface)) in self.views.into_iter().enumerate() {
            let (w, h) = surface.size();
            let pipeline = RenderPipeline::new(surface, &self.config.render)?;
            let mut view = View {
                id: ViewId(i),
                role,
                state: SelectionState::new(points, &self.config),
                controller: InteractionController::new(self.config.interaction.clone(), w, h),
                pipeline,
                last_frame: FrameStats::default(),
            };
            view.redraw()?;
            log::info!("view {} ({}) ready with {} points", view.id, role, view.state.points().len());
            views.push(view);
        }

        Ok(Session {
            config: self.config,
            data_key: self.data_key,
            views,
            sync: Synchronizer::new(self.links),
            chart: self.chart,
            aggregation: self.aggregation,
            inbox: VecDeque::new(),
        })
    }
}

pub struct Session<S: Surface> {
    config: EngineConfig,
    data_key: String,
    views: Vec<View<S>>,
    sync: Synchronizer,
    chart: Box<dyn ChartCollaborator>,
    aggregation: Box<dyn AggregationCollaborator>,
    inbox: VecDeque<String>,
}

impl<S: Surface> Session<S> {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn data_key(&self) -> &str {
        &self.data_key
    }

    pub fn views(&self) -> impl Iterator<Item = &View<S>> {
        self.views.iter()
    }

    pub fn view(&self, id: ViewId) -> Result<&View<S>, EngineError> {
        self.views.get(id.0).ok_or(EngineError::UnknownView(id.0))
    }

    fn view_mut(&mut self, id: ViewId) -> Result<&mut View<S>, EngineError> {
        self.views.get_mut(id.0).ok_or(EngineError::UnknownView(id.0))
    }

    pub fn find_role(&self, role: ViewRole) -> Option<ViewId> {
        self.views.iter().find(|v| v.role == role).map(|v| v.id)
    }

    pub fn state(&self, id: ViewId) -> Result<&SelectionState, EngineError> {
        Ok(&self.view(id)?.state)
    }

    pub fn links(&self) -> &[LinkBinding] {
        self.sync.bindings()
    }

    // Events

    pub fn pointer_down(
        &mut self,
        id: ViewId,
        button: PointerButton,
        pos: ScreenPos,
    ) -> Result<Reaction, EngineError> {
        self.pump_messages();
        let view = self.view_mut(id)?;
        let r = view.controller.pointer_down(&mut view.state, button, pos);
        self.react(id, r)
    }

    pub fn pointer_move(&mut self, id: ViewId, pos: ScreenPos) -> Result<Reaction, EngineError> {
        self.pump_messages();
        let view = self.view_mut(id)?;
        let r = view.controller.pointer_move(&mut view.state, pos);
        self.react(id, r)
    }

    pub fn pointer_up(&mut self, id: ViewId, pos: ScreenPos) -> Result<Reaction, EngineError> {
        self.pump_messages();
        let view = self.view_mut(id)?;
        let r = view.controller.pointer_up(&mut view.state, pos);
        self.react(id, r)
    }

    pub fn wheel(&mut self, id: ViewId, delta_y: f32) -> Result<Reaction, EngineError> {
        self.pump_messages();
        let view = self.view_mut(id)?;
        let r = view.controller.wheel(&mut view.state, delta_y);
        self.react(id, r)
    }

    /// Redraw the owning view, then publish any commit. A commit has already
    /// changed the groups, so it is published even when the redraw fails.
    fn react(&mut self, id: ViewId, r: Reaction) -> Result<Reaction, EngineError> {
        let drawn = if r.redraw {
            self.view_mut(id)?.redraw()
        } else {
            Ok(())
        };
        if let Some(Commit { outcome, .. }) = &r.commit {
            self.after_commit(id, outcome)?;
        }
        drawn.map(|()| r)
    }

    fn after_commit(&mut self, id: ViewId, outcome: &CommitOutcome) -> Result<(), EngineError> {
        let targets = self.propagate_from(id)?;
        let view = self.views.get(id.0).ok_or(EngineError::UnknownView(id.0))?;
        self.chart.chart(&view.data(), outcome.group_count());
        if let CommitOutcome::Committed { mask, .. } = outcome {
            let msg = OutboundMessage::AddSelection {
                data_key: self.data_key.clone(),
                source_view_id: self.views[id.0].role,
                target_view_ids: targets.iter().map(|t| self.views[t.0].role).collect(),
                selected_mask: mask.clone(),
            };
            self.aggregation.send(&msg);
        }
        Ok(())
    }

    /// Push every outgoing binding of `source` and redraw the touched targets.
    ///
    /// A binding that fails to remap is skipped with a warning; its target keeps
    /// its previous attributes.
    fn propagate_from(&mut self, source: ViewId) -> Result<Vec<ViewId>, EngineError> {
        let mut touched: Vec<ViewId> = Vec::new();
        let bindings: Vec<LinkBinding> = self.sync.outgoing(source).copied().collect();
        for b in &bindings {
            let (src, dst) = pair_mut(&mut self.views, b.source.0, b.target.0);
            match Synchronizer::propagate(b, src.state.points(), dst.state.points_mut()) {
                Ok(m) => {
                    log::debug!("propagated {:?} {} -> {} ({:?})", b.source_attr, b.source, b.target, m);
                    if !touched.contains(&b.target) {
                        touched.push(b.target);
                    }
                }
                Err(e) => log::warn!("link {} -> {} skipped: {}", b.source, b.target, e),
            }
        }
        for t in &touched {
            self.view_mut(*t)?.redraw()?;
        }
        Ok(touched)
    }

    // Programmatic state changes

    pub fn reset_transform(&mut self, id: ViewId) -> Result<(), EngineError> {
        self.pump_messages();
        let view = self.view_mut(id)?;
        view.state.reset_transform();
        view.redraw()
    }

    /// Clear the selection of a view as an empty lasso would.
    pub fn reset_selection(&mut self, id: ViewId) -> Result<(), EngineError> {
        self.pump_messages();
        let view = self.view_mut(id)?;
        view.state.reset_selection();
        view.redraw()?;
        log::info!("selection of view {} reset", id);
        self.after_commit(id, &CommitOutcome::Cleared)
    }

    pub fn rotate_by(&mut self, id: ViewId, radians: f32) -> Result<(), EngineError> {
        let view = self.view_mut(id)?;
        view.state.rotate_by(radians);
        view.redraw()
    }

    pub fn set_rotation(&mut self, id: ViewId, radians: f32) -> Result<(), EngineError> {
        let view = self.view_mut(id)?;
        view.state.set_rotation(radians);
        view.redraw()
    }

    pub fn set_lines(&mut self, id: ViewId, lines: LineSet) -> Result<(), EngineError> {
        let view = self.view_mut(id)?;
        view.state.set_lines(lines)?;
        view.redraw()
    }

    /// Draw one segment per `(source, target)` point pair using default line styling.
    pub fn set_edges(&mut self, id: ViewId, edges: &[(u32, u32)]) -> Result<(), EngineError> {
        let defaults = self.config.line.clone();
        let view = self.view_mut(id)?;
        let lines = LineSet::from_edges(view.state.points(), edges, &defaults)?;
        view.state.set_lines(lines)?;
        view.redraw()
    }

    pub fn clear_lines(&mut self, id: ViewId) -> Result<(), EngineError> {
        let view = self.view_mut(id)?;
        view.state.clear_lines();
        view.redraw()
    }

    pub fn set_focus(&mut self, id: ViewId, center: Option<Vec2>) -> Result<(), EngineError> {
        let view = self.view_mut(id)?;
        match center {
            Some(c) => view.state.set_focus(c),
            None => view.state.clear_focus(),
        }
        view.redraw()
    }

    /// Ask the aggregation service for per-group distributions of a data column.
    pub fn request_histogram(
        &mut self,
        id: ViewId,
        column: u32,
        pos: ScreenPos,
    ) -> Result<(), EngineError> {
        let view = self.view(id)?;
        let msg = OutboundMessage::RequestHistogram {
            data_key: self.data_key.clone(),
            view_id: view.role,
            group_rows: group_rows(view.state.groups(), view.state.group_count()),
            selected_column: column,
            pos: [pos.x, pos.y],
        };
        self.aggregation.send(&msg);
        Ok(())
    }

    // Inbound messages

    /// Queue a raw reply; it is applied before the next event is handled.
    pub fn enqueue_message(&mut self, raw: impl Into<String>) {
        self.inbox.push_back(raw.into());
    }

    pub fn pending_messages(&self) -> usize {
        self.inbox.len()
    }

    /// Apply queued replies in arrival order. Returns how many were forwarded.
    pub fn pump_messages(&mut self) -> usize {
        let mut forwarded = 0;
        while let Some(raw) = self.inbox.pop_front() {
            if let Some(msg) = InboundMessage::parse(&raw) {
                let (kind, content) = msg.into_parts();
                log::debug!("forwarding {:?}", kind);
                self.chart.summary(kind, &content);
                forwarded += 1;
            }
        }
        forwarded
    }
}

/// Borrow `views[a]` shared and `views[b]` mutably. `a != b`.
fn pair_mut<T>(views: &mut [T], a: usize, b: usize) -> (&T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = views.split_at_mut(b);
        (&lo[a], &mut hi[0])
    } else {
        let (lo, hi) = views.split_at_mut(a);
        (&hi[0], &mut lo[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_mut_handles_both_orders() {
        let mut v = vec![1, 2, 3];
        {
            let (a, b) = pair_mut(&mut v, 0, 2);
            *b += *a;
        }
        {
            let (a, b) = pair_mut(&mut v, 2, 1);
            *b += *a;
        }
        assert_eq!(v, vec![1, 6, 4]);
    }
}
