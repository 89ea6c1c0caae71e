//! Pointer and wheel handling as an explicit state machine.
//!
//! The controller never draws. Each handler mutates the owning view's
//! [`SelectionState`] and returns a [`Reaction`] telling the caller whether the
//! view needs a redraw and whether a lasso was committed.

use crate::config::InteractionConfig;
use crate::geometry::transform::screen_to_world;
use crate::model::{PointerButton, ScreenPos};
use crate::state::{CommitOutcome, SelectionState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Idle,
    LassoDrawing { down: ScreenPos },
    Panning { last: ScreenPos },
}

/// A commit produced by releasing a lasso, with the release point for labeling.
#[derive(Clone, Debug, PartialEq)]
pub struct Commit {
    pub outcome: CommitOutcome,
    pub at: ScreenPos,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reaction {
    pub redraw: bool,
    pub commit: Option<Commit>,
}

impl Reaction {
    fn none() -> Self {
        Reaction::default()
    }

    fn redraw() -> Self {
        Reaction {
            redraw: true,
            commit: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct InteractionController {
    gesture: Gesture,
    config: InteractionConfig,
    width: f32,
    height: f32,
}

impl InteractionController {
    /// `width`/`height` are the canvas size in CSS pixels, read once.
    pub fn new(config: InteractionConfig, width: f32, height: f32) -> Self {
        InteractionController {
            gesture: Gesture::Idle,
            config,
            width,
            height,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    pub fn pointer_down(
        &mut self,
        st: &mut SelectionState,
        button: PointerButton,
        pos: ScreenPos,
    ) -> Reaction {
        if !self.is_idle() {
            log::debug!("pointer down ignored during {:?}", self.gesture);
            return Reaction::none();
        }
        match button {
            PointerButton::Primary => {
                st.clear_lasso();
                st.restore_default_opacities();
                self.gesture = Gesture::LassoDrawing { down: pos };
                log::debug!("lasso started at ({}, {})", pos.x, pos.y);
                Reaction::redraw()
            }
            PointerButton::Secondary => {
                self.gesture = Gesture::Panning { last: pos };
                log::debug!("pan started");
                Reaction::none()
            }
            PointerButton::Auxiliary => Reaction::none(),
        }
    }

    pub fn pointer_move(&mut self, st: &mut SelectionState, pos: ScreenPos) -> Reaction {
        match self.gesture {
            Gesture::Idle => Reaction::none(),
            Gesture::LassoDrawing { .. } => {
                let world = screen_to_world(pos, self.width, self.height, st.transform().matrix());
                if st.push_lasso_vertex(world) {
                    Reaction::redraw()
                } else {
                    Reaction::none()
                }
            }
            Gesture::Panning { last } => {
                let s = self.config.pan_sensitivity;
                st.translate_by(s * (pos.x - last.x), -s * (pos.y - last.y));
                self.gesture = Gesture::Panning { last: pos };
                Reaction::redraw()
            }
        }
    }

    pub fn pointer_up(&mut self, st: &mut SelectionState, pos: ScreenPos) -> Reaction {
        let prev = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match prev {
            Gesture::Idle => Reaction::none(),
            Gesture::Panning { .. } => {
                log::debug!("pan finished");
                Reaction::none()
            }
            Gesture::LassoDrawing { .. } => {
                if st.lasso().len() <= self.config.min_closing_scalars {
                    log::debug!("lasso with {} scalars discarded", st.lasso().len());
                    st.clear_lasso();
                    return Reaction::redraw();
                }
                st.close_lasso();
                let outcome = st.commit_lasso();
                Reaction {
                    redraw: true,
                    commit: Some(Commit { outcome, at: pos }),
                }
            }
        }
    }

    /// Zoom. Legal in every state and never changes the gesture.
    pub fn wheel(&mut self, st: &mut SelectionState, delta_y: f32) -> Reaction {
        let s = self.config.wheel_sensitivity;
        if delta_y > 0.0 {
            st.scale_by(1.0 + s);
        } else if delta_y < 0.0 {
            st.scale_by(1.0 - s);
        } else {
            return Reaction::none();
        }
        Reaction::redraw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::points::PointSet;

    fn setup() -> (InteractionController, SelectionState) {
        let cfg = EngineConfig::default();
        let pts = PointSet::from_positions(&[0.0, 0.0, 0.5, 0.5], &cfg.point).unwrap();
        let st = SelectionState::new(pts, &cfg);
        (InteractionController::new(cfg.interaction, 200.0, 200.0), st)
    }

    #[test]
    fn secondary_down_while_drawing_is_ignored() {
        let (mut ctl, mut st) = setup();
        ctl.pointer_down(&mut st, PointerButton::Primary, ScreenPos::new(10.0, 10.0));
        let r = ctl.pointer_down(&mut st, PointerButton::Secondary, ScreenPos::new(0.0, 0.0));
        assert_eq!(r, Reaction::default());
        assert!(matches!(ctl.gesture(), Gesture::LassoDrawing { .. }));
    }

    #[test]
    fn pan_inverts_vertical_axis() {
        let (mut ctl, mut st) = setup();
        ctl.pointer_down(&mut st, PointerButton::Secondary, ScreenPos::new(100.0, 100.0));
        ctl.pointer_move(&mut st, ScreenPos::new(110.0, 120.0));
        let t = st.transform().translate();
        assert!((t.x - 0.02).abs() < 1e-6);
        assert!((t.y + 0.04).abs() < 1e-6);
        ctl.pointer_up(&mut st, ScreenPos::new(110.0, 120.0));
        assert!(ctl.is_idle());
    }

    #[test]
    fn wheel_zero_is_a_no_op() {
        let (mut ctl, mut st) = setup();
        let before = st.transform().clone();
        assert!(!ctl.wheel(&mut st, 0.0).redraw);
        assert_eq!(st.transform(), &before);
        assert!(ctl.wheel(&mut st, -3.0).redraw);
        assert!((st.transform().scale().x - 0.9 * 0.95).abs() < 1e-6);
    }

    #[test]
    fn wheel_during_lasso_keeps_gesture() {
        let (mut ctl, mut st) = setup();
        ctl.pointer_down(&mut st, PointerButton::Primary, ScreenPos::new(10.0, 10.0));
        ctl.wheel(&mut st, 1.0);
        assert!(matches!(ctl.gesture(), Gesture::LassoDrawing { .. }));
    }

    #[test]
    fn up_in_idle_does_nothing() {
        let (mut ctl, mut st) = setup();
        assert_eq!(ctl.pointer_up(&mut st, ScreenPos::new(0.0, 0.0)), Reaction::default());
    }
}
