use embview::geometry::polygon::{classify_flat, vertices_from_flat};
use embview::geometry::transform::world_to_screen;
use embview::{
    CommitOutcome, EngineConfig, Gesture, InteractionController, Palette, PointRecord,
    PointSet, PointerButton, Rgb, ScreenPos, SelectionState, Vec2, UNSELECTED,
};

const W: f32 = 200.0;
const H: f32 = 200.0;

fn unit_square() -> (SelectionState, EngineConfig) {
    let cfg = EngineConfig::default();
    let pts = PointSet::from_positions(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0], &cfg.point).unwrap();
    (SelectionState::new(pts, &cfg), cfg)
}

fn closed_path(verts: &[(f32, f32)], st: &mut SelectionState) {
    st.clear_lasso();
    for &(x, y) in verts {
        st.push_lasso_vertex(Vec2::new(x, y));
    }
    st.close_lasso();
}

#[test]
fn scenario_a_enclosing_lasso_selects_all() {
    let (mut st, _) = unit_square();
    closed_path(&[(-0.5, -0.5), (1.5, -0.5), (1.5, 1.5), (-0.5, 1.5)], &mut st);
    let poly = vertices_from_flat(st.lasso());
    assert_eq!(classify_flat(st.points().positions(), &poly), vec![true; 4]);

    match st.commit_lasso() {
        CommitOutcome::Committed { group, selected, mask } => {
            assert_eq!(group, 0);
            assert_eq!(selected, 4);
            assert_eq!(mask, vec![true; 4]);
        }
        other => panic!("expected commit, got {:?}", other),
    }
    assert_eq!(st.groups(), &[0, 0, 0, 0]);
    assert_eq!(st.group_count(), 1);
}

#[test]
fn scenario_b_sliver_outside_clears_selection() {
    let (mut st, _) = unit_square();
    closed_path(&[(-0.5, -0.5), (1.5, -0.5), (1.5, 1.5), (-0.5, 1.5)], &mut st);
    st.commit_lasso();
    assert_eq!(st.group_count(), 1);

    closed_path(&[(3.0, 3.0), (4.0, 3.0), (3.5, 3.0)], &mut st);
    let poly = vertices_from_flat(st.lasso());
    assert_eq!(classify_flat(st.points().positions(), &poly), vec![false; 4]);
    assert_eq!(st.commit_lasso(), CommitOutcome::Cleared);
    assert_eq!(st.group_count(), 0);
    assert!(st.groups().iter().all(|&g| g == UNSELECTED));
    assert!(st.lasso().is_empty());
}

#[test]
fn repeated_commits_increment_counter_and_move_points() {
    let (mut st, _) = unit_square();
    let palette = Palette::default();

    // left column, then bottom row, then everything
    closed_path(&[(-0.5, -0.5), (0.5, -0.5), (0.5, 1.5), (-0.5, 1.5)], &mut st);
    assert_eq!(st.commit_lasso().group_count(), 1);
    closed_path(&[(-0.5, -0.5), (1.5, -0.5), (1.5, 0.5), (-0.5, 0.5)], &mut st);
    assert_eq!(st.commit_lasso().group_count(), 2);
    assert_eq!(st.groups(), &[1, 1, UNSELECTED, 0]);
    assert_eq!(st.points().color(0), palette.color(1));
    assert_eq!(st.points().color(3), palette.color(0));

    closed_path(&[(-0.5, -0.5), (1.5, -0.5), (1.5, 1.5), (-0.5, 1.5)], &mut st);
    st.commit_lasso();
    assert_eq!(st.group_count(), 3);
    assert_eq!(st.groups(), &[2, 2, 2, 2]);
}

#[test]
fn committing_the_same_path_twice_moves_points_to_a_new_group() {
    let (mut st, _) = unit_square();
    let palette = Palette::default();
    closed_path(&[(-0.5, -0.5), (1.5, -0.5), (1.5, 1.5), (-0.5, 1.5)], &mut st);

    assert_eq!(st.commit_lasso().group_count(), 1);
    assert_eq!(st.groups(), &[0, 0, 0, 0]);

    // no reset in between: the same polygon commits again
    assert_eq!(st.commit_lasso().group_count(), 2);
    assert_eq!(st.groups(), &[1, 1, 1, 1]);
    assert_eq!(st.group_count(), 2);
    assert!((0..4).all(|i| st.points().color(i) == palette.color(1)));
}

#[test]
fn reset_restores_each_points_own_default() {
    let cfg = EngineConfig::default();
    let mut tinted = PointRecord::at(0.0, 0.0);
    tinted.color = Some(Rgb([0.2, 0.4, 0.8]));
    tinted.opacity = Some(0.3);
    let pts = PointSet::from_records(&[tinted, PointRecord::at(5.0, 5.0)], &cfg.point).unwrap();
    let mut st = SelectionState::new(pts, &cfg);

    closed_path(&[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)], &mut st);
    st.commit_lasso();
    assert_ne!(st.points().color(0), Rgb([0.2, 0.4, 0.8]));

    st.reset_selection();
    assert_eq!(st.points().color(0), Rgb([0.2, 0.4, 0.8]));
    assert_eq!(st.points().color(1), Rgb::GRAY);
    assert_eq!(st.points().opacities(), &[0.3, 0.9]);
}

#[test]
fn scenario_e_six_scalars_are_discarded() {
    let (mut st, cfg) = unit_square();
    let mut ctl = InteractionController::new(cfg.interaction.clone(), W, H);
    ctl.pointer_down(&mut st, PointerButton::Primary, ScreenPos::new(10.0, 10.0));
    st.set_lasso(vec![-0.5, -0.5, 1.5, -0.5, 0.5, 1.5]);
    let r = ctl.pointer_up(&mut st, ScreenPos::new(20.0, 20.0));
    assert!(r.commit.is_none());
    assert_eq!(ctl.gesture(), Gesture::Idle);
    assert!(st.lasso().is_empty());
    assert_eq!(st.group_count(), 0);
    assert!(st.groups().iter().all(|&g| g == UNSELECTED));
}

#[test]
fn two_samples_are_discarded_three_commit() {
    let (mut st, cfg) = unit_square();
    let mut ctl = InteractionController::new(cfg.interaction.clone(), W, H);
    let m = *st.transform().matrix();
    let screen = |x: f32, y: f32| world_to_screen(Vec2::new(x, y), W, H, &m);

    ctl.pointer_down(&mut st, PointerButton::Primary, screen(-0.5, -0.5));
    ctl.pointer_move(&mut st, screen(-0.5, -0.5));
    ctl.pointer_move(&mut st, screen(1.5, -0.5));
    assert_eq!(st.lasso().len(), 4);
    assert!(ctl.pointer_up(&mut st, screen(1.5, -0.5)).commit.is_none());

    ctl.pointer_down(&mut st, PointerButton::Primary, screen(-0.5, -0.5));
    for (x, y) in [(-0.5, -0.5), (1.5, -0.5), (1.5, 1.5), (-0.5, 1.5)] {
        ctl.pointer_move(&mut st, screen(x, y));
    }
    assert_eq!(st.lasso().len(), 2 + 2 + 4 + 4);
    let up = screen(-0.5, 1.5);
    let r = ctl.pointer_up(&mut st, up);
    let commit = r.commit.expect("lasso should commit");
    assert_eq!(commit.at, up);
    assert_eq!(commit.outcome.group_count(), 1);
    assert_eq!(st.groups(), &[0, 0, 0, 0]);
    // closing segment: last vertex, then the first
    let n = st.lasso().len();
    assert_eq!(&st.lasso()[n - 2..], &st.lasso()[..2]);
}

#[test]
fn lasso_start_restores_default_opacities() {
    let (mut st, cfg) = unit_square();
    let mut ctl = InteractionController::new(cfg.interaction.clone(), W, H);
    st.points_mut().attribute_mut(embview::Attribute::Opacities)[1] = 0.05;
    ctl.pointer_down(&mut st, PointerButton::Primary, ScreenPos::new(0.0, 0.0));
    assert_eq!(st.points().opacities()[1], 0.9);
}

#[test]
fn degenerate_transform_skips_samples() {
    let mut cfg = EngineConfig::default();
    cfg.transform.scale = Vec2::new(0.0, 0.9);
    let pts = PointSet::from_positions(&[0.0, 0.0], &cfg.point).unwrap();
    let mut st = SelectionState::new(pts, &cfg);
    let mut ctl = InteractionController::new(cfg.interaction.clone(), W, H);
    ctl.pointer_down(&mut st, PointerButton::Primary, ScreenPos::new(0.0, 0.0));
    let r = ctl.pointer_move(&mut st, ScreenPos::new(50.0, 50.0));
    assert!(!r.redraw);
    assert!(st.lasso().is_empty());
    assert!(matches!(ctl.gesture(), Gesture::LassoDrawing { .. }));
}
