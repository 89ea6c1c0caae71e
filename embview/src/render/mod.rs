//! Four-pass point cloud renderer over an abstract GPU surface.

pub mod headless;
pub mod shaders;

use crate::config::RenderConfig;
use crate::error::SurfaceError;
use crate::geometry::transform::Mat4;
use crate::state::SelectionState;

pub use headless::{HeadlessSurface, SurfaceCall};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pass {
    Line,
    Point,
    Lasso,
    Focus,
}

impl Pass {
    /// Draw order; later passes paint over earlier ones.
    pub const ORDER: [Pass; 4] = [Pass::Line, Pass::Point, Pass::Lasso, Pass::Focus];

    pub fn name(&self) -> &'static str {
        match self {
            Pass::Line => "line",
            Pass::Point => "point",
            Pass::Lasso => "lasso",
            Pass::Focus => "focus",
        }
    }

    fn sources(&self) -> (&'static str, &'static str) {
        match self {
            Pass::Line => (shaders::LINE_VS, shaders::LINE_FS),
            Pass::Point => (shaders::POINT_VS, shaders::POINT_FS),
            Pass::Lasso => (shaders::LASSO_VS, shaders::LASSO_FS),
            Pass::Focus => (shaders::FOCUS_VS, shaders::FOCUS_FS),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Points,
    Lines,
    Triangles,
}

/// Handle to a program compiled by a [`Surface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub usize);

/// GPU surface contract. Implemented over WebGL in the browser and in memory
/// for tests and benchmarks.
pub trait Surface {
    /// Canvas size in CSS pixels.
    fn size(&self) -> (f32, f32);
    fn compile_program(
        &mut self,
        pass: Pass,
        vertex: &str,
        fragment: &str,
    ) -> Result<ProgramId, SurfaceError>;
    fn use_program(&mut self, program: ProgramId);
    /// Upload a tightly packed float attribute for the program in use.
    fn upload_attribute(
        &mut self,
        name: &str,
        data: &[f32],
        components: usize,
    ) -> Result<(), SurfaceError>;
    fn set_uniform_mat4(&mut self, name: &str, m: &Mat4);
    fn set_uniform_f32(&mut self, name: &str, v: f32);
    fn clear(&mut self, rgba: [f32; 4]);
    fn draw(&mut self, primitive: Primitive, vertex_count: usize);
}

/// What a redraw actually drew, in pass order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub passes: Vec<(Pass, usize)>,
}

impl FrameStats {
    pub fn drew(&self, pass: Pass) -> bool {
        self.passes.iter().any(|(p, _)| *p == pass)
    }

    pub fn vertices(&self, pass: Pass) -> usize {
        self.passes
            .iter()
            .find(|(p, _)| *p == pass)
            .map_or(0, |(_, n)| *n)
    }
}

pub struct RenderPipeline<S: Surface> {
    surface: S,
    programs: [ProgramId; 4],
    config: RenderConfig,
}

impl<S: Surface> RenderPipeline<S> {
    /// Compile the four programs once; they are reused by every redraw.
    pub fn new(mut surface: S, config: &RenderConfig) -> Result<Self, SurfaceError> {
        let mut programs = [ProgramId(0); 4];
        for (slot, pass) in programs.iter_mut().zip(Pass::ORDER) {
            let (vs, fs) = pass.sources();
            *slot = surface.compile_program(pass, vs, fs)?;
        }
        Ok(RenderPipeline {
            surface,
            programs,
            config: config.clone(),
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn program(&self, pass: Pass) -> ProgramId {
        let idx = Pass::ORDER.iter().position(|p| *p == pass).unwrap_or(0);
        self.programs[idx]
    }

    /// Clear and draw every non-empty pass. Buffers are rebuilt from scratch.
    pub fn redraw(&mut self, st: &SelectionState) -> Result<FrameStats, SurfaceError> {
        self.surface.clear(self.config.clear_color);
        let matrix = *st.transform().matrix();
        let mut stats = FrameStats::default();
        for pass in Pass::ORDER {
            let count = match pass {
                Pass::Line => st.lines().vertex_count(),
                Pass::Point => st.points().len(),
                Pass::Lasso => st.lasso().len() / 2,
                Pass::Focus => st.focus().len() / 2,
            };
            if count == 0 {
                continue;
            }
            self.surface.use_program(self.program(pass));
            self.surface.set_uniform_mat4("uTransform", &matrix);
            let primitive = match pass {
                Pass::Line => {
                    let lines = st.lines();
                    self.surface.upload_attribute("aPosition", &lines.vertices, 2)?;
                    self.surface.upload_attribute("aColor", &lines.colors, 3)?;
                    self.surface.upload_attribute("aOpacity", &lines.opacities, 1)?;
                    Primitive::Lines
                }
                Pass::Point => {
                    let pts = st.points();
                    self.surface.upload_attribute("aPosition", pts.positions(), 2)?;
                    self.surface.upload_attribute("aSize", pts.sizes(), 1)?;
                    self.surface.upload_attribute("aColor", pts.colors(), 3)?;
                    self.surface.upload_attribute("aOpacity", pts.opacities(), 1)?;
                    self.surface
                        .upload_attribute("aOuterRingColor", pts.outer_ring_colors(), 3)?;
                    self.surface
                        .upload_attribute("aOuterRingOpacity", pts.outer_ring_opacities(), 1)?;
                    self.surface.upload_attribute("aShape", pts.shapes(), 1)?;
                    self.surface.set_uniform_f32("uPointSizeMin", self.config.point_size_min);
                    self.surface.set_uniform_f32("uPointSizeMax", self.config.point_size_max);
                    self.surface.set_uniform_f32("uPointSizePow", self.config.point_size_pow);
                    Primitive::Points
                }
                Pass::Lasso => {
                    self.surface.upload_attribute("aPosition", st.lasso(), 2)?;
                    Primitive::Lines
                }
                Pass::Focus => {
                    self.surface.upload_attribute("aPosition", st.focus(), 2)?;
                    Primitive::Lines
                }
            };
            self.surface.draw(primitive, count);
            stats.passes.push((pass, count));
        }
        log::debug!("redraw {:?}", stats.passes);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::model::Vec2;
    use crate::points::PointSet;

    fn state(cfg: &EngineConfig) -> SelectionState {
        let pts = PointSet::from_positions(&[0.0, 0.0, 0.5, 0.5, -0.5, 0.2], &cfg.point).unwrap();
        SelectionState::new(pts, cfg)
    }

    #[test]
    fn programs_compile_once() {
        let cfg = EngineConfig::default();
        let mut rp = RenderPipeline::new(HeadlessSurface::new(100.0, 100.0), &cfg.render).unwrap();
        let st = state(&cfg);
        rp.redraw(&st).unwrap();
        rp.redraw(&st).unwrap();
        let compiles = rp
            .surface()
            .calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Compile { .. }))
            .count();
        assert_eq!(compiles, 4);
    }

    #[test]
    fn empty_passes_are_skipped() {
        let cfg = EngineConfig::default();
        let mut rp = RenderPipeline::new(HeadlessSurface::new(100.0, 100.0), &cfg.render).unwrap();
        let stats = rp.redraw(&state(&cfg)).unwrap();
        assert_eq!(stats.passes, vec![(Pass::Point, 3)]);
    }

    #[test]
    fn passes_draw_in_fixed_order() {
        let cfg = EngineConfig::default();
        let mut st = state(&cfg);
        st.set_focus(Vec2::new(0.0, 0.0));
        st.set_lasso(vec![0.0, 0.0, 1.0, 0.0]);
        st.set_lines(crate::points::LineSet {
            vertices: vec![0.0, 0.0, 0.5, 0.5],
            colors: vec![0.5; 6],
            opacities: vec![0.5; 2],
        })
        .unwrap();
        let mut rp = RenderPipeline::new(HeadlessSurface::new(100.0, 100.0), &cfg.render).unwrap();
        let stats = rp.redraw(&st).unwrap();
        let order: Vec<Pass> = stats.passes.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, Pass::ORDER.to_vec());
        assert_eq!(stats.vertices(Pass::Lasso), 2);
        assert_eq!(rp.surface().draws(), vec![
            (Primitive::Lines, 2),
            (Primitive::Points, 3),
            (Primitive::Lines, 2),
            (Primitive::Lines, cfg.render.focus_segments * 2),
        ]);
    }

    #[test]
    fn point_pass_sets_size_uniforms() {
        let cfg = EngineConfig::default();
        let mut rp = RenderPipeline::new(HeadlessSurface::new(100.0, 100.0), &cfg.render).unwrap();
        rp.redraw(&state(&cfg)).unwrap();
        assert_eq!(rp.surface().uniform_f32("uPointSizeMin"), Some(2.0));
        assert_eq!(rp.surface().uniform_f32("uPointSizeMax"), Some(4.0));
        assert_eq!(rp.surface().uniform_f32("uPointSizePow"), Some(1.0));
    }

    #[test]
    fn compile_failure_surfaces_as_error() {
        let cfg = EngineConfig::default();
        let surface = HeadlessSurface::new(100.0, 100.0).with_failing_pass(Pass::Lasso);
        match RenderPipeline::new(surface, &cfg.render) {
            Err(SurfaceError::Compile { pass, .. }) => assert_eq!(pass, "lasso"),
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("expected compile failure"),
        }
    }
}
