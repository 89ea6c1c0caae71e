use super::{Pass, Primitive, ProgramId, Surface};
use crate::error::SurfaceError;
use crate::geometry::transform::Mat4;

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Compile { pass: Pass },
    Use { program: ProgramId },
    Upload { name: String, len: usize, components: usize },
    UniformMat4 { name: String, value: Mat4 },
    UniformF32 { name: String, value: f32 },
    Clear { rgba: [f32; 4] },
    Draw { primitive: Primitive, count: usize },
}

/// In-memory surface that records every call instead of touching a GPU.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    width: f32,
    height: f32,
    programs: Vec<Pass>,
    calls: Vec<SurfaceCall>,
    failing: Option<Pass>,
    failing_draw: Option<Pass>,
    current: Option<Pass>,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Self {
        HeadlessSurface {
            width,
            height,
            programs: Vec::new(),
            calls: Vec::new(),
            failing: None,
            failing_draw: None,
            current: None,
        }
    }

    /// Make compilation of `pass` fail.
    pub fn with_failing_pass(mut self, pass: Pass) -> Self {
        self.failing = Some(pass);
        self
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Make every buffer upload of `pass` fail, so its frames never complete.
    pub fn with_failing_draw(mut self, pass: Pass) -> Self {
        self.failing_draw = Some(pass);
        self
    }

    pub fn draws(&self) -> Vec<(Primitive, usize)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Draw { primitive, count } => Some((*primitive, *count)),
                _ => None,
            })
            .collect()
    }

    /// Passes drawn, in order, resolved through the program in use at each draw.
    pub fn drawn_passes(&self) -> Vec<Pass> {
        let mut current = None;
        let mut out = Vec::new();
        for c in &self.calls {
            match c {
                SurfaceCall::Use { program } => current = self.programs.get(program.0).copied(),
                SurfaceCall::Draw { .. } => out.extend(current),
                _ => {}
            }
        }
        out
    }

    /// Last value set for a float uniform.
    pub fn uniform_f32(&self, name: &str) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            SurfaceCall::UniformF32 { name: n, value } if n == name => Some(*value),
            _ => None,
        })
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn compile_program(
        &mut self,
        pass: Pass,
        vertex: &str,
        fragment: &str,
    ) -> Result<ProgramId, SurfaceError> {
        if self.failing == Some(pass) || vertex.trim().is_empty() || fragment.trim().is_empty() {
            return Err(SurfaceError::Compile {
                pass: pass.name(),
                log: "rejected by headless surface".to_string(),
            });
        }
        self.calls.push(SurfaceCall::Compile { pass });
        self.programs.push(pass);
        Ok(ProgramId(self.programs.len() - 1))
    }

    fn use_program(&mut self, program: ProgramId) {
        self.current = self.programs.get(program.0).copied();
        self.calls.push(SurfaceCall::Use { program });
    }

    fn upload_attribute(
        &mut self,
        name: &str,
        data: &[f32],
        components: usize,
    ) -> Result<(), SurfaceError> {
        if components == 0
            || data.len() % components != 0
            || (self.failing_draw.is_some() && self.current == self.failing_draw)
        {
            return Err(SurfaceError::Buffer);
        }
        self.calls.push(SurfaceCall::Upload {
            name: name.to_string(),
            len: data.len(),
            components,
        });
        Ok(())
    }

    fn set_uniform_mat4(&mut self, name: &str, m: &Mat4) {
        self.calls.push(SurfaceCall::UniformMat4 {
            name: name.to_string(),
            value: *m,
        });
    }

    fn set_uniform_f32(&mut self, name: &str, v: f32) {
        self.calls.push(SurfaceCall::UniformF32 {
            name: name.to_string(),
            value: v,
        });
    }

    fn clear(&mut self, rgba: [f32; 4]) {
        self.calls.push(SurfaceCall::Clear { rgba });
    }

    fn draw(&mut self, primitive: Primitive, count: usize) {
        self.calls.push(SurfaceCall::Draw { primitive, count });
    }
}
