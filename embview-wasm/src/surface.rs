use embview::geometry::transform::Mat4;
use embview::render::{Pass, Primitive, ProgramId, Surface};
use embview::{HeadlessSurface, SurfaceError};
use js_sys::Float32Array;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext as Gl, WebGlShader,
};

/// [`Surface`] over a WebGL 1 context.
pub struct WebGlSurface {
    gl: Gl,
    width: f32,
    height: f32,
    programs: Vec<WebGlProgram>,
    current: Option<usize>,
    // rebuilt every frame, released on clear
    buffers: Vec<WebGlBuffer>,
}

impl WebGlSurface {
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let gl = canvas
            .get_context("webgl")
            .map_err(|_| SurfaceError::Unavailable("getContext threw".into()))?
            .ok_or_else(|| SurfaceError::Unavailable("webgl not supported".into()))?
            .dyn_into::<Gl>()
            .map_err(|_| SurfaceError::Unavailable("not a WebGL context".into()))?;
        // fwidth() in the point shader
        let _ = gl.get_extension("OES_standard_derivatives");
        gl.enable(Gl::BLEND);
        gl.viewport(0, 0, canvas.width() as i32, canvas.height() as i32);
        Ok(WebGlSurface {
            gl,
            width: canvas.client_width() as f32,
            height: canvas.client_height() as f32,
            programs: Vec::new(),
            current: None,
            buffers: Vec::new(),
        })
    }

    pub fn from_canvas_id(id: &str) -> Result<Self, SurfaceError> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .ok_or_else(|| SurfaceError::Unavailable(format!("no element '{}'", id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SurfaceError::Unavailable(format!("'{}' is not a canvas", id)))?;
        WebGlSurface::from_canvas(&canvas)
    }

    fn shader(&self, pass: Pass, kind: u32, src: &str) -> Result<WebGlShader, SurfaceError> {
        let shader = self.gl.create_shader(kind).ok_or(SurfaceError::Compile {
            pass: pass.name(),
            log: "createShader failed".into(),
        })?;
        self.gl.shader_source(&shader, src);
        self.gl.compile_shader(&shader);
        let ok = self
            .gl
            .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if ok {
            Ok(shader)
        } else {
            let log = self.gl.get_shader_info_log(&shader).unwrap_or_default();
            self.gl.delete_shader(Some(&shader));
            Err(SurfaceError::Compile { pass: pass.name(), log })
        }
    }

    fn program(&self) -> Option<&WebGlProgram> {
        self.current.and_then(|i| self.programs.get(i))
    }
}

impl Surface for WebGlSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn compile_program(
        &mut self,
        pass: Pass,
        vertex: &str,
        fragment: &str,
    ) -> Result<ProgramId, SurfaceError> {
        let vs = self.shader(pass, Gl::VERTEX_SHADER, vertex)?;
        let fs = self.shader(pass, Gl::FRAGMENT_SHADER, fragment)?;
        let program = self.gl.create_program().ok_or(SurfaceError::Link {
            pass: pass.name(),
            log: "createProgram failed".into(),
        })?;
        self.gl.attach_shader(&program, &vs);
        self.gl.attach_shader(&program, &fs);
        self.gl.link_program(&program);
        let ok = self
            .gl
            .get_program_parameter(&program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !ok {
            let log = self.gl.get_program_info_log(&program).unwrap_or_default();
            return Err(SurfaceError::Link { pass: pass.name(), log });
        }
        self.programs.push(program);
        Ok(ProgramId(self.programs.len() - 1))
    }

    fn use_program(&mut self, program: ProgramId) {
        self.current = Some(program.0);
        self.gl.use_program(self.programs.get(program.0));
    }

    fn upload_attribute(
        &mut self,
        name: &str,
        data: &[f32],
        components: usize,
    ) -> Result<(), SurfaceError> {
        let Some(program) = self.program() else {
            return Err(SurfaceError::Unavailable("no program in use".into()));
        };
        let loc = self.gl.get_attrib_location(program, name);
        if loc < 0 {
            // attribute unused by the compiled shader
            return Ok(());
        }
        let buffer = self.gl.create_buffer().ok_or(SurfaceError::Buffer)?;
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        let arr = Float32Array::from(data);
        self.gl
            .buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &arr, Gl::STATIC_DRAW);
        self.gl.enable_vertex_attrib_array(loc as u32);
        self.gl
            .vertex_attrib_pointer_with_i32(loc as u32, components as i32, Gl::FLOAT, false, 0, 0);
        self.buffers.push(buffer);
        Ok(())
    }

    fn set_uniform_mat4(&mut self, name: &str, m: &Mat4) {
        if let Some(program) = self.program() {
            let loc = self.gl.get_uniform_location(program, name);
            self.gl.uniform_matrix4fv_with_f32_array(loc.as_ref(), false, m);
        }
    }

    fn set_uniform_f32(&mut self, name: &str, v: f32) {
        if let Some(program) = self.program() {
            let loc = self.gl.get_uniform_location(program, name);
            self.gl.uniform1f(loc.as_ref(), v);
        }
    }

    fn clear(&mut self, rgba: [f32; 4]) {
        for b in self.buffers.drain(..) {
            self.gl.delete_buffer(Some(&b));
        }
        self.gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        self.gl.blend_func(Gl::ONE, Gl::ONE_MINUS_SRC_ALPHA);
    }

    fn draw(&mut self, primitive: Primitive, count: usize) {
        let mode = match primitive {
            Primitive::Points => Gl::POINTS,
            Primitive::Lines => Gl::LINES,
            Primitive::Triangles => Gl::TRIANGLES,
        };
        self.gl.draw_arrays(mode, 0, count as i32);
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, None);
    }
}

/// Either a real canvas or an in-memory stand-in, so one session type covers both.
pub enum AnySurface {
    WebGl(WebGlSurface),
    Headless(HeadlessSurface),
}

macro_rules! delegate {
    ($self:ident, $s:ident => $e:expr) => {
        match $self {
            AnySurface::WebGl($s) => $e,
            AnySurface::Headless($s) => $e,
        }
    };
}

impl Surface for AnySurface {
    fn size(&self) -> (f32, f32) {
        delegate!(self, s => s.size())
    }
    fn compile_program(
        &mut self,
        pass: Pass,
        vertex: &str,
        fragment: &str,
    ) -> Result<ProgramId, SurfaceError> {
        delegate!(self, s => s.compile_program(pass, vertex, fragment))
    }
    fn use_program(&mut self, program: ProgramId) {
        delegate!(self, s => s.use_program(program))
    }
    fn upload_attribute(
        &mut self,
        name: &str,
        data: &[f32],
        components: usize,
    ) -> Result<(), SurfaceError> {
        delegate!(self, s => s.upload_attribute(name, data, components))
    }
    fn set_uniform_mat4(&mut self, name: &str, m: &Mat4) {
        delegate!(self, s => s.set_uniform_mat4(name, m))
    }
    fn set_uniform_f32(&mut self, name: &str, v: f32) {
        delegate!(self, s => s.set_uniform_f32(name, v))
    }
    fn clear(&mut self, rgba: [f32; 4]) {
        delegate!(self, s => s.clear(rgba))
    }
    fn draw(&mut self, primitive: Primitive, count: usize) {
        delegate!(self, s => s.draw(primitive, count))
    }
}
