use crate::collab::{JsChart, JsTransport};
use crate::surface::{AnySurface, WebGlSurface};
use crate::{error, interop, Explorer, ExplorerBuilder};
use embview::geometry::transform::screen_to_world;
use embview::{
    Attribute, EngineConfig, EngineError, HeadlessSurface, LinkBinding, PointRecord, PointSet,
    PointerButton, Reaction, ScreenPos, Vec2, ViewId, ViewRole,
};
use js_sys::{Float32Array, Function, Uint32Array};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Route `log` records to the browser console. `level` is e.g. "info" or "debug".
#[wasm_bindgen]
pub fn init_logging(level: &str) -> JsValue {
    let lvl = match level.parse::<log::Level>() {
        Ok(l) => l,
        Err(_) => return error::err("config", format!("unknown log level '{}'", level), None),
    };
    match console_log::init_with_level(lvl) {
        Ok(()) => error::ok(JsValue::TRUE),
        // already initialized; keep the first logger
        Err(_) => error::ok(JsValue::FALSE),
    }
}

fn parse_attribute(s: &str) -> Option<Attribute> {
    match s {
        "colors" => Some(Attribute::Colors),
        "opacities" => Some(Attribute::Opacities),
        "outerRingColors" => Some(Attribute::OuterRingColors),
        "outerRingOpacities" => Some(Attribute::OuterRingOpacities),
        "sizes" => Some(Attribute::Sizes),
        "shapes" => Some(Attribute::Shapes),
        _ => None,
    }
}

fn finite(pairs: &[(&str, f32)]) -> Result<(), JsValue> {
    match pairs.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, _)) => Err(error::non_finite(name)),
        None => Ok(()),
    }
}

fn reaction_value(r: &Reaction) -> JsValue {
    let obj = interop::new_obj();
    interop::set_kv(&obj, "redraw", &JsValue::from_bool(r.redraw));
    let commit = match &r.commit {
        Some(c) => {
            let o = interop::new_obj();
            interop::set_kv(&o, "groupCount", &JsValue::from_f64(c.outcome.group_count() as f64));
            interop::set_kv(
                &o,
                "cleared",
                &JsValue::from_bool(matches!(c.outcome, embview::CommitOutcome::Cleared)),
            );
            interop::set_kv(&o, "x", &JsValue::from_f64(c.at.x as f64));
            interop::set_kv(&o, "y", &JsValue::from_f64(c.at.y as f64));
            o.into()
        }
        None => JsValue::NULL,
    };
    interop::set_kv(&obj, "commit", &commit);
    obj.into()
}

fn unit(r: Result<(), EngineError>) -> JsValue {
    match r {
        Ok(()) => error::ok(JsValue::UNDEFINED),
        Err(e) => error::from_engine(&e),
    }
}

fn reacted(r: Result<Reaction, EngineError>) -> JsValue {
    match r {
        Ok(r) => error::ok(reaction_value(&r)),
        Err(e) => error::from_engine(&e),
    }
}

impl ExplorerBuilder {
    fn add_view(
        &mut self,
        role: &str,
        surface: impl FnOnce() -> Result<AnySurface, embview::SurfaceError>,
        points: impl FnOnce(&EngineConfig) -> Result<PointSet, EngineError>,
    ) -> JsValue {
        let Some(b) = self.inner.as_mut() else { return error::builder_consumed() };
        let Some(role) = ViewRole::from_code(role) else { return error::invalid_role(role) };
        let points = match points(b.config()) {
            Ok(p) => p,
            Err(e) => return error::from_engine(&e),
        };
        let surface = match surface() {
            Ok(s) => s,
            Err(e) => return error::from_engine(&e.into()),
        };
        let id = b.add_view(role, points, surface);
        error::ok(JsValue::from_f64(id.0 as f64))
    }
}

#[wasm_bindgen]
impl ExplorerBuilder {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ExplorerBuilder {
        ExplorerBuilder::rs_new(EngineConfig::default())
    }

    /// Builder with a (partial) JSON configuration; throws a result object on bad JSON.
    pub fn from_config_json(json: &str) -> Result<ExplorerBuilder, JsValue> {
        EngineConfig::from_json_str(json)
            .map(ExplorerBuilder::rs_new)
            .map_err(|e| error::from_engine(&e))
    }

    pub fn set_data_key(&mut self, key: &str) {
        self.inner = self.inner.take().map(|b| b.data_key(key));
    }

    /// `chart(data, groupCount)` and optional `summary(kind, content)` callbacks.
    pub fn set_chart(&mut self, chart: Function, summary: Option<Function>) {
        let c = JsChart { chart, summary };
        self.inner = self.inner.take().map(|b| b.chart(Box::new(c)));
    }

    pub fn set_transport(&mut self, send: Function) {
        let t = JsTransport { send };
        self.inner = self.inner.take().map(|b| b.aggregation(Box::new(t)));
    }

    /// Add a view drawn on `<canvas id=canvas_id>`; `points` is an array of point records.
    pub fn add_canvas_view_res(&mut self, role: &str, canvas_id: &str, points: JsValue) -> JsValue {
        let records: Vec<PointRecord> = match serde_wasm_bindgen::from_value(points) {
            Ok(r) => r,
            Err(e) => return error::invalid_points(&e.to_string()),
        };
        self.add_view(
            role,
            || WebGlSurface::from_canvas_id(canvas_id).map(AnySurface::WebGl),
            |cfg| PointSet::from_records(&records, &cfg.point),
        )
    }

    pub fn add_canvas_view_positions_res(
        &mut self,
        role: &str,
        canvas_id: &str,
        positions: &Float32Array,
    ) -> JsValue {
        let Some(flat) = interop::flat_pairs(positions) else {
            return error::invalid_points("positions must hold x, y pairs");
        };
        self.add_view(
            role,
            || WebGlSurface::from_canvas_id(canvas_id).map(AnySurface::WebGl),
            |cfg| PointSet::from_positions(&flat, &cfg.point),
        )
    }

    /// Add a view without a canvas; draws are recorded in memory only.
    pub fn add_headless_view_res(
        &mut self,
        role: &str,
        width: f32,
        height: f32,
        positions: &Float32Array,
    ) -> JsValue {
        if let Err(e) = finite(&[("width", width), ("height", height)]) {
            return e;
        }
        let Some(flat) = interop::flat_pairs(positions) else {
            return error::invalid_points("positions must hold x, y pairs");
        };
        self.add_view(
            role,
            || Ok(AnySurface::Headless(HeadlessSurface::new(width, height))),
            |cfg| PointSet::from_positions(&flat, &cfg.point),
        )
    }

    /// Link an attribute from `source` to `target`, optionally in both directions.
    pub fn link_res(&mut self, source: u32, target: u32, attribute: &str, both: bool) -> JsValue {
        let Some(b) = self.inner.as_mut() else { return error::builder_consumed() };
        let Some(attr) = parse_attribute(attribute) else {
            return error::invalid_attribute(attribute);
        };
        let (s, t) = (ViewId(source as usize), ViewId(target as usize));
        if both {
            b.link_both(s, t, attr);
        } else {
            b.link(LinkBinding::same(s, t, attr));
        }
        error::ok(JsValue::UNDEFINED)
    }

    /// Validate links and compile every view. Throws a result object on failure.
    pub fn build(&mut self) -> Result<Explorer, JsValue> {
        let b = self.inner.take().ok_or_else(error::builder_consumed)?;
        b.build()
            .map(|inner| Explorer { inner })
            .map_err(|e| error::from_engine(&e))
    }
}

#[wasm_bindgen]
impl Explorer {
    pub fn view_count(&self) -> u32 {
        self.inner.views().count() as u32
    }

    pub fn view_role(&self, view: u32) -> Option<String> {
        self.inner.view(ViewId(view as usize)).ok().map(|v| v.role().code().to_string())
    }

    pub fn find_view_res(&self, role: &str) -> JsValue {
        let Some(r) = ViewRole::from_code(role) else { return error::invalid_role(role) };
        match self.inner.find_role(r) {
            Some(id) => error::ok(JsValue::from_f64(id.0 as f64)),
            None => error::err("unknown_view", format!("no view has role {}", role), None),
        }
    }

    // Pointer input, positions in CSS pixels relative to the canvas

    pub fn pointer_down_res(&mut self, view: u32, button: i16, x: f32, y: f32) -> JsValue {
        if let Err(e) = finite(&[("x", x), ("y", y)]) {
            return e;
        }
        let Some(btn) = PointerButton::from_dom(button) else {
            return error::ok(reaction_value(&Reaction::default()));
        };
        reacted(self.inner.pointer_down(ViewId(view as usize), btn, ScreenPos::new(x, y)))
    }

    pub fn pointer_move_res(&mut self, view: u32, x: f32, y: f32) -> JsValue {
        if let Err(e) = finite(&[("x", x), ("y", y)]) {
            return e;
        }
        reacted(self.inner.pointer_move(ViewId(view as usize), ScreenPos::new(x, y)))
    }

    pub fn pointer_up_res(&mut self, view: u32, x: f32, y: f32) -> JsValue {
        if let Err(e) = finite(&[("x", x), ("y", y)]) {
            return e;
        }
        reacted(self.inner.pointer_up(ViewId(view as usize), ScreenPos::new(x, y)))
    }

    pub fn wheel_res(&mut self, view: u32, delta_y: f32) -> JsValue {
        if let Err(e) = finite(&[("delta_y", delta_y)]) {
            return e;
        }
        reacted(self.inner.wheel(ViewId(view as usize), delta_y))
    }

    // View state

    pub fn reset_transform_res(&mut self, view: u32) -> JsValue {
        unit(self.inner.reset_transform(ViewId(view as usize)))
    }

    pub fn reset_selection_res(&mut self, view: u32) -> JsValue {
        unit(self.inner.reset_selection(ViewId(view as usize)))
    }

    pub fn rotate_by_res(&mut self, view: u32, radians: f32) -> JsValue {
        if let Err(e) = finite(&[("radians", radians)]) {
            return e;
        }
        unit(self.inner.rotate_by(ViewId(view as usize), radians))
    }

    pub fn set_rotation_res(&mut self, view: u32, radians: f32) -> JsValue {
        if let Err(e) = finite(&[("radians", radians)]) {
            return e;
        }
        unit(self.inner.set_rotation(ViewId(view as usize), radians))
    }

    pub fn set_focus_res(&mut self, view: u32, x: f32, y: f32) -> JsValue {
        if let Err(e) = finite(&[("x", x), ("y", y)]) {
            return e;
        }
        unit(self.inner.set_focus(ViewId(view as usize), Some(Vec2::new(x, y))))
    }

    pub fn clear_focus_res(&mut self, view: u32) -> JsValue {
        unit(self.inner.set_focus(ViewId(view as usize), None))
    }

    /// `pairs` holds `[a0, b0, a1, b1, ..]` point indices.
    pub fn set_edges_res(&mut self, view: u32, pairs: &Uint32Array) -> JsValue {
        let Some(edges) = interop::index_pairs(pairs) else {
            return error::invalid_points("edge list must hold index pairs");
        };
        unit(self.inner.set_edges(ViewId(view as usize), &edges))
    }

    pub fn clear_lines_res(&mut self, view: u32) -> JsValue {
        unit(self.inner.clear_lines(ViewId(view as usize)))
    }

    pub fn request_histogram_res(&mut self, view: u32, column: u32, x: f32, y: f32) -> JsValue {
        if let Err(e) = finite(&[("x", x), ("y", y)]) {
            return e;
        }
        unit(self.inner.request_histogram(ViewId(view as usize), column, ScreenPos::new(x, y)))
    }

    // Aggregation replies

    pub fn enqueue_message(&mut self, raw: String) {
        self.inner.enqueue_message(raw);
    }

    pub fn pending_messages(&self) -> u32 {
        self.inner.pending_messages() as u32
    }

    pub fn pump_messages(&mut self) -> u32 {
        self.inner.pump_messages() as u32
    }

    // Typed-array getters

    pub fn get_groups_res(&self, view: u32) -> JsValue {
        match self.inner.state(ViewId(view as usize)) {
            Ok(st) => error::ok(interop::arr_u32(st.groups()).into()),
            Err(e) => error::from_engine(&e),
        }
    }

    pub fn group_count_res(&self, view: u32) -> JsValue {
        match self.inner.state(ViewId(view as usize)) {
            Ok(st) => error::ok(JsValue::from_f64(st.group_count() as f64)),
            Err(e) => error::from_engine(&e),
        }
    }

    pub fn get_colors_res(&self, view: u32) -> JsValue {
        match self.inner.state(ViewId(view as usize)) {
            Ok(st) => error::ok(interop::arr_f32(st.points().colors()).into()),
            Err(e) => error::from_engine(&e),
        }
    }

    pub fn get_transform_res(&self, view: u32) -> JsValue {
        match self.inner.state(ViewId(view as usize)) {
            Ok(st) => error::ok(interop::arr_f32(st.transform().matrix()).into()),
            Err(e) => error::from_engine(&e),
        }
    }

    /// World position under a pixel, or `null` when the view transform is singular.
    pub fn screen_to_world_res(&self, view: u32, x: f32, y: f32) -> JsValue {
        if let Err(e) = finite(&[("x", x), ("y", y)]) {
            return e;
        }
        let v = match self.inner.view(ViewId(view as usize)) {
            Ok(v) => v,
            Err(e) => return error::from_engine(&e),
        };
        let (w, h) = embview::Surface::size(v.surface());
        let p = screen_to_world(ScreenPos::new(x, y), w, h, v.state().transform().matrix());
        if !p.is_valid() {
            return error::ok(JsValue::NULL);
        }
        error::ok(interop::arr_f32(&[p.x, p.y]).into())
    }
}
