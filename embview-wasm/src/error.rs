use crate::interop::{new_obj, set_kv};
use embview::{EngineError, LinkError};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_role(got: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "got", &JsValue::from_str(got));
    err("invalid_role", "role must be one of Z_n_dt, Z_n_td, Z_d_nt, Z_d_tn, Z_t_dn, Z_t_nd", Some(d.into()))
}

#[inline]
pub fn invalid_points(reason: &str) -> JsValue {
    err("invalid_points", reason.to_string(), None)
}

#[inline]
pub fn invalid_attribute(got: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "got", &JsValue::from_str(got));
    err("invalid_attribute", "attribute must be colors, opacities, outerRingColors, outerRingOpacities, sizes or shapes", Some(d.into()))
}

#[inline]
pub fn builder_consumed() -> JsValue {
    err("builder_consumed", "build() was already called on this builder", None)
}

/// Map an engine error to the result-object convention, attaching details.
pub fn from_engine(e: &EngineError) -> JsValue {
    let d = new_obj();
    match e {
        EngineError::UnknownView(id) => set_kv(&d, "view", &JsValue::from_f64(*id as f64)),
        EngineError::Link(LinkError::CardinalityMismatch { source_count, target_count }) => {
            set_kv(&d, "source", &JsValue::from_f64(*source_count as f64));
            set_kv(&d, "target", &JsValue::from_f64(*target_count as f64));
        }
        EngineError::Dataset { index, .. } => set_kv(&d, "index", &JsValue::from_f64(*index as f64)),
        EngineError::Limit { max, .. } => set_kv(&d, "max", &JsValue::from_f64(*max as f64)),
        _ => {}
    }
    let code = match e {
        // Dataset and limit failures both surface as bad point input to the host.
        EngineError::Limit { .. } => "invalid_points",
        other => other.code(),
    };
    err(code, e.to_string(), Some(d.into()))
}
