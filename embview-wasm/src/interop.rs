use js_sys::{Float32Array, Object, Reflect, Uint32Array};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_f32(slice: &[f32]) -> Float32Array {
    let arr = Float32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
/// `[x0, y0, x1, y1, ..]` from a typed array, rejecting odd lengths.
pub fn flat_pairs(arr: &Float32Array) -> Option<Vec<f32>> {
    let v = arr.to_vec();
    if v.len() % 2 == 0 { Some(v) } else { None }
}
/// `(a, b)` index pairs from a flat `Uint32Array`.
pub fn index_pairs(arr: &Uint32Array) -> Option<Vec<(u32, u32)>> {
    let v = arr.to_vec();
    if v.len() % 2 != 0 { return None; }
    Some(v.chunks_exact(2).map(|c| (c[0], c[1])).collect())
}
