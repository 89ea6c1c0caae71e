use wasm_bindgen::prelude::*;
mod api;
mod collab;
mod error;
mod interop;
pub mod surface;

pub use surface::{AnySurface, WebGlSurface};

#[wasm_bindgen]
pub struct ExplorerBuilder { pub(crate) inner: Option<embview::SessionBuilder<AnySurface>> }

#[wasm_bindgen]
pub struct Explorer { pub(crate) inner: embview::Session<AnySurface> }

impl ExplorerBuilder {
    pub fn rs_new(config: embview::EngineConfig) -> ExplorerBuilder {
        ExplorerBuilder { inner: Some(embview::SessionBuilder::new(config)) }
    }
}

impl Explorer {
    pub fn session(&self) -> &embview::Session<AnySurface> { &self.inner }
}
