//! Render-side orchestration of the map surface.
//!
//! Nothing here talks to a graphics API. Backends implement
//! [`RenderBackend`], [`ShaderBinding`] and [`lod::TileUploader`]; the
//! [`MapView`] drives them once per frame.

pub mod backend;
pub mod config;
pub mod error;
pub mod map_view;
pub mod renderer;
pub mod shape_layers;

pub use backend::*;
pub use config::*;
pub use error::*;
pub use map_view::*;
pub use renderer::*;
pub use shape_layers::*;

#[cfg(test)]
pub(crate) mod testing;
