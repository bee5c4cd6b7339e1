use std::sync::Arc;

use foundation::{GeometryHandle, TextureHandle};
use futures_util::future::BoxFuture;

use crate::kind::NodeKind;
use crate::layer::TileLayer;
use crate::tile::TileCoord;

/// Decoded RGBA8 tile image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl TileImage {
    pub fn new(width: u32, height: u32, rgba: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            rgba: rgba.into(),
        }
    }

    /// Single-colour image, mostly for tests and placeholder providers.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels: Vec<u8> = (0..width as usize * height as usize)
            .flat_map(|_| rgba)
            .collect();
        Self::new(width, height, pixels)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileFetchError {
    #[error("tile not available")]
    NotFound,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("fetch cancelled by provider")]
    Cancelled,
}

/// Source of tile images (color imagery or encoded terrain heights).
///
/// The returned future must not borrow the provider; the tree keeps it alive
/// across frames and polls it from the frame loop.
pub trait TileProvider {
    fn fetch_tile(&self, coord: TileCoord) -> BoxFuture<'static, Result<TileImage, TileFetchError>>;

    /// Deepest level this provider serves.
    fn max_level(&self) -> u32 {
        crate::tile::MAX_TILE_LEVEL
    }
}

/// GPU resources held by one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeResources {
    pub texture: Option<TextureHandle>,
    pub geometry: Option<GeometryHandle>,
}

impl NodeResources {
    pub fn is_empty(&self) -> bool {
        self.texture.is_none() && self.geometry.is_none()
    }
}

/// Rendering-side sink for decoded tile data.
pub trait TileUploader {
    fn upload_texture(&mut self, coord: TileCoord, layer: TileLayer, image: &TileImage) -> TextureHandle;

    /// Build the node mesh from a height tile with `segments` quads per side.
    fn build_geometry(
        &mut self,
        coord: TileCoord,
        kind: NodeKind,
        height: &TileImage,
        segments: u32,
    ) -> GeometryHandle;

    fn release(&mut self, coord: TileCoord, resources: NodeResources);
}
