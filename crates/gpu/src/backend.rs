use foundation::TextureHandle;
use overlays::{CircleUniform, ShapeUniform, UniformBlock};
use shapes::{PolygonMesh, StrokeGeometry};

use crate::renderer::{Camera3D, RenderFrame};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// Offscreen target plus the texture its contents can be sampled through.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    pub id: RenderTargetId,
    pub texture: TextureHandle,
}

/// Frame-space triangle mesh ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
    /// Stroke side factors; empty for filled meshes.
    pub side: Vec<f32>,
}

impl From<StrokeGeometry> for MeshData {
    fn from(g: StrokeGeometry) -> Self {
        Self {
            vertices: g.vertices,
            indices: g.indices,
            side: g.side,
        }
    }
}

impl From<PolygonMesh> for MeshData {
    fn from(m: PolygonMesh) -> Self {
        Self {
            vertices: m.vertices,
            indices: m.indices,
            side: Vec::new(),
        }
    }
}

/// Minimal drawing surface the map view needs from a graphics API.
pub trait RenderBackend {
    fn create_render_target(&mut self, label: &str) -> RenderTarget;

    fn release_render_target(&mut self, target: RenderTargetId);

    /// `None` selects the default (screen) target.
    fn set_render_target(&mut self, target: Option<RenderTargetId>);

    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshId;

    fn release_mesh(&mut self, mesh: MeshId);

    fn render(&mut self, frame: &RenderFrame, camera: &Camera3D);
}

/// Receiver of the overlay uniform blocks shared by every tile material.
///
/// Blocks borrow the pools' arrays; an implementation uploads
/// `block.as_bytes()` and must not hold on to the slice.
pub trait ShaderBinding {
    fn bind_circles(&mut self, block: UniformBlock<'_, CircleUniform>);

    /// `samplers[i]` is the shape buffer of `block.records[i]` for `i < block.count`.
    fn bind_shapes(&mut self, block: UniformBlock<'_, ShapeUniform>, samplers: &[Option<TextureHandle>]);
}
