//! In-memory backend and providers for unit tests.

use foundation::{GeometryHandle, TextureHandle};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use lod::{NodeKind, NodeResources, TileCoord, TileFetchError, TileImage, TileLayer, TileProvider, TileUploader};
use overlays::{CircleUniform, ShapeUniform, UniformBlock};

use crate::backend::{MeshData, MeshId, RenderBackend, RenderTarget, RenderTargetId, ShaderBinding};
use crate::renderer::{Camera3D, RenderFrame};

/// Serves a small image for every tile, immediately.
pub struct ImmediateProvider;

impl TileProvider for ImmediateProvider {
    fn fetch_tile(&self, coord: TileCoord) -> BoxFuture<'static, Result<TileImage, TileFetchError>> {
        futures_util::future::ready(Ok(TileImage::solid(1, 1, [coord.level as u8, 0, 0, 255]))).boxed()
    }
}

/// Fails every fetch.
pub struct FailingProvider;

impl TileProvider for FailingProvider {
    fn fetch_tile(&self, _coord: TileCoord) -> BoxFuture<'static, Result<TileImage, TileFetchError>> {
        futures_util::future::ready(Err(TileFetchError::Transport("offline".to_string()))).boxed()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateTarget(String),
    ReleaseTarget(RenderTargetId),
    SetTarget(Option<RenderTargetId>),
    UploadMesh(MeshId),
    ReleaseMesh(MeshId),
    Render {
        target: Option<RenderTargetId>,
        commands: usize,
    },
    BindCircles(u32),
    BindShapes(u32),
    UploadTexture(TileCoord),
    BuildGeometry(TileCoord),
    ReleaseTile(TileCoord),
}

/// Owned copy of a block seen by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<U> {
    pub records: Vec<U>,
    pub count: u32,
    pub samplers: Vec<Option<TextureHandle>>,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    next: u64,
    target: Option<RenderTargetId>,
    pub calls: Vec<Call>,
    pub meshes: Vec<(MeshId, MeshData)>,
    pub released_meshes: Vec<MeshId>,
    pub released_tiles: Vec<(TileCoord, NodeResources)>,
    pub frames: Vec<(Option<RenderTargetId>, RenderFrame)>,
    pub released_targets: Vec<RenderTargetId>,
    pub circles: Option<Bound<CircleUniform>>,
    pub shapes: Option<Bound<ShapeUniform>>,
}

impl RecordingBackend {
    fn next_id(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    /// Frames rendered to the screen target, oldest first.
    pub fn screen_frames(&self) -> impl Iterator<Item = &RenderFrame> {
        self.frames
            .iter()
            .filter(|(t, _)| t.is_none())
            .map(|(_, f)| f)
    }
}

impl RenderBackend for RecordingBackend {
    fn create_render_target(&mut self, label: &str) -> RenderTarget {
        self.calls.push(Call::CreateTarget(label.to_string()));
        RenderTarget {
            id: RenderTargetId(self.next_id()),
            texture: TextureHandle(self.next_id()),
        }
    }

    fn release_render_target(&mut self, target: RenderTargetId) {
        self.released_targets.push(target);
        self.calls.push(Call::ReleaseTarget(target));
    }

    fn set_render_target(&mut self, target: Option<RenderTargetId>) {
        self.target = target;
        self.calls.push(Call::SetTarget(target));
    }

    fn upload_mesh(&mut self, mesh: &MeshData) -> MeshId {
        let id = MeshId(self.next_id());
        self.meshes.push((id, mesh.clone()));
        self.calls.push(Call::UploadMesh(id));
        id
    }

    fn release_mesh(&mut self, mesh: MeshId) {
        self.released_meshes.push(mesh);
        self.calls.push(Call::ReleaseMesh(mesh));
    }

    fn render(&mut self, frame: &RenderFrame, _camera: &Camera3D) {
        self.calls.push(Call::Render {
            target: self.target,
            commands: frame.len(),
        });
        self.frames.push((self.target, frame.clone()));
    }
}

impl ShaderBinding for RecordingBackend {
    fn bind_circles(&mut self, block: UniformBlock<'_, CircleUniform>) {
        self.calls.push(Call::BindCircles(block.count));
        self.circles = Some(Bound {
            records: block.records.to_vec(),
            count: block.count,
            samplers: Vec::new(),
        });
    }

    fn bind_shapes(&mut self, block: UniformBlock<'_, ShapeUniform>, samplers: &[Option<TextureHandle>]) {
        self.calls.push(Call::BindShapes(block.count));
        self.shapes = Some(Bound {
            records: block.records.to_vec(),
            count: block.count,
            samplers: samplers.to_vec(),
        });
    }
}

impl TileUploader for RecordingBackend {
    fn upload_texture(&mut self, coord: TileCoord, _layer: TileLayer, _image: &TileImage) -> TextureHandle {
        self.calls.push(Call::UploadTexture(coord));
        TextureHandle(self.next_id())
    }

    fn build_geometry(
        &mut self,
        coord: TileCoord,
        _kind: NodeKind,
        _height: &TileImage,
        _segments: u32,
    ) -> GeometryHandle {
        self.calls.push(Call::BuildGeometry(coord));
        GeometryHandle(self.next_id())
    }

    fn release(&mut self, coord: TileCoord, resources: NodeResources) {
        self.calls.push(Call::ReleaseTile(coord));
        self.released_tiles.push((coord, resources));
    }
}
