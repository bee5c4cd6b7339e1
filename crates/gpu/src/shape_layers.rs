//! Deferred shape buffers.
//!
//! Every shape layer owns one offscreen render target. Layers are drawn into
//! their targets before the main scene each frame; tile materials then sample
//! the targets through the shape uniforms.

use foundation::math::LinearTransform2d;
use foundation::{Arena, Handle, TextureHandle};
use overlays::{DrawableIdentity, ShaderUniforms};
use shapes::{GeometryError, PathGeometry, PolygonGeometry};
use tracing::debug;

use crate::backend::{MeshData, MeshId, RenderBackend, RenderTarget, RenderTargetId};
use crate::error::ShapeError;
use crate::renderer::{Camera3D, Renderer};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ShapeLayerId(Handle);

/// Geometry that can be drawn into a shape buffer.
pub trait OverlayGeometry {
    /// World → buffer-texel transform the tile shader samples with.
    fn world_to_frame_transform(&self) -> LinearTransform2d;

    fn mesh(&self) -> Result<MeshData, GeometryError>;
}

impl OverlayGeometry for PathGeometry {
    fn world_to_frame_transform(&self) -> LinearTransform2d {
        PathGeometry::world_to_frame_transform(self)
    }

    fn mesh(&self) -> Result<MeshData, GeometryError> {
        Ok(self.stroke()?.into())
    }
}

impl OverlayGeometry for PolygonGeometry {
    fn world_to_frame_transform(&self) -> LinearTransform2d {
        PolygonGeometry::world_to_frame_transform(self)
    }

    fn mesh(&self) -> Result<MeshData, GeometryError> {
        Ok(self.triangulate()?.into())
    }
}

#[derive(Debug)]
struct ShapeLayer {
    name: String,
    target: RenderTarget,
    mesh: Option<MeshId>,
    pending: Option<MeshData>,
}

/// All shape layers of a map view.
///
/// Removed layers free their slot for the next layer; their GPU resources
/// are released on the next [`Shapes::render`].
#[derive(Debug, Default)]
pub struct Shapes {
    layers: Arena<ShapeLayer>,
    retired_meshes: Vec<MeshId>,
    retired_targets: Vec<RenderTargetId>,
}

impl Shapes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn make_layer<B: RenderBackend>(&mut self, name: &str, backend: &mut B) -> ShapeLayerId {
        let target = backend.create_render_target(name);
        let id = ShapeLayerId(self.layers.alloc(ShapeLayer {
            name: name.to_string(),
            target,
            mesh: None,
            pending: None,
        }));
        debug!(layer = name, target = ?target.id, "shape layer created");
        id
    }

    pub fn target(&self, id: ShapeLayerId) -> Option<RenderTarget> {
        self.layer(id).map(|l| l.target)
    }

    pub fn texture(&self, id: ShapeLayerId) -> Option<TextureHandle> {
        self.target(id).map(|t| t.texture)
    }

    pub fn name(&self, id: ShapeLayerId) -> Option<&str> {
        self.layer(id).map(|l| l.name.as_str())
    }

    /// Uploaded mesh of the layer, if any has been rendered yet.
    pub fn mesh(&self, id: ShapeLayerId) -> Option<MeshId> {
        self.layer(id).and_then(|l| l.mesh)
    }

    /// Replace the layer mesh. The upload happens on the next [`Self::render`].
    pub fn set_mesh(&mut self, id: ShapeLayerId, mesh: MeshData) -> Result<(), ShapeError> {
        let layer = self.layer_mut(id).ok_or(ShapeError::UnknownLayer(id))?;
        layer.pending = Some(mesh);
        Ok(())
    }

    pub fn remove_layer(&mut self, id: ShapeLayerId) -> Result<(), ShapeError> {
        let layer = self.layers.remove(id.0).ok_or(ShapeError::UnknownLayer(id))?;
        self.retired_meshes.extend(layer.mesh);
        self.retired_targets.push(layer.target.id);
        debug!(layer = %layer.name, "shape layer removed");
        Ok(())
    }

    /// Draw every layer that has a mesh into its own target. Returns how many
    /// layers were drawn; the caller restores the screen target afterwards.
    pub fn render<B: RenderBackend>(&mut self, backend: &mut B, camera: &Camera3D) -> usize {
        for mesh in self.retired_meshes.drain(..) {
            backend.release_mesh(mesh);
        }
        for target in self.retired_targets.drain(..) {
            backend.release_render_target(target);
        }

        let mut drawn = 0;
        for (_, layer) in self.layers.iter_mut() {
            if let Some(data) = layer.pending.take() {
                if let Some(old) = layer.mesh.take() {
                    backend.release_mesh(old);
                }
                layer.mesh = Some(backend.upload_mesh(&data));
            }
            let Some(mesh) = layer.mesh else {
                continue;
            };
            backend.set_render_target(Some(layer.target.id));
            backend.render(&Renderer::collect_shape(mesh), camera);
            drawn += 1;
        }
        drawn
    }

    fn layer(&self, id: ShapeLayerId) -> Option<&ShapeLayer> {
        self.layers.get(id.0)
    }

    fn layer_mut(&mut self, id: ShapeLayerId) -> Option<&mut ShapeLayer> {
        self.layers.get_mut(id.0)
    }
}

/// A shape uniform slot bound to one shape layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShapeDrawable {
    identity: DrawableIdentity,
    layer: ShapeLayerId,
}

impl ShapeDrawable {
    pub fn new(identity: DrawableIdentity, layer: ShapeLayerId) -> Self {
        Self { identity, layer }
    }

    pub fn identity(&self) -> DrawableIdentity {
        self.identity
    }

    pub fn layer(&self) -> ShapeLayerId {
        self.layer
    }

    /// Point the shape record at the new geometry's texel space and queue its mesh.
    ///
    /// The mesh is built first, so a geometry error leaves both the record
    /// and the layer untouched.
    pub fn update_geometry(
        &self,
        geometry: &dyn OverlayGeometry,
        shapes: &mut Shapes,
        uniforms: &mut ShaderUniforms,
    ) -> Result<(), ShapeError> {
        let mesh = geometry.mesh()?;
        if shapes.layer(self.layer).is_none() {
            return Err(ShapeError::UnknownLayer(self.layer));
        }
        uniforms.update_shape_transform(self.identity, geometry.world_to_frame_transform())?;
        shapes.set_mesh(self.layer, mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::{ShapeDrawable, Shapes};
    use crate::backend::MeshData;
    use crate::error::ShapeError;
    use crate::renderer::Camera3D;
    use crate::testing::{Call, RecordingBackend};
    use foundation::math::Vec2;
    use overlays::{PoolError, ShaderUniforms, ShapeUniform};
    use pretty_assertions::assert_eq;
    use shapes::{PathGeometry, PolygonGeometry, StrokeStyle};

    fn triangle() -> MeshData {
        MeshData {
            vertices: vec![[1.0, 1.0, 0.0], [-1.0, 1.0, 0.0], [-1.0, -1.0, 0.0]],
            indices: vec![0, 1, 2],
            side: Vec::new(),
        }
    }

    #[test]
    fn layers_render_into_their_own_targets() {
        let mut backend = RecordingBackend::default();
        let mut shapes = Shapes::new();
        let camera = Camera3D::default();
        let a = shapes.make_layer("a", &mut backend);
        let b = shapes.make_layer("b", &mut backend);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes.name(b), Some("b"));

        // No mesh yet: nothing to draw.
        assert_eq!(shapes.render(&mut backend, &camera), 0);

        shapes.set_mesh(a, triangle()).unwrap();
        backend.calls.clear();
        assert_eq!(shapes.render(&mut backend, &camera), 1);
        let mesh = shapes.mesh(a).unwrap();
        let target = shapes.target(a).unwrap();
        assert_eq!(
            backend.calls,
            vec![
                Call::UploadMesh(mesh),
                Call::SetTarget(Some(target.id)),
                Call::Render {
                    target: Some(target.id),
                    commands: 1
                },
            ]
        );

        // Already uploaded: the next frame redraws without uploading.
        backend.calls.clear();
        shapes.render(&mut backend, &camera);
        assert!(!backend.calls.iter().any(|c| matches!(c, Call::UploadMesh(_))));
    }

    #[test]
    fn replacing_or_removing_releases_old_meshes() {
        let mut backend = RecordingBackend::default();
        let mut shapes = Shapes::new();
        let camera = Camera3D::default();
        let layer = shapes.make_layer("roads", &mut backend);

        shapes.set_mesh(layer, triangle()).unwrap();
        shapes.render(&mut backend, &camera);
        let first = shapes.mesh(layer).unwrap();

        shapes.set_mesh(layer, triangle()).unwrap();
        shapes.render(&mut backend, &camera);
        let second = shapes.mesh(layer).unwrap();
        assert_ne!(first, second);
        assert_eq!(backend.released_meshes, vec![first]);

        let target = shapes.target(layer).unwrap();
        shapes.remove_layer(layer).unwrap();
        assert!(shapes.is_empty());
        assert_eq!(shapes.render(&mut backend, &camera), 0);
        assert_eq!(backend.released_meshes, vec![first, second]);
        assert_eq!(backend.released_targets, vec![target.id]);
        assert_eq!(
            shapes.set_mesh(layer, triangle()),
            Err(ShapeError::UnknownLayer(layer))
        );
    }

    #[test]
    fn drawable_updates_record_transform_and_layer_mesh() {
        let mut backend = RecordingBackend::default();
        let mut shapes = Shapes::new();
        let mut uniforms = ShaderUniforms::default();
        let identity = uniforms.create_shape().unwrap();
        let drawable = ShapeDrawable::new(identity, shapes.make_layer("path", &mut backend));

        let path = PathGeometry::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(100.0, 50.0)],
            StrokeStyle { width: 5.0 },
        )
        .unwrap();
        drawable
            .update_geometry(&path, &mut shapes, &mut uniforms)
            .unwrap();
        assert_eq!(
            *uniforms.shape(identity).unwrap(),
            ShapeUniform::from(path.world_to_frame_transform())
        );

        shapes.render(&mut backend, &Camera3D::default());
        assert_eq!(backend.meshes.len(), 1);
        assert_eq!(backend.meshes[0].1.vertices.len(), 9);
        assert_eq!(backend.meshes[0].1.side.len(), 9);

        let polygon = PolygonGeometry::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(5.0, 8.0)],
            Vec::new(),
        )
        .unwrap();
        drawable
            .update_geometry(&polygon, &mut shapes, &mut uniforms)
            .unwrap();
        shapes.render(&mut backend, &Camera3D::default());
        assert_eq!(backend.meshes[1].1.indices.len(), 3);
        assert!(backend.meshes[1].1.side.is_empty());
        assert_eq!(Some(backend.meshes[1].0), shapes.mesh(drawable.layer()));
    }

    #[test]
    fn removed_identity_is_reported() {
        let mut backend = RecordingBackend::default();
        let mut shapes = Shapes::new();
        let mut uniforms = ShaderUniforms::default();
        let identity = uniforms.create_shape().unwrap();
        let drawable = ShapeDrawable::new(identity, shapes.make_layer("gone", &mut backend));
        uniforms.remove_shape(identity).unwrap();

        let path = PathGeometry::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)],
            StrokeStyle::default(),
        )
        .unwrap();
        assert!(matches!(
            drawable.update_geometry(&path, &mut shapes, &mut uniforms),
            Err(ShapeError::Pool(PoolError::UnknownIdentity { .. }))
        ));
        assert_eq!(shapes.mesh(drawable.layer()), None);
    }

    #[test]
    fn layer_churn_releases_targets_and_reuses_slots() {
        let mut backend = RecordingBackend::default();
        let mut shapes = Shapes::new();
        let camera = Camera3D::default();
        let kept = shapes.make_layer("kept", &mut backend);

        let mut removed = Vec::new();
        for _ in 0..1000 {
            let layer = shapes.make_layer("temp", &mut backend);
            removed.push(shapes.target(layer).unwrap().id);
            shapes.remove_layer(layer).unwrap();
            shapes.render(&mut backend, &camera);
            assert_eq!(shapes.target(layer), None);
        }

        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes.layers.slot_count(), 2);
        assert_eq!(backend.released_targets, removed);
        assert!(shapes.target(kept).is_some());
    }
}
