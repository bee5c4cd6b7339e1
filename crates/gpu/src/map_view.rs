use foundation::Ray;
use foundation::math::Geoposition;
use lod::{
    LodController, LodEvent, LodEventBus, LodTree, LodUpdate, RayHit, TileProvider, TileSources,
    TileUploader,
};
use overlays::ShaderUniforms;
use runtime::{Event, Frame, UpdateLoop};
use shapes::{GeometryError, PathGeometry};
use tracing::{info, trace};

use crate::backend::{RenderBackend, ShaderBinding};
use crate::config::MapViewConfig;
use crate::error::{ConfigError, ShapeError};
use crate::renderer::{Camera3D, Renderer};
use crate::shape_layers::{OverlayGeometry, ShapeDrawable, Shapes};

/// State handed to model update handlers each frame.
#[derive(Debug)]
pub struct ModelContext {
    pub camera: Camera3D,
    pub uniforms: ShaderUniforms,
}

/// What one [`MapView::tick`] did.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub frame_index: u64,
    pub lod: LodUpdate,
    pub loads_applied: usize,
    pub resources_released: usize,
    pub shape_layers_drawn: usize,
    pub tiles_drawn: usize,
}

/// A tiled map surface with its overlays.
///
/// Owns the LOD tree, the overlay uniforms and the shape layers, and drives a
/// backend through one frame per [`Self::tick`].
pub struct MapView {
    config: MapViewConfig,
    tree: LodTree,
    controller: LodController,
    model: ModelContext,
    update_loop: UpdateLoop<ModelContext>,
    shapes: Shapes,
    events: LodEventBus,
    frame: Frame,
}

impl std::fmt::Debug for MapView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("tree", &self.tree)
            .field("shapes", &self.shapes.len())
            .field("frame", &self.frame.index)
            .finish()
    }
}

impl MapView {
    pub fn new(config: MapViewConfig, sources: TileSources) -> Result<Self, ConfigError> {
        config.validate()?;
        let tree = LodTree::new(config.kind, sources, config.lod.clone())?;
        info!(
            kind = %config.kind,
            circles = config.uniforms.circle_capacity,
            shapes = config.uniforms.shape_capacity,
            "map view created"
        );
        Ok(Self {
            model: ModelContext {
                camera: Camera3D::default(),
                uniforms: ShaderUniforms::new(&config.uniforms),
            },
            config,
            tree,
            controller: LodController::new(),
            update_loop: UpdateLoop::new(),
            shapes: Shapes::new(),
            events: LodEventBus::new(),
            frame: Frame::first(),
        })
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    pub fn tree(&self) -> &LodTree {
        &self.tree
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn camera(&self) -> &Camera3D {
        &self.model.camera
    }

    pub fn uniforms(&self) -> &ShaderUniforms {
        &self.model.uniforms
    }

    pub fn uniforms_mut(&mut self) -> &mut ShaderUniforms {
        &mut self.model.uniforms
    }

    pub fn update_loop_mut(&mut self) -> &mut UpdateLoop<ModelContext> {
        &mut self.update_loop
    }

    pub fn shapes(&self) -> &Shapes {
        &self.shapes
    }

    pub fn events(&self) -> &LodEventBus {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<Event<LodEvent>> {
        self.events.drain()
    }

    /// Swap the color provider; every loaded tile is discarded and refetched.
    pub fn set_provider(&mut self, provider: Box<dyn TileProvider>) {
        self.tree.set_color_provider(provider, self.frame);
    }

    pub fn set_height_provider(&mut self, provider: Box<dyn TileProvider>) {
        self.tree.set_height_provider(provider, self.frame);
    }

    /// Reload every tile from the current providers.
    pub fn clear(&mut self) {
        self.tree.reload(self.frame);
    }

    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        self.tree.raycast(ray)
    }

    /// New shape layer plus the uniform slot that samples it.
    pub fn make_shape<B: RenderBackend>(
        &mut self,
        name: &str,
        backend: &mut B,
    ) -> Result<ShapeDrawable, ShapeError> {
        let identity = self.model.uniforms.create_shape()?;
        let layer = self.shapes.make_layer(name, backend);
        if let Some(texture) = self.shapes.texture(layer) {
            self.model.uniforms.update_shape_sampler(identity, texture)?;
        }
        Ok(ShapeDrawable::new(identity, layer))
    }

    pub fn update_shape_geometry(
        &mut self,
        drawable: &ShapeDrawable,
        geometry: &dyn OverlayGeometry,
    ) -> Result<(), ShapeError> {
        drawable.update_geometry(geometry, &mut self.shapes, &mut self.model.uniforms)
    }

    pub fn remove_shape(&mut self, drawable: ShapeDrawable) -> Result<(), ShapeError> {
        self.model.uniforms.remove_shape(drawable.identity())?;
        self.shapes.remove_layer(drawable.layer())
    }

    /// Path through `positions` stroked with the configured style.
    pub fn path(&self, positions: &[Geoposition]) -> Result<PathGeometry, GeometryError> {
        PathGeometry::from_geopositions(positions, self.config.stroke)
    }

    /// Run one frame: LOD update, finished loads, model handlers, resource
    /// release, shape buffers, uniform binding, then the visible tiles.
    pub fn tick<B>(&mut self, camera: Camera3D, dt_s: f64, backend: &mut B) -> FrameReport
    where
        B: RenderBackend + ShaderBinding + TileUploader,
    {
        let frame = self.frame.advance(dt_s);
        self.frame = frame;
        self.model.camera = camera;

        let lod = self
            .controller
            .update(&mut self.tree, camera.position, frame, &mut self.events);
        let loads_applied = self.tree.poll_loads(&mut *backend, frame, &mut self.events);

        self.update_loop.tick(frame, &mut self.model);

        let resources_released = self.tree.release_into(&mut *backend);
        let shape_layers_drawn = self.shapes.render(&mut *backend, &camera);

        backend.set_render_target(None);
        let uniforms = &self.model.uniforms;
        backend.bind_circles(uniforms.circle_block());
        backend.bind_shapes(uniforms.shape_block(), uniforms.shape_samplers());

        let tiles = Renderer::collect_tiles(&self.tree);
        backend.render(&tiles, &camera);

        let report = FrameReport {
            frame_index: frame.index,
            lod,
            loads_applied,
            resources_released,
            shape_layers_drawn,
            tiles_drawn: tiles.len(),
        };
        trace!(?report, "frame");
        report
    }
}
