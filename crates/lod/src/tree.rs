use foundation::math::Vec3;
use foundation::{Arena, Ray};
use runtime::{Frame, Metrics};
use tracing::{debug, warn};

use crate::config::LodConfig;
use crate::error::{LodError, TileLoadError};
use crate::event::{LodEvent, LodEventBus};
use crate::kind::NodeKind;
use crate::layer::{LayerState, TileLayer};
use crate::loader::{LoadCompletion, LoadTicket, Loader};
use crate::node::{LodNode, NodeId};
use crate::provider::{NodeResources, TileProvider, TileUploader};
use crate::tile::{Quadrant, TileCoord};

/// Color and (optional) height providers feeding a tree.
pub struct TileSources {
    pub color: Box<dyn TileProvider>,
    pub height: Option<Box<dyn TileProvider>>,
}

impl TileSources {
    pub fn color_only(color: impl TileProvider + 'static) -> Self {
        Self {
            color: Box::new(color),
            height: None,
        }
    }

    pub fn with_height(color: impl TileProvider + 'static, height: impl TileProvider + 'static) -> Self {
        Self {
            color: Box::new(color),
            height: Some(Box::new(height)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    pub coord: TileCoord,
    pub distance: f64,
    pub point: Vec3,
}

/// Arena-backed quadtree of map tiles.
///
/// Nodes reference their parent and children through generational handles, so
/// a handle to a merged node simply stops resolving. Every load carries a
/// [`LoadTicket`]; completions whose node is gone or whose epoch moved on are
/// dropped without touching the tree.
pub struct LodTree {
    kind: NodeKind,
    config: LodConfig,
    nodes: Arena<LodNode>,
    root: NodeId,
    color_provider: Box<dyn TileProvider>,
    height_provider: Option<Box<dyn TileProvider>>,
    loader: Loader,
    released: Vec<(TileCoord, NodeResources)>,
    metrics: Metrics,
}

impl std::fmt::Debug for LodTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LodTree")
            .field("kind", &self.kind)
            .field("nodes", &self.nodes.len())
            .field("loader", &self.loader)
            .finish()
    }
}

impl LodTree {
    /// Build a tree with a single root tile and start loading it.
    pub fn new(kind: NodeKind, sources: TileSources, config: LodConfig) -> Result<Self, LodError> {
        config.validate()?;
        if kind.requires_height() && sources.height.is_none() {
            return Err(LodError::MissingHeightProvider { kind });
        }

        let mut nodes = Arena::new();
        let coord = TileCoord::ROOT;
        let root = nodes.alloc(LodNode::new(
            coord,
            Quadrant::Root,
            None,
            kind.bounds(coord, config.height_span),
        ));

        let mut tree = Self {
            kind,
            config,
            nodes,
            root,
            color_provider: sources.color,
            height_provider: sources.height,
            loader: Loader::new(),
            released: Vec::new(),
            metrics: Metrics::new(),
        };
        tree.metrics.set_gauge("lod.nodes", 1);
        tree.initialize(root, Frame::first());
        Ok(tree)
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&LodNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn pending_loads(&self) -> usize {
        self.loader.len()
    }

    /// Deepest level the tree may split to, honouring provider limits.
    pub fn max_level(&self) -> u32 {
        let provider_max = self
            .height_provider
            .as_ref()
            .map_or(u32::MAX, |p| p.max_level())
            .min(self.color_provider.max_level());
        self.config.max_level.min(provider_max)
    }

    /// Visible leaves, in arena order.
    pub fn drawn_nodes(&self) -> impl Iterator<Item = (NodeId, &LodNode)> {
        self.nodes.iter().filter(|(_, n)| n.is_drawn())
    }

    /// (Re)start every load the node needs.
    ///
    /// Bumps the node epoch, so completions of loads issued before this call
    /// are discarded. Resources the node held are queued for release.
    pub fn initialize(&mut self, id: NodeId, frame: Frame) -> bool {
        let kind = self.kind;
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };

        node.epoch = node.epoch.wrapping_add(1);
        let was_visible = std::mem::replace(&mut node.visible, false);
        let old = std::mem::take(&mut node.resources);
        let loading = LayerState::Loading {
            since_frame: frame.index,
        };
        node.color = loading;
        node.height = if kind.requires_height() {
            loading
        } else {
            LayerState::Idle
        };
        let (coord, epoch, parent) = (node.coord, node.epoch, node.parent);

        if !old.is_empty() {
            self.released.push((coord, old));
        }
        if was_visible
            && let Some(p) = parent
            && let Some(parent) = self.nodes.get_mut(p)
        {
            parent.ready_children = parent.ready_children.saturating_sub(1);
        }

        self.request(id, coord, epoch, TileLayer::Color, frame);
        if kind.requires_height() {
            self.request(id, coord, epoch, TileLayer::Height, frame);
        }
        true
    }

    fn request(&mut self, node: NodeId, coord: TileCoord, epoch: u32, layer: TileLayer, frame: Frame) {
        let provider = match layer {
            TileLayer::Color => Some(&self.color_provider),
            TileLayer::Height => self.height_provider.as_ref(),
        };
        let Some(provider) = provider else {
            warn!(%coord, %layer, "no provider for layer");
            if let Some(n) = self.nodes.get_mut(node) {
                n.height = LayerState::Failed;
            }
            return;
        };

        let fetch = provider.fetch_tile(coord);
        self.loader.submit(LoadTicket { node, epoch, layer }, coord, frame.index, fetch);
        self.metrics.incr("lod.loads_started");
        debug!(%coord, %layer, epoch, "tile load started");
    }

    /// Flip the node visible once every required layer has loaded.
    ///
    /// Returns `true` only on the transition.
    pub fn node_ready(&mut self, id: NodeId, frame: Frame, bus: &mut LodEventBus) -> bool {
        let kind = self.kind;
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        if node.visible || !node.layers_ready(kind) {
            return false;
        }

        node.visible = true;
        let (coord, parent) = (node.coord, node.parent);
        if let Some(p) = parent
            && let Some(parent) = self.nodes.get_mut(p)
        {
            parent.ready_children = (parent.ready_children + 1).min(4);
        }

        debug!(%coord, "node ready");
        bus.emit(frame, LodEvent::NodeReady { node: id, coord });
        true
    }

    /// Create the four children of a leaf and start their loads. Leaves at
    /// [`Self::max_level`] are not split.
    pub fn split(&mut self, id: NodeId, frame: Frame, bus: &mut LodEventBus) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if !node.is_leaf() || node.level() >= self.max_level() {
            return false;
        }

        let coord = node.coord;
        let (kind, span) = (self.kind, self.config.height_span);
        let children = coord.children().map(|(quadrant, child)| {
            self.nodes.alloc(LodNode::new(
                child,
                quadrant,
                Some(id),
                kind.bounds(child, span),
            ))
        });

        if let Some(node) = self.nodes.get_mut(id) {
            node.children = Some(children);
            node.ready_children = 0;
        }
        for child in children {
            self.initialize(child, frame);
        }

        self.metrics.incr("lod.splits");
        self.metrics.set_gauge("lod.nodes", self.nodes.len() as i64);
        debug!(%coord, "split");
        bus.emit(frame, LodEvent::Split { node: id, coord });
        true
    }

    /// Discard every descendant of `id`.
    ///
    /// Loads still in flight for the discarded nodes become stale. The parent's
    /// visibility is derived again from its own layers.
    pub fn merge(&mut self, id: NodeId, frame: Frame, bus: &mut LodEventBus) -> bool {
        let Some(children) = self.nodes.get(id).and_then(|n| n.children) else {
            return false;
        };

        let mut stack = children.to_vec();
        let mut discarded = 0;
        while let Some(child) = stack.pop() {
            let Some(child) = self.nodes.remove(child) else {
                continue;
            };
            discarded += 1;
            if let Some(grandchildren) = child.children {
                stack.extend(grandchildren);
            }
            if !child.resources.is_empty() {
                self.released.push((child.coord, child.resources));
            }
        }

        let kind = self.kind;
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.children = None;
        node.ready_children = 0;
        node.visible = node.layers_ready(kind);
        let coord = node.coord;

        self.metrics.incr("lod.merges");
        self.metrics.set_gauge("lod.nodes", self.nodes.len() as i64);
        debug!(%coord, discarded, "merge");
        bus.emit(
            frame,
            LodEvent::Merge {
                node: id,
                coord,
                discarded,
            },
        );
        true
    }

    /// Apply every load that has already finished. Never blocks.
    pub fn poll_loads(
        &mut self,
        uploader: &mut dyn TileUploader,
        frame: Frame,
        bus: &mut LodEventBus,
    ) -> usize {
        let ready = self.loader.poll_ready();
        let mut applied = 0;
        for completion in ready {
            if self.apply_completion(completion, uploader, frame, bus) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next load to finish; feed it to [`Self::apply_completion`].
    pub async fn next_completion(&mut self) -> Option<LoadCompletion> {
        self.loader.next().await
    }

    /// Returns `false` when the completion was stale and dropped.
    pub fn apply_completion(
        &mut self,
        completion: LoadCompletion,
        uploader: &mut dyn TileUploader,
        frame: Frame,
        bus: &mut LodEventBus,
    ) -> bool {
        let LoadCompletion {
            ticket,
            coord,
            started_frame,
            result,
        } = completion;
        self.metrics
            .record("lod.load_frames", frame.frames_since(started_frame));

        let (kind, segments) = (self.kind, self.config.geometry_segments);
        let Some(node) = self
            .nodes
            .get_mut(ticket.node)
            .filter(|n| n.epoch == ticket.epoch)
        else {
            self.metrics.incr("lod.stale_completions");
            debug!(%coord, layer = %ticket.layer, "stale completion dropped");
            bus.emit(
                frame,
                LodEvent::StaleCompletion {
                    coord,
                    layer: ticket.layer,
                },
            );
            return false;
        };

        match result {
            Ok(image) => {
                match ticket.layer {
                    TileLayer::Color => {
                        node.resources.texture =
                            Some(uploader.upload_texture(coord, TileLayer::Color, &image));
                        node.color = LayerState::Loaded;
                    }
                    TileLayer::Height => {
                        node.resources.geometry =
                            Some(uploader.build_geometry(coord, kind, &image, segments));
                        node.height = LayerState::Loaded;
                    }
                }
                self.metrics.incr("lod.loads_completed");
                self.node_ready(ticket.node, frame, bus);
            }
            Err(source) => {
                match ticket.layer {
                    TileLayer::Color => node.color = LayerState::Failed,
                    TileLayer::Height => node.height = LayerState::Failed,
                }
                self.metrics.incr("lod.loads_failed");
                warn!(%coord, layer = %ticket.layer, error = %source, "tile load failed");
                bus.emit(
                    frame,
                    LodEvent::TileLoadFailed(TileLoadError {
                        coord,
                        layer: ticket.layer,
                        source,
                    }),
                );
            }
        }
        true
    }

    /// Resources of merged or re-initialised nodes, oldest first.
    pub fn drain_released(&mut self) -> Vec<(TileCoord, NodeResources)> {
        std::mem::take(&mut self.released)
    }

    pub fn release_into(&mut self, uploader: &mut dyn TileUploader) -> usize {
        let released = self.drain_released();
        let count = released.len();
        for (coord, resources) in released {
            uploader.release(coord, resources);
        }
        count
    }

    /// Closest drawn tile along the ray.
    ///
    /// Subdivided nodes defer to their children; leaves are tested only when
    /// visible.
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        let mut best = None;
        self.raycast_node(self.root, ray, &mut best);
        best
    }

    fn raycast_node(&self, id: NodeId, ray: &Ray, best: &mut Option<RayHit>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if let Some(children) = node.children {
            for child in children {
                self.raycast_node(child, ray, best);
            }
            return;
        }
        if !node.visible {
            return;
        }
        let Some(t) = node.bounds.ray_hit_t(ray, 0.0, f64::MAX) else {
            return;
        };
        if best.as_ref().is_some_and(|b| b.distance <= t) {
            return;
        }
        if let Some(point) = ray.at(t) {
            *best = Some(RayHit {
                node: id,
                coord: node.coord,
                distance: t,
                point,
            });
        }
    }

    /// Swap the color source and reload every node from it.
    pub fn set_color_provider(&mut self, provider: Box<dyn TileProvider>, frame: Frame) {
        self.color_provider = provider;
        self.reload(frame);
    }

    /// Swap the height source and reload every node from it.
    pub fn set_height_provider(&mut self, provider: Box<dyn TileProvider>, frame: Frame) {
        self.height_provider = Some(provider);
        self.reload(frame);
    }

    /// Re-initialise every node, parents before children.
    pub fn reload(&mut self, frame: Frame) {
        let mut order = vec![self.root];
        let mut i = 0;
        while let Some(&id) = order.get(i) {
            if let Some(children) = self.nodes.get(id).and_then(|n| n.children) {
                order.extend(children);
            }
            i += 1;
        }
        for id in order {
            self.initialize(id, frame);
        }
        debug!(nodes = self.nodes.len(), "tree reloaded");
    }
}
