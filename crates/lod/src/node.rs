use foundation::{Aabb3, GeometryHandle, Handle, TextureHandle};

use crate::kind::NodeKind;
use crate::layer::LayerState;
use crate::provider::NodeResources;
use crate::tile::{Quadrant, TileCoord};

/// Generational handle of a node inside a [`crate::LodTree`].
pub type NodeId = Handle;

/// One quadtree tile.
///
/// `visible` is derived from the layer states and is only ever set by the
/// tree. A node with children is never drawn even when visible.
#[derive(Debug, Clone)]
pub struct LodNode {
    pub(crate) coord: TileCoord,
    pub(crate) quadrant: Quadrant,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Option<[NodeId; 4]>,
    pub(crate) color: LayerState,
    pub(crate) height: LayerState,
    pub(crate) visible: bool,
    pub(crate) epoch: u32,
    pub(crate) ready_children: u8,
    pub(crate) bounds: Aabb3,
    pub(crate) resources: NodeResources,
}

impl LodNode {
    pub(crate) fn new(
        coord: TileCoord,
        quadrant: Quadrant,
        parent: Option<NodeId>,
        bounds: Aabb3,
    ) -> Self {
        Self {
            coord,
            quadrant,
            parent,
            children: None,
            color: LayerState::Idle,
            height: LayerState::Idle,
            visible: false,
            epoch: 0,
            ready_children: 0,
            bounds,
            resources: NodeResources::default(),
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    pub fn level(&self) -> u32 {
        self.coord.level
    }

    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> Option<[NodeId; 4]> {
        self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn color_state(&self) -> LayerState {
        self.color
    }

    pub fn height_state(&self) -> LayerState {
        self.height
    }

    pub fn color_loaded(&self) -> bool {
        self.color.is_loaded()
    }

    pub fn height_loaded(&self) -> bool {
        self.height.is_loaded()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Visible leaf: the only nodes the renderer draws or raycasts hit.
    pub fn is_drawn(&self) -> bool {
        self.visible && self.is_leaf()
    }

    /// Children that reported ready since the last split.
    pub fn ready_children(&self) -> u8 {
        self.ready_children
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn bounds(&self) -> Aabb3 {
        self.bounds
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.resources.texture
    }

    pub fn geometry(&self) -> Option<GeometryHandle> {
        self.resources.geometry
    }

    /// Whether every layer this kind needs has loaded.
    pub fn layers_ready(&self, kind: NodeKind) -> bool {
        self.color_loaded() && (!kind.requires_height() || self.height_loaded())
    }
}
