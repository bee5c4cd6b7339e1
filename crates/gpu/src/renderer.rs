use foundation::math::Vec3;
use foundation::{GeometryHandle, TextureHandle};
use lod::{LodTree, NodeId, TileCoord};

use crate::backend::MeshId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_rad: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera3D {
    pub fn look_at(position: Vec3, target: Vec3, fov_y_rad: f64, near: f64, far: f64) -> Self {
        Self {
            position,
            target,
            fov_y_rad,
            near,
            far,
        }
    }

    /// Normalized viewing direction, `None` when position and target coincide.
    pub fn forward(&self) -> Option<Vec3> {
        (self.target - self.position).normalized()
    }
}

/// High above the map origin, far enough that the root tile is not split.
impl Default for Camera3D {
    fn default() -> Self {
        Self::look_at(
            Vec3::new(0.0, 1.0e8, 0.0),
            Vec3::default(),
            70f64.to_radians(),
            0.1,
            1.0e9,
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RenderCommand {
    /// One visible leaf tile. Handles are `None` for layers the node kind
    /// does not load.
    DrawTile {
        node: NodeId,
        coord: TileCoord,
        texture: Option<TextureHandle>,
        geometry: Option<GeometryHandle>,
    },
    /// A shape layer mesh, already in frame space.
    DrawShape { mesh: MeshId },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderFrame {
    pub commands: Vec<RenderCommand>,
}

impl RenderFrame {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

pub struct Renderer;

impl Renderer {
    /// Draw list of every visible leaf. Subdivided nodes are never drawn.
    pub fn collect_tiles(tree: &LodTree) -> RenderFrame {
        let mut frame = RenderFrame::default();
        for (node, tile) in tree.drawn_nodes() {
            frame.commands.push(RenderCommand::DrawTile {
                node,
                coord: tile.coord(),
                texture: tile.texture(),
                geometry: tile.geometry(),
            });
        }
        frame
    }

    pub fn collect_shape(mesh: MeshId) -> RenderFrame {
        RenderFrame {
            commands: vec![RenderCommand::DrawShape { mesh }],
        }
    }
}
