use serde::{Deserialize, Serialize};

use foundation::Aabb3;

use crate::tile::TileCoord;

/// How map nodes present their tile, chosen once for the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Flat textured quad.
    #[default]
    Plane,
    /// Textured patch of the globe.
    Sphere,
    /// Grid displaced on the CPU from a height tile.
    Height,
    /// Flat grid displaced in the vertex stage from a height texture.
    HeightShader,
    /// Irregular mesh built from a height tile (RTIN).
    Martini,
}

impl NodeKind {
    pub fn requires_height(self) -> bool {
        match self {
            NodeKind::Plane | NodeKind::Sphere => false,
            NodeKind::Height | NodeKind::HeightShader | NodeKind::Martini => true,
        }
    }

    pub fn is_spherical(self) -> bool {
        matches!(self, NodeKind::Sphere)
    }

    /// Bounding volume of a tile for this presentation.
    ///
    /// Flat kinds sit on `y = 0`; terrain kinds span `height_span`.
    pub fn bounds(self, coord: TileCoord, height_span: [f64; 2]) -> Aabb3 {
        if self.is_spherical() {
            coord.sphere_bounds()
        } else if self.requires_height() {
            coord.plane_bounds(height_span)
        } else {
            coord.plane_bounds([0.0, 0.0])
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Plane => "plane",
            NodeKind::Sphere => "sphere",
            NodeKind::Height => "height",
            NodeKind::HeightShader => "height_shader",
            NodeKind::Martini => "martini",
        };
        f.write_str(name)
    }
}
