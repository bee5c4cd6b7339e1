use crate::kind::NodeKind;
use crate::layer::TileLayer;
use crate::provider::TileFetchError;
use crate::tile::TileCoord;

/// A provider failed to deliver a tile layer. Recoverable: the node stays
/// invisible and traversal continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to load {layer} tile {coord}")]
pub struct TileLoadError {
    pub coord: TileCoord,
    pub layer: TileLayer,
    #[source]
    pub source: TileFetchError,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LodError {
    #[error("{kind} nodes need a height provider")]
    MissingHeightProvider { kind: NodeKind },
    #[error("invalid lod config: {0}")]
    InvalidConfig(String),
}
