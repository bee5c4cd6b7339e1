use crate::error::TileLoadError;
use crate::layer::TileLayer;
use crate::node::NodeId;
use crate::tile::TileCoord;

/// Observability events emitted by the tree onto a `runtime::EventBus`.
#[derive(Debug, Clone, PartialEq)]
pub enum LodEvent {
    Split { node: NodeId, coord: TileCoord },
    Merge { node: NodeId, coord: TileCoord, discarded: usize },
    NodeReady { node: NodeId, coord: TileCoord },
    TileLoadFailed(TileLoadError),
    /// A load finished for a node that was merged away or re-initialised.
    StaleCompletion { coord: TileCoord, layer: TileLayer },
}

pub type LodEventBus = runtime::EventBus<LodEvent>;
