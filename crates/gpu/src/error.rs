use lod::LodError;
use overlays::PoolError;
use shapes::GeometryError;

use crate::shape_layers::ShapeLayerId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid map view config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Lod(#[from] LodError),
    #[error("invalid stroke width {0}")]
    StrokeWidth(f64),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("unknown shape layer {0:?}")]
    UnknownLayer(ShapeLayerId),
}
