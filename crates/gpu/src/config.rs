use lod::{LodConfig, NodeKind};
use overlays::UniformConfig;
use serde::{Deserialize, Serialize};
use shapes::StrokeStyle;

use crate::error::ConfigError;

/// Everything a [`crate::MapView`] is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    /// Tile mesh kind of the whole tree.
    pub kind: NodeKind,
    pub lod: LodConfig,
    pub uniforms: UniformConfig,
    /// Default stroke applied to path shapes.
    pub stroke: StrokeStyle,
}

impl MapViewConfig {
    /// Parse and validate; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lod.validate()?;
        if !(self.stroke.width.is_finite() && self.stroke.width > 0.0) {
            return Err(ConfigError::StrokeWidth(self.stroke.width));
        }
        Ok(())
    }
}
