use serde::{Deserialize, Serialize};

use crate::error::LodError;
use crate::tile::MAX_TILE_LEVEL;

/// Tuning for subdivision and terrain bounds.
///
/// The split metric is the distance from the viewpoint to a node's bounding
/// box measured in node edge lengths. A child's metric is at least twice its
/// parent's, so `merge_threshold` should sit above `2 * split_threshold` to
/// keep freshly split nodes from merging back on the next frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Leaves closer than this (in edge lengths) are split.
    pub split_threshold: f64,

    /// Subdivided nodes whose children are all farther than this are merged.
    pub merge_threshold: f64,

    /// Nodes above this level are never merged away.
    pub min_level: u32,

    /// Nodes at this level are never split.
    pub max_level: u32,

    /// Vertical extent `[min, max]` of terrain bounding boxes (meters).
    pub height_span: [f64; 2],

    /// Quads per side of generated terrain meshes.
    pub geometry_segments: u32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            split_threshold: 1.0,
            merge_threshold: 2.5,
            min_level: 0,
            max_level: 19,
            height_span: [-500.0, 9000.0],
            geometry_segments: 16,
        }
    }
}

impl LodConfig {
    pub fn validate(&self) -> Result<(), LodError> {
        let invalid = |msg: String| Err(LodError::InvalidConfig(msg));
        if !(self.split_threshold.is_finite() && self.split_threshold > 0.0) {
            return invalid(format!(
                "split_threshold must be positive, got {}",
                self.split_threshold
            ));
        }
        if !self.merge_threshold.is_finite() || self.merge_threshold < self.split_threshold {
            return invalid(format!(
                "merge_threshold {} is below split_threshold {}",
                self.merge_threshold, self.split_threshold
            ));
        }
        if self.min_level > self.max_level {
            return invalid(format!(
                "min_level {} exceeds max_level {}",
                self.min_level, self.max_level
            ));
        }
        if self.max_level > MAX_TILE_LEVEL {
            return invalid(format!(
                "max_level {} exceeds {MAX_TILE_LEVEL}",
                self.max_level
            ));
        }
        if self.height_span[0] > self.height_span[1] {
            return invalid(format!("height_span {:?} is inverted", self.height_span));
        }
        if self.geometry_segments == 0 {
            return invalid("geometry_segments must be at least 1".to_string());
        }
        Ok(())
    }
}
