use foundation::math::{
    Geoposition, LinearSpace2d, LinearTransform2d, Vec2, geometry_world_texels_padded,
};

use crate::error::GeometryError;
use crate::stroke::{StrokeGeometry, StrokeStyle, stroke_path};

/// A polyline overlay in world texels together with the texel space its
/// stroke is rendered into.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGeometry {
    points: Vec<Vec2>,
    texel_space: LinearSpace2d,
    style: StrokeStyle,
}

impl PathGeometry {
    /// Fits the texel space to the points, padded by the stroke width so the
    /// wings stay inside the frame.
    pub fn new(points: Vec<Vec2>, style: StrokeStyle) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        let texel_space = geometry_world_texels_padded(&points, style.width.abs())?;
        Ok(Self {
            points,
            texel_space,
            style,
        })
    }

    pub fn with_texel_space(
        points: Vec<Vec2>,
        texel_space: LinearSpace2d,
        style: StrokeStyle,
    ) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        Ok(Self {
            points,
            texel_space,
            style,
        })
    }

    pub fn from_geopositions(
        positions: &[Geoposition],
        style: StrokeStyle,
    ) -> Result<Self, GeometryError> {
        Self::new(positions.iter().map(Geoposition::world_texel).collect(), style)
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn texel_space(&self) -> &LinearSpace2d {
        &self.texel_space
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Transform the tile shader applies to world positions to sample this
    /// path's shape buffer.
    pub fn world_to_frame_transform(&self) -> LinearTransform2d {
        LinearTransform2d::world_space_texel(&self.texel_space)
    }

    pub fn stroke(&self) -> Result<StrokeGeometry, GeometryError> {
        stroke_path(&self.points, self.style.width, &self.texel_space)
    }
}
