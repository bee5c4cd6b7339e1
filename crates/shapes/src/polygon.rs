use earcutr::earcut;
use foundation::math::{
    Geoposition, LinearSpace2d, LinearTransform2d, Vec2, geometry_world_texels, transform,
};

use crate::error::GeometryError;

/// Triangulated polygon in the `[-1, 1]` frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonMesh {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
}

impl PolygonMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Filled area overlay: one outer ring plus optional holes, in world texels.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonGeometry {
    outer: Vec<Vec2>,
    holes: Vec<Vec<Vec2>>,
    texel_space: LinearSpace2d,
}

impl PolygonGeometry {
    /// Fits the texel space to the outer ring.
    pub fn new(outer: Vec<Vec2>, holes: Vec<Vec<Vec2>>) -> Result<Self, GeometryError> {
        let outer = open_ring(outer)?;
        let texel_space = geometry_world_texels(&outer)?;
        Self::with_texel_space(outer, holes, texel_space)
    }

    pub fn with_texel_space(
        outer: Vec<Vec2>,
        holes: Vec<Vec<Vec2>>,
        texel_space: LinearSpace2d,
    ) -> Result<Self, GeometryError> {
        let outer = open_ring(outer)?;
        let holes = holes
            .into_iter()
            .map(open_ring)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            outer,
            holes,
            texel_space,
        })
    }

    pub fn from_geopositions(
        outer: &[Geoposition],
        holes: &[Vec<Geoposition>],
    ) -> Result<Self, GeometryError> {
        let project = |ring: &[Geoposition]| -> Vec<Vec2> {
            ring.iter().map(Geoposition::world_texel).collect()
        };
        Self::new(
            project(outer),
            holes.iter().map(|h| project(h)).collect(),
        )
    }

    pub fn texel_space(&self) -> &LinearSpace2d {
        &self.texel_space
    }

    pub fn world_to_frame_transform(&self) -> LinearTransform2d {
        LinearTransform2d::world_space_texel(&self.texel_space)
    }

    pub fn triangulate(&self) -> Result<PolygonMesh, GeometryError> {
        let mut points = transform::vertices(&self.outer, &self.texel_space, &LinearSpace2d::FRAME);
        let mut hole_indices = Vec::with_capacity(self.holes.len());
        for hole in &self.holes {
            hole_indices.push(points.len());
            points.extend(transform::vertices(
                hole,
                &self.texel_space,
                &LinearSpace2d::FRAME,
            ));
        }
        if points.len() > usize::from(u16::MAX) + 1 {
            return Err(GeometryError::TooManyVertices(points.len()));
        }

        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        let indices = earcut(&coords, &hole_indices, 2)
            .map_err(|e| GeometryError::Triangulation(format!("{e:?}")))?;
        if indices.is_empty() {
            tracing::warn!(vertices = points.len(), "polygon produced no triangles");
        }

        Ok(PolygonMesh {
            vertices: points
                .iter()
                .map(|p| [p.x as f32, p.y as f32, 0.0])
                .collect(),
            indices: indices.into_iter().map(|i| i as u16).collect(),
        })
    }
}

fn open_ring(mut ring: Vec<Vec2>) -> Result<Vec<Vec2>, GeometryError> {
    if ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(GeometryError::TooFewPoints(ring.len()));
    }
    Ok(ring)
}
