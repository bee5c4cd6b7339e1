//! Polyline → ribbon triangles.
//!
//! Each path point contributes one core vertex and two wing vertices offset
//! perpendicular to the path. Interior wings are mitered: the wing lines of
//! the incoming and outgoing segments are intersected, and when they are
//! parallel the plain wing point of the outgoing segment is used instead.

use std::f64::consts::FRAC_PI_2;

use foundation::math::{Line, LinearSpace2d, Vec2, transform};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

pub const DEFAULT_STROKE_WIDTH: f64 = 200.0;

/// Which part of the ribbon a vertex belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Left,
    Core,
    Right,
}

impl Side {
    pub fn factor(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Core => 0.0,
            Side::Right => 1.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    /// Offset of each wing from the path, in world texels.
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Frame-space triangle mesh of a stroked path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeGeometry {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
    /// Per-vertex side factor, see [`Side::factor`].
    pub side: Vec<f32>,
}

impl StrokeGeometry {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn count_side(&self, side: Side) -> usize {
        self.side.iter().filter(|f| **f == side.factor()).count()
    }
}

struct Wings {
    lhs: Vec2,
    rhs: Vec2,
}

impl Wings {
    fn at(point: Vec2, direction: Vec2, width: f64) -> Self {
        let angle = direction.angle();
        Self {
            lhs: point + Vec2::from_polar(angle + FRAC_PI_2, width),
            rhs: point + Vec2::from_polar(angle - FRAC_PI_2, width),
        }
    }

    fn lines(&self, direction: Vec2) -> (Line, Line) {
        (
            Line::with_points(self.lhs, self.lhs + direction),
            Line::with_points(self.rhs, self.rhs + direction),
        )
    }
}

#[derive(Copy, Clone)]
struct Joint {
    core: u16,
    lhs: u16,
    rhs: u16,
}

struct Builder<'a> {
    texel_space: &'a LinearSpace2d,
    geometry: StrokeGeometry,
}

impl<'a> Builder<'a> {
    fn new(texel_space: &'a LinearSpace2d, points: usize) -> Self {
        Self {
            texel_space,
            geometry: StrokeGeometry {
                vertices: Vec::with_capacity(3 * points),
                indices: Vec::with_capacity(12 * points),
                side: Vec::with_capacity(3 * points),
            },
        }
    }

    // Vertex count is checked against the u16 range before building starts.
    fn push(&mut self, point: Vec2, side: Side) -> u16 {
        let index = self.geometry.vertices.len() as u16;
        let frame = transform::vertex(point, self.texel_space, &LinearSpace2d::FRAME);
        self.geometry
            .vertices
            .push([frame.x as f32, frame.y as f32, 0.0]);
        self.geometry.side.push(side.factor());
        index
    }

    fn triangles(&mut self, indices: [u16; 6]) {
        self.geometry.indices.extend_from_slice(&indices);
    }
}

/// Stroke `points` (world texels) into a ribbon expressed in the `[-1, 1]`
/// frame of `texel_space`.
///
/// Consecutive points must be distinct; this is only checked in debug builds.
pub fn stroke_path(
    points: &[Vec2],
    width: f64,
    texel_space: &LinearSpace2d,
) -> Result<StrokeGeometry, GeometryError> {
    let n = points.len();
    if n < 2 {
        return Err(GeometryError::TooFewPoints(n));
    }
    let vertex_count = 3 * n;
    if vertex_count > usize::from(u16::MAX) + 1 {
        return Err(GeometryError::TooManyVertices(vertex_count));
    }
    debug_assert!(
        points.windows(2).all(|w| w[0] != w[1]),
        "stroke_path: consecutive duplicate points"
    );

    let mut b = Builder::new(texel_space, n);

    // Start cap.
    let direction = points[1] - points[0];
    let wings = Wings::at(points[0], direction, width);
    let start = b.push(points[0], Side::Core);
    let second = b.push(points[1], Side::Core);
    let lhs = b.push(wings.lhs, Side::Left);
    let rhs = b.push(wings.rhs, Side::Right);
    b.triangles([start, lhs, second, start, second, rhs]);
    let mut prev_lines = wings.lines(direction);
    let mut prev = Joint {
        core: second,
        lhs,
        rhs,
    };

    for window in points.windows(2).skip(1) {
        let (current, next) = (window[0], window[1]);
        let direction = next - current;
        let wings = Wings::at(current, direction, width);
        let lines = wings.lines(direction);

        let lhs_point = prev_lines.0.intersection(&lines.0).unwrap_or(wings.lhs);
        let rhs_point = prev_lines.1.intersection(&lines.1).unwrap_or(wings.rhs);
        let lhs = b.push(lhs_point, Side::Left);
        let rhs = b.push(rhs_point, Side::Right);
        b.triangles([lhs, prev.core, prev.lhs, rhs, prev.rhs, prev.core]);

        let next_core = b.push(next, Side::Core);
        b.triangles([next_core, prev.core, lhs, next_core, rhs, prev.core]);

        prev_lines = lines;
        prev = Joint {
            core: next_core,
            lhs,
            rhs,
        };
    }

    // End cap.
    let last = points[n - 1];
    let wings = Wings::at(last, last - points[n - 2], width);
    let lhs = b.push(wings.lhs, Side::Left);
    let rhs = b.push(wings.rhs, Side::Right);
    b.triangles([lhs, prev.core, prev.lhs, rhs, prev.rhs, prev.core]);

    tracing::trace!(
        points = n,
        vertices = b.geometry.vertices.len(),
        "stroked path"
    );
    Ok(b.geometry)
}
