//! Linear interval conversions between coordinate domains.
//!
//! A [`LinearSpace`] is a 1D interval. Converting between two spaces goes
//! through a normalized progress measured from the *upper* bound: progress 0
//! sits at `upper`, progress 1 at `lower`, and the progress is then laid onto
//! the target from its `lower` bound. Compositing of the shape buffer relies
//! on this flip, so it must not be "fixed" into an orientation-preserving map.

use crate::error::SpaceError;

use super::Vec2;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearSpace {
    lower: f64,
    upper: f64,
}

impl LinearSpace {
    /// Normalized rendering frame `[-1, 1]`.
    pub const FRAME: LinearSpace = LinearSpace {
        lower: -1.0,
        upper: 1.0,
    };

    pub fn new(lower: f64, upper: f64) -> Result<Self, SpaceError> {
        let size = upper - lower;
        if size == 0.0 || !size.is_finite() {
            return Err(SpaceError::Degenerate { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn size(&self) -> f64 {
        self.upper - self.lower
    }

    /// Map `value` from this space into `to`.
    pub fn convert(&self, value: f64, to: &LinearSpace) -> f64 {
        let progress = (self.upper - value) / self.size();
        to.lower + progress * to.size()
    }

    /// Widen both bounds by `margin`, keeping the orientation.
    pub fn padded(&self, margin: f64) -> Result<Self, SpaceError> {
        if self.size() >= 0.0 {
            Self::new(self.lower - margin, self.upper + margin)
        } else {
            Self::new(self.lower + margin, self.upper - margin)
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearSpace2d {
    pub x: LinearSpace,
    pub y: LinearSpace,
}

impl LinearSpace2d {
    pub const FRAME: LinearSpace2d = LinearSpace2d {
        x: LinearSpace::FRAME,
        y: LinearSpace::FRAME,
    };

    pub fn new(x: LinearSpace, y: LinearSpace) -> Self {
        Self { x, y }
    }

    pub fn ratio(&self) -> f64 {
        self.y.size() / self.x.size()
    }

    pub fn padded(&self, margin: f64) -> Result<Self, SpaceError> {
        Ok(Self::new(self.x.padded(margin)?, self.y.padded(margin)?))
    }
}

/// Axis-aligned interval of a point set, used as the local frame of a geometry batch.
pub fn geometry_world_texels(points: &[Vec2]) -> Result<LinearSpace2d, SpaceError> {
    geometry_world_texels_padded(points, 0.0)
}

/// Like [`geometry_world_texels`], widened by `margin` on every side before
/// validation. A straight horizontal path stays valid as long as `margin > 0`.
pub fn geometry_world_texels_padded(
    points: &[Vec2],
    margin: f64,
) -> Result<LinearSpace2d, SpaceError> {
    let first = points.first().ok_or(SpaceError::EmptyPointSet)?;
    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    Ok(LinearSpace2d::new(
        LinearSpace::new(min_x - margin, max_x + margin)?,
        LinearSpace::new(min_y - margin, max_y + margin)?,
    ))
}

pub mod transform {
    use super::{LinearSpace2d, Vec2};

    pub fn vertex(point: Vec2, from: &LinearSpace2d, to: &LinearSpace2d) -> Vec2 {
        Vec2::new(
            from.x.convert(point.x, &to.x),
            from.y.convert(point.y, &to.y),
        )
    }

    pub fn vertices(points: &[Vec2], from: &LinearSpace2d, to: &LinearSpace2d) -> Vec<Vec2> {
        points.iter().map(|p| vertex(*p, from, to)).collect()
    }
}

/// `f(v) = v * a + b`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LinearFunction {
    pub a: f64,
    pub b: f64,
}

impl LinearFunction {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// World → buffer-texel function: `lower` maps to 0, `upper` to 1.
    pub fn world_space_texel(space: &LinearSpace) -> Self {
        let diff = space.lower() - space.upper();
        Self {
            a: -1.0 / diff,
            b: space.lower() / diff,
        }
    }

    pub fn apply(&self, v: f64) -> f64 {
        v * self.a + self.b
    }
}

/// Independent per-axis linear functions, mirrored 1:1 by the shader struct.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct LinearTransform2d {
    pub x: LinearFunction,
    pub y: LinearFunction,
}

impl LinearTransform2d {
    pub fn new(x: LinearFunction, y: LinearFunction) -> Self {
        Self { x, y }
    }

    pub fn world_space_texel(space: &LinearSpace2d) -> Self {
        Self::new(
            LinearFunction::world_space_texel(&space.x),
            LinearFunction::world_space_texel(&space.y),
        )
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.x.apply(p.x), self.y.apply(p.y))
    }
}
