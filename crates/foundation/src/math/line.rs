use super::Vec2;

/// Implicit 2D line `a*x + b*y + c = 0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    /// Line through two distinct points.
    pub fn with_points(lhs: Vec2, rhs: Vec2) -> Self {
        Self {
            a: lhs.y - rhs.y,
            b: rhs.x - lhs.x,
            c: lhs.x * rhs.y - rhs.x * lhs.y,
        }
    }

    /// Crossing point of two lines, `None` when they are parallel.
    ///
    /// Near-parallel lines whose determinant vanishes relative to the
    /// coefficients are treated as parallel too.
    pub fn intersection(&self, other: &Line) -> Option<Vec2> {
        let lhs = self.a * other.b;
        let rhs = other.a * self.b;
        let delta = lhs - rhs;
        if delta == 0.0 || delta.abs() <= PARALLEL_EPSILON * (lhs.abs() + rhs.abs()) {
            return None;
        }

        let x = (self.b * other.c - other.b * self.c) / delta;
        let y = (self.c * other.a - other.c * self.a) / delta;
        Some(Vec2::new(x, y))
    }
}

const PARALLEL_EPSILON: f64 = 1e-12;
