use crate::math::Vec3;

/// Axis-aligned bounding box in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb3 {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb3 { min, max }
    }

    /// Smallest box containing every point. `None` for an empty set.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = points.first()?;
        let mut min = [first.x, first.y, first.z];
        let mut max = min;
        for p in &points[1..] {
            for (axis, v) in [p.x, p.y, p.z].into_iter().enumerate() {
                min[axis] = min[axis].min(v);
                max[axis] = max[axis].max(v);
            }
        }
        Some(Self::new(min, max))
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        )
    }

    /// Euclidean distance from `p` to the box; zero inside.
    pub fn distance_to_point(&self, p: Vec3) -> f64 {
        let mut d2 = 0.0;
        for (axis, v) in [p.x, p.y, p.z].into_iter().enumerate() {
            let excess = if v < self.min[axis] {
                self.min[axis] - v
            } else if v > self.max[axis] {
                v - self.max[axis]
            } else {
                0.0
            };
            d2 += excess * excess;
        }
        d2.sqrt()
    }

    /// Slab test; returns the entry distance along the normalized ray.
    pub fn ray_hit_t(&self, ray: &Ray, mut t_min: f64, mut t_max: f64) -> Option<f64> {
        let dir = ray.dir.normalized()?;
        let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
        let dir = [dir.x, dir.y, dir.z];
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (min, max) = (self.min[axis], self.max[axis]);

            if d.abs() < 1e-12 {
                if o < min || o > max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t1 = (min - o) * inv;
            let mut t2 = (max - o) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_max < t_min {
                return None;
            }
        }

        Some(t_min.max(0.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Option<Vec3> {
        Some(self.origin + self.dir.normalized()?.scale(t))
    }
}
