use std::fmt;

use foundation::Aabb3;
use foundation::math::{EARTH_PERIMETER, EARTH_RADIUS, Vec3};
use serde::{Deserialize, Serialize};

/// Deepest level whose `x`/`y` still fit the quadtree address space.
pub const MAX_TILE_LEVEL: u32 = 30;

/// Quadtree address in the ZXY scheme. `y` grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub level: u32,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub const ROOT: TileCoord = TileCoord {
        level: 0,
        x: 0,
        y: 0,
    };

    pub fn new(level: u32, x: u32, y: u32) -> Self {
        Self { level, x, y }
    }

    /// Tiles per axis at this level.
    pub fn tiles_per_axis(&self) -> u64 {
        1u64 << self.level
    }

    /// Edge length in world units; the root tile spans the whole perimeter.
    pub fn edge_length(&self) -> f64 {
        EARTH_PERIMETER / self.tiles_per_axis() as f64
    }

    pub fn child(&self, quadrant: Quadrant) -> TileCoord {
        let (dx, dy) = quadrant.child_offset();
        TileCoord::new(self.level + 1, self.x * 2 + dx, self.y * 2 + dy)
    }

    /// Children in split order: top-left, top-right, bottom-left, bottom-right.
    pub fn children(&self) -> [(Quadrant, TileCoord); 4] {
        Quadrant::CHILDREN.map(|q| (q, self.child(q)))
    }

    pub fn parent(&self) -> Option<TileCoord> {
        (self.level > 0).then(|| TileCoord::new(self.level - 1, self.x / 2, self.y / 2))
    }

    /// Planar footprint `(min_x, min_z, max_x, max_z)` centred on the world origin.
    pub fn plane_extent(&self) -> (f64, f64, f64, f64) {
        let edge = self.edge_length();
        let half = EARTH_PERIMETER / 2.0;
        let min_x = -half + self.x as f64 * edge;
        let min_z = -half + self.y as f64 * edge;
        (min_x, min_z, min_x + edge, min_z + edge)
    }

    /// Box over the planar footprint spanning `heights` vertically.
    pub fn plane_bounds(&self, heights: [f64; 2]) -> Aabb3 {
        let (min_x, min_z, max_x, max_z) = self.plane_extent();
        Aabb3::new([min_x, heights[0], min_z], [max_x, heights[1], max_z])
    }

    /// Geographic bounds `(lon_min, lat_min, lon_max, lat_max)` in degrees.
    pub fn bounds_wgs84(&self) -> (f64, f64, f64, f64) {
        let n = self.tiles_per_axis() as f64;
        let lon_min = (self.x as f64 / n) * 360.0 - 180.0;
        let lon_max = ((self.x + 1) as f64 / n) * 360.0 - 180.0;
        let lat_max = tile_y_to_lat(self.y as f64, n);
        let lat_min = tile_y_to_lat(self.y as f64 + 1.0, n);
        (lon_min, lat_min, lon_max, lat_max)
    }

    /// Box around the tile patch on the globe, sampled on a 5x5 lattice.
    pub fn sphere_bounds(&self) -> Aabb3 {
        const SAMPLES: usize = 5;
        let (lon_min, lat_min, lon_max, lat_max) = self.bounds_wgs84();
        let mut points = Vec::with_capacity(SAMPLES * SAMPLES);
        for i in 0..SAMPLES {
            let t = i as f64 / (SAMPLES - 1) as f64;
            let lon = (lon_min + (lon_max - lon_min) * t).to_radians();
            for j in 0..SAMPLES {
                let s = j as f64 / (SAMPLES - 1) as f64;
                let lat = (lat_min + (lat_max - lat_min) * s).to_radians();
                points.push(Vec3::new(
                    EARTH_RADIUS * lat.cos() * lon.sin(),
                    EARTH_RADIUS * lat.sin(),
                    EARTH_RADIUS * lat.cos() * lon.cos(),
                ));
            }
        }
        // The lattice is never empty.
        Aabb3::from_points(&points).unwrap_or(Aabb3::new([0.0; 3], [0.0; 3]))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.x, self.y)
    }
}

fn tile_y_to_lat(y: f64, n: f64) -> f64 {
    let m = std::f64::consts::PI - 2.0 * std::f64::consts::PI * y / n;
    m.sinh().atan().to_degrees()
}

/// Position of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    Root,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const CHILDREN: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    fn child_offset(self) -> (u32, u32) {
        match self {
            Quadrant::Root | Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (1, 0),
            Quadrant::BottomLeft => (0, 1),
            Quadrant::BottomRight => (1, 1),
        }
    }
}
