use serde::{Deserialize, Serialize};

use super::{Vec2, Vec3};

pub const EARTH_RADIUS: f64 = 6_378_137.0;
/// Length of the equator; also the edge of the root map tile in world units.
pub const EARTH_PERIMETER: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS;
pub const EARTH_ORIGIN: f64 = EARTH_PERIMETER / 2.0;

/// WGS84 position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Geoposition {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl Geoposition {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude: None,
        }
    }

    /// Web-Mercator projected `(x, y)` in meters.
    pub fn mercator(&self) -> Vec2 {
        let x = self.longitude * EARTH_ORIGIN / 180.0;
        let y = ((90.0 + self.latitude) * std::f64::consts::PI / 360.0)
            .tan()
            .ln()
            / (std::f64::consts::PI / 180.0);
        Vec2::new(x, y * EARTH_ORIGIN / 180.0)
    }

    /// Position on the map plane; north points towards -z.
    pub fn world_position(&self) -> Vec3 {
        let m = self.mercator();
        Vec3::new(m.x, 0.0, -m.y)
    }

    /// Planar `(x, z)` of [`Self::world_position`], the shape-buffer domain.
    pub fn world_texel(&self) -> Vec2 {
        let p = self.world_position();
        Vec2::new(p.x, p.z)
    }
}

#[cfg(test)]
mod tests {
    use super::{EARTH_ORIGIN, Geoposition};

    #[test]
    fn origin_projects_to_world_origin() {
        let p = Geoposition::new(0.0, 0.0).world_position();
        assert!(p.x.abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }

    #[test]
    fn antimeridian_reaches_half_perimeter_and_north_is_negative_z() {
        let east = Geoposition::new(180.0, 0.0).world_texel();
        assert!((east.x - EARTH_ORIGIN).abs() < 1e-6);

        let north = Geoposition::new(0.0, 45.0);
        assert!(north.mercator().y > 0.0);
        assert_eq!(north.world_texel().y, -north.mercator().y);
    }

    #[test]
    fn deserializes_without_altitude() {
        let g: Geoposition = serde_json::from_str(r#"{"longitude": 2.35, "latitude": 48.85}"#).unwrap();
        assert_eq!(g, Geoposition::new(2.35, 48.85));
    }
}
