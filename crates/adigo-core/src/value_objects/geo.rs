//! Geographic coordinate value object
//!
//! Great-circle distance and initial bearing between two WGS84 points, used to
//! show how far away (and in which direction) a friend is.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating the ranges
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` if latitude is outside [-90, 90], longitude
    /// outside [-180, 180], or either value is not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if valid {
            Ok(Self { latitude, longitude })
        } else {
            Err(DomainError::InvalidCoordinate { latitude, longitude })
        }
    }

    /// Haversine distance to `other` in meters
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }

    /// Initial bearing to `other` in degrees, normalized to [0, 360)
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

        let bearing = y.atan2(x).to_degrees();
        if bearing < 0.0 {
            bearing + 360.0
        } else {
            bearing
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(37.45, 127.13).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        let p = Coordinate::new(37.4505, 127.1270).unwrap();
        assert!(p.distance_to(&p).abs() < 1e-6);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = Coordinate::new(0.0, 0.0).unwrap();
        let b = Coordinate::new(1.0, 0.0).unwrap();
        // One degree of arc on a 6 371 km sphere
        let expected = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
        assert!((a.distance_to(&b) - expected).abs() < 0.01);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let seoul = Coordinate::new(37.5665, 126.9780).unwrap();
        let busan = Coordinate::new(35.1796, 129.0756).unwrap();
        let d1 = seoul.distance_to(&busan);
        let d2 = busan.distance_to(&seoul);
        assert!((d1 - d2).abs() < 1e-6);
        // Roughly 325 km apart
        assert!(d1 > 300_000.0 && d1 < 350_000.0);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Coordinate::new(0.0, 0.0).unwrap();
        let north = Coordinate::new(1.0, 0.0).unwrap();
        let east = Coordinate::new(0.0, 1.0).unwrap();
        let south = Coordinate::new(-1.0, 0.0).unwrap();
        let west = Coordinate::new(0.0, -1.0).unwrap();

        assert!(origin.bearing_to(&north).abs() < 1e-9);
        assert!((origin.bearing_to(&east) - 90.0).abs() < 1e-9);
        assert!((origin.bearing_to(&south) - 180.0).abs() < 1e-9);
        assert!((origin.bearing_to(&west) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        let p = Coordinate::new(37.5, 127.0).unwrap();
        assert_eq!(p.to_string(), "(37.500000, 127.000000)");
    }
}
