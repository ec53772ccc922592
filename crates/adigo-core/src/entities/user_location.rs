//! Friend location entity - the latest reported position of a user

use crate::value_objects::Coordinate;

/// Latest known position of a user. No history is kept; every update
/// overwrites the previous value for the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct UserLocation {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
}

impl UserLocation {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
        }
    }

    /// Position as a coordinate value
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.lat,
            longitude: self.lng,
        }
    }
}
