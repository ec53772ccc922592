//! Value objects - immutable types that represent domain concepts

mod geo;

pub use geo::{Coordinate, EARTH_RADIUS_METERS};
