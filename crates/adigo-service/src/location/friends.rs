//! Distance and direction to each cached friend

use adigo_core::{Coordinate, RepoResult, UserLocation, UserLocationRepository};

/// A friend's position relative to the device
#[derive(Debug, Clone, PartialEq)]
pub struct FriendLocationInfo {
    pub id: String,
    pub location: Coordinate,
    /// Great-circle distance in meters
    pub distance_meters: f64,
    /// Initial bearing in degrees, 0 = north, clockwise
    pub bearing_degrees: f64,
}

impl FriendLocationInfo {
    pub fn from_origin(origin: &Coordinate, friend: &UserLocation) -> Self {
        let location = friend.coordinate();
        Self {
            id: friend.id.clone(),
            location,
            distance_meters: origin.distance_to(&location),
            bearing_degrees: origin.bearing_to(&location),
        }
    }
}

/// Every cached friend relative to `origin`, nearest first
pub async fn friend_locations(
    locations: &dyn UserLocationRepository,
    origin: Coordinate,
) -> RepoResult<Vec<FriendLocationInfo>> {
    let mut friends: Vec<_> = locations
        .list()
        .await?
        .iter()
        .map(|friend| FriendLocationInfo::from_origin(&origin, friend))
        .collect();
    friends.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    Ok(friends)
}
